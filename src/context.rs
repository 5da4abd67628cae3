//! Board Context
//!
//! The single controller of a board. It owns the entity store, the search
//! queries, the drag state and the unassigned-column preference, and it is
//! the only thing that mutates the store.

use std::sync::Arc;

use board_dragdrop::{DndState, DragSubject, Draggable, DropAction, HoverTarget, Target};
use tracing::{debug, info};

use crate::commands::RecordService;
use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::filter::SearchState;
use crate::models::{Card, CardId, Column, ColumnId};
use crate::mutation::{plan, CardEdit, Mutation, ServerRecord, StateDelta};
use crate::store::BoardStore;
use crate::sync;

impl Draggable for Column {
    type Id = ColumnId;

    fn drag_id(&self) -> ColumnId {
        self.id.clone()
    }
}

impl Draggable for Card {
    type Id = CardId;

    fn drag_id(&self) -> CardId {
        self.id.clone()
    }
}

/// Drop target on the board
pub type BoardTarget = Target<Column, Card>;

/// Board controller
pub struct BoardContext {
    service: Arc<dyn RecordService>,
    store: BoardStore,
    search: SearchState,
    dnd: DndState<Column, Card>,
    show_unassigned: bool,
}

impl BoardContext {
    pub fn new(service: Arc<dyn RecordService>) -> Self {
        Self {
            service,
            store: BoardStore::new(),
            search: SearchState::new(),
            dnd: DndState::new(),
            show_unassigned: false,
        }
    }

    pub fn with_config(service: Arc<dyn RecordService>, config: &BoardConfig) -> Self {
        let mut ctx = Self::new(service);
        ctx.show_unassigned = config.show_unassigned;
        ctx
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn dnd(&self) -> &DndState<Column, Card> {
        &self.dnd
    }

    /// Replace the local store with the remote records
    pub async fn load(&mut self) -> Result<()> {
        let (columns, cards) = sync::load_board(self.service.as_ref()).await?;
        self.store.replace_all(columns, cards);
        Ok(())
    }

    // ========================
    // Two-Phase Mutation
    // ========================

    /// Plan a mutation and apply its optimistic part.
    /// `None` means the mutation is a no-op and nothing must be persisted.
    pub fn apply_local(&mut self, mutation: Mutation) -> Result<Option<StateDelta>> {
        let Some(delta) = plan(&self.store, mutation)? else {
            return Ok(None);
        };
        self.store.apply_optimistic(&delta);
        Ok(Some(delta))
    }

    pub async fn persist(&self, delta: &StateDelta) -> Result<Vec<ServerRecord>> {
        sync::persist(self.service.as_ref(), delta).await
    }

    pub fn reconcile(&mut self, delta: &StateDelta, records: Vec<ServerRecord>) {
        self.store.reconcile(delta, records);
    }

    /// Apply, persist and reconcile. Returns false for a no-op.
    ///
    /// On failure the optimistic part stays applied and nothing is
    /// reconciled, so the store may disagree with the service until the
    /// next `load`.
    pub async fn execute(&mut self, mutation: Mutation) -> Result<bool> {
        let Some(delta) = self.apply_local(mutation)? else {
            return Ok(false);
        };
        let records = self.persist(&delta).await?;
        self.reconcile(&delta, records);
        Ok(true)
    }

    // ========================
    // Commands
    // ========================

    pub async fn create_column(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        info!(%title, "creating column");
        self.execute(Mutation::CreateColumn { title }).await?;
        Ok(())
    }

    pub async fn rename_column(&mut self, id: &ColumnId, title: impl Into<String>) -> Result<()> {
        self.execute(Mutation::RenameColumn {
            id: id.clone(),
            title: title.into(),
        })
        .await?;
        Ok(())
    }

    /// Delete a column. Its cards stay, unassigned, with their order kept.
    pub async fn delete_column(&mut self, id: &ColumnId) -> Result<()> {
        info!(column_id = %id, "deleting column");
        self.execute(Mutation::DeleteColumn { id: id.clone() }).await?;
        Ok(())
    }

    pub async fn create_card(
        &mut self,
        column_id: &ColumnId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        info!(column_id = %column_id, "creating card");
        self.execute(Mutation::CreateCard {
            column_id: column_id.clone(),
            title: title.into(),
            description: description.into(),
        })
        .await?;
        Ok(())
    }

    pub async fn update_card(&mut self, id: &CardId, edit: CardEdit) -> Result<()> {
        self.execute(Mutation::EditCard {
            id: id.clone(),
            edit,
        })
        .await?;
        Ok(())
    }

    pub async fn delete_card(&mut self, id: &CardId) -> Result<()> {
        info!(card_id = %id, "deleting card");
        self.execute(Mutation::DeleteCard { id: id.clone() }).await?;
        Ok(())
    }

    // ========================
    // Drag and Drop
    // ========================

    pub fn start_column_drag(&mut self, id: &ColumnId) -> Result<bool> {
        let column = self
            .store
            .find_column(id)
            .cloned()
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })?;
        Ok(self.dnd.start_column_drag(column))
    }

    /// Cards of any scope can be picked up, unassigned ones included
    pub fn start_card_drag(&mut self, id: &CardId) -> Result<bool> {
        let card = self
            .store
            .find_card(id)
            .cloned()
            .ok_or_else(|| BoardError::CardNotFound { id: id.to_string() })?;
        Ok(self.dnd.start_card_drag(card))
    }

    pub fn hover_column(&mut self, id: &ColumnId) {
        self.dnd.hover_column(id.clone());
    }

    pub fn hover_card(&mut self, id: &CardId) {
        self.dnd.hover_card(id.clone());
    }

    pub fn leave(&mut self) {
        self.dnd.leave();
    }

    /// Column highlight, shown only while a column is dragged. A card drag
    /// still records the column as its drop target.
    pub fn is_drag_over_column(&self, id: &ColumnId) -> bool {
        self.dnd.dragged_column().is_some()
            && matches!(self.dnd.hover(), Some(HoverTarget::Column(c)) if c == id)
    }

    pub fn is_drag_over_card(&self, id: &CardId) -> bool {
        matches!(self.dnd.hover(), Some(HoverTarget::Card(k)) if k == id)
    }

    /// Drop on a column. A dragged column takes that column's position; a
    /// dragged card is appended to it.
    pub async fn drop_column(&mut self, target: &ColumnId) -> Result<bool> {
        let action = self.dnd.drop_on(HoverTarget::Column(target.clone()));
        self.apply_drop(action).await
    }

    /// Drop a card into `target_column`, onto `target_card` when given.
    /// `None` is the unassigned pseudo-column, which accepts nothing.
    pub async fn drop_card(
        &mut self,
        target_column: Option<&ColumnId>,
        target_card: Option<&CardId>,
    ) -> Result<bool> {
        let Some(subject) = self.dnd.finish() else {
            return Ok(false);
        };
        let DragSubject::Card(card) = subject else {
            debug!("column dropped into a card list, ignored");
            return Ok(false);
        };
        self.execute(Mutation::DropCard {
            dragged: card.id,
            target_column: target_column.cloned(),
            target_card: target_card.cloned(),
        })
        .await
    }

    /// Release the pointer over whatever is currently hovered
    pub async fn release_pointer(&mut self) -> Result<bool> {
        let action = self.dnd.release();
        self.apply_drop(action).await
    }

    /// Abandon the drag without dropping
    pub fn end_drag(&mut self) {
        self.dnd.end_drag();
    }

    async fn apply_drop(&mut self, action: Option<DropAction<Column, Card>>) -> Result<bool> {
        let Some(DropAction { subject, target }) = action else {
            return Ok(false);
        };
        let mutation = match (subject, target) {
            (DragSubject::Column(column), HoverTarget::Column(target)) => Mutation::DropColumn {
                dragged: column.id,
                target,
            },
            (DragSubject::Card(card), HoverTarget::Column(target)) => Mutation::DropCard {
                dragged: card.id,
                target_column: Some(target),
                target_card: None,
            },
            (DragSubject::Card(card), HoverTarget::Card(target)) => {
                let target_column = self
                    .store
                    .find_card(&target)
                    .and_then(|k| k.column_id.clone());
                Mutation::DropCard {
                    dragged: card.id,
                    target_column,
                    target_card: Some(target),
                }
            }
            (DragSubject::Column(_), HoverTarget::Card(_)) => {
                debug!("column dropped on a card, ignored");
                return Ok(false);
            }
        };
        self.execute(mutation).await
    }

    // ========================
    // Views
    // ========================

    pub fn sorted_columns(&self) -> Vec<&Column> {
        self.store.sorted_columns()
    }

    pub fn column_cards(&self, id: &ColumnId) -> Vec<&Card> {
        self.search.column_cards(&self.store, id)
    }

    pub fn unassigned_cards(&self) -> Vec<&Card> {
        self.search.unassigned_cards(&self.store)
    }

    pub fn set_global_search(&mut self, query: impl Into<String>) {
        self.search.set_global(query);
    }

    pub fn set_column_search(&mut self, id: &ColumnId, query: impl Into<String>) {
        self.search.set_column_query(id.clone(), query);
    }

    pub fn set_unassigned_search(&mut self, query: impl Into<String>) {
        self.search.set_unassigned_query(query);
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn show_unassigned(&self) -> bool {
        self.show_unassigned
    }

    /// Flip the preference and return the new value
    pub fn toggle_show_unassigned(&mut self) -> bool {
        self.show_unassigned = !self.show_unassigned;
        self.show_unassigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::InMemoryRecordService;

    fn column(id: &str, order: u32) -> Column {
        Column {
            id: id.into(),
            title: id.to_uppercase(),
            order,
        }
    }

    fn card(id: &str, column_id: Option<&str>, order: u32) -> Card {
        Card {
            id: id.into(),
            column_id: column_id.map(ColumnId::from),
            title: id.to_string(),
            description: String::new(),
            order,
        }
    }

    async fn loaded(service: Arc<InMemoryRecordService>) -> BoardContext {
        let mut ctx = BoardContext::new(service.clone());
        ctx.load().await.unwrap();
        service.clear_calls().await;
        ctx
    }

    #[tokio::test]
    async fn test_create_column_uses_server_record() {
        let service = Arc::new(InMemoryRecordService::new());
        let mut ctx = loaded(service.clone()).await;

        ctx.create_column("To do").await.unwrap();
        ctx.create_column("Done").await.unwrap();

        let titles: Vec<&str> = ctx.sorted_columns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["To do", "Done"]);
        assert_eq!(ctx.store().columns(), service.columns().await.as_slice());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_store_untouched() {
        let service = Arc::new(InMemoryRecordService::new());
        service.fail_on("POST /columns").await;
        let mut ctx = loaded(service.clone()).await;

        assert!(ctx.create_column("To do").await.is_err());
        assert!(ctx.store().columns().is_empty());
    }

    #[tokio::test]
    async fn test_drag_card_onto_card_in_other_column() {
        let service = Arc::new(InMemoryRecordService::with_records(
            vec![column("x", 0), column("y", 1)],
            vec![card("a", Some("x"), 0), card("c", Some("y"), 0)],
        ));
        let mut ctx = loaded(service.clone()).await;

        assert!(ctx.start_card_drag(&"a".into()).unwrap());
        ctx.hover_card(&"c".into());
        assert!(ctx.is_drag_over_card(&"c".into()));
        assert!(ctx.release_pointer().await.unwrap());

        let ids: Vec<&str> = ctx
            .column_cards(&"y".into())
            .iter()
            .map(|k| k.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(ctx.dnd().is_idle());
        assert!(!ctx.is_drag_over_card(&"c".into()));
    }

    #[tokio::test]
    async fn test_card_dropped_on_column_header_is_appended() {
        let service = Arc::new(InMemoryRecordService::with_records(
            vec![column("x", 0), column("y", 1)],
            vec![card("a", Some("x"), 0), card("c", Some("y"), 0)],
        ));
        let mut ctx = loaded(service.clone()).await;

        ctx.start_card_drag(&"a".into()).unwrap();
        assert!(ctx.drop_column(&"y".into()).await.unwrap());

        let moved = ctx.store().find_card(&"a".into()).unwrap();
        assert_eq!(moved.column_id, Some(ColumnId::from("y")));
        assert_eq!(moved.order, 1);
        assert_eq!(service.calls().await, vec!["PATCH /cards/a"]);
    }

    #[tokio::test]
    async fn test_drop_without_drag_does_nothing() {
        let service = Arc::new(InMemoryRecordService::with_records(vec![column("x", 0)], vec![]));
        let mut ctx = loaded(service.clone()).await;

        assert!(!ctx.drop_column(&"x".into()).await.unwrap());
        assert!(service.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_drop_on_unassigned_is_noop() {
        let service = Arc::new(InMemoryRecordService::with_records(
            vec![column("x", 0)],
            vec![card("a", Some("x"), 0)],
        ));
        let mut ctx = loaded(service.clone()).await;

        ctx.start_card_drag(&"a".into()).unwrap();
        assert!(!ctx.drop_card(None, None).await.unwrap());
        assert!(ctx.dnd().is_idle());
        assert!(service.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_end_drag_clears_hover() {
        let service = Arc::new(InMemoryRecordService::with_records(
            vec![column("x", 0), column("y", 1)],
            vec![],
        ));
        let mut ctx = loaded(service).await;

        ctx.start_column_drag(&"x".into()).unwrap();
        ctx.hover_column(&"y".into());
        assert!(ctx.is_drag_over_column(&"y".into()));

        ctx.end_drag();
        assert!(ctx.dnd().is_idle());
        assert!(!ctx.is_drag_over_column(&"y".into()));
    }

    #[tokio::test]
    async fn test_card_drag_does_not_highlight_columns() {
        let service = Arc::new(InMemoryRecordService::with_records(
            vec![column("x", 0), column("y", 1)],
            vec![card("a", Some("x"), 0)],
        ));
        let mut ctx = loaded(service.clone()).await;

        ctx.start_card_drag(&"a".into()).unwrap();
        ctx.hover_column(&"y".into());
        assert!(!ctx.is_drag_over_column(&"y".into()));

        // the column is still the drop target
        assert!(ctx.release_pointer().await.unwrap());
        assert_eq!(
            ctx.store().find_card(&"a".into()).unwrap().column_id,
            Some(ColumnId::from("y"))
        );
    }

    #[tokio::test]
    async fn test_edit_card_to_no_column() {
        let service = Arc::new(InMemoryRecordService::with_records(
            vec![column("x", 0)],
            vec![card("a", Some("x"), 3)],
        ));
        let mut ctx = loaded(service.clone()).await;

        ctx.update_card(
            &"a".into(),
            CardEdit {
                title: "A".into(),
                description: "moved out".into(),
                column_id: None,
            },
        )
        .await
        .unwrap();

        let unassigned = ctx.unassigned_cards();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].order, 3);
        assert_eq!(unassigned[0].description, "moved out");
    }

    #[test]
    fn test_toggle_show_unassigned() {
        let config = BoardConfig {
            show_unassigned: true,
            ..BoardConfig::default()
        };
        let mut ctx = BoardContext::with_config(Arc::new(InMemoryRecordService::new()), &config);
        assert!(ctx.show_unassigned());
        assert!(!ctx.toggle_show_unassigned());
        assert!(!ctx.show_unassigned());
    }
}
