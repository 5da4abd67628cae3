//! In-Memory Record Service
//!
//! Keeps records in process. Every call is recorded as `"METHOD /path"` and
//! individual calls can be made to fail, which lets callers observe exactly
//! which remote requests a board operation issued.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CardPatch, ColumnPatch, RecordService};
use crate::error::{BoardError, Result};
use crate::models::{Card, CardId, Column, ColumnId};

#[derive(Debug, Default)]
struct MemoryState {
    columns: Vec<Column>,
    cards: Vec<Card>,
    calls: Vec<String>,
    failures: HashSet<String>,
}

impl MemoryState {
    fn record(&mut self, call: String) -> Result<()> {
        let failed = self.failures.contains(&call);
        self.calls.push(call.clone());
        if failed {
            return Err(BoardError::remote(format!("{} failed", call)));
        }
        Ok(())
    }
}

/// Record service backed by in-process vectors
#[derive(Debug, Default)]
pub struct InMemoryRecordService {
    state: Mutex<MemoryState>,
}

impl InMemoryRecordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service pre-populated with records
    pub fn with_records(columns: Vec<Column>, cards: Vec<Card>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                columns,
                cards,
                ..MemoryState::default()
            }),
        }
    }

    /// Make every future call matching `call` (e.g. `"PATCH /cards/k1"`) fail
    pub async fn fail_on(&self, call: impl Into<String>) {
        self.state.lock().await.failures.insert(call.into());
    }

    /// Calls issued so far, in arrival order
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Snapshot of the stored columns
    pub async fn columns(&self) -> Vec<Column> {
        self.state.lock().await.columns.clone()
    }

    /// Snapshot of the stored cards
    pub async fn cards(&self) -> Vec<Card> {
        self.state.lock().await.cards.clone()
    }
}

#[async_trait]
impl RecordService for InMemoryRecordService {
    async fn list_columns(&self) -> Result<Vec<Column>> {
        let mut state = self.state.lock().await;
        state.record("GET /columns".to_string())?;
        Ok(state.columns.clone())
    }

    async fn create_column(&self, column: &Column) -> Result<Column> {
        let mut state = self.state.lock().await;
        state.record("POST /columns".to_string())?;
        if state.columns.iter().any(|c| c.id == column.id) {
            return Err(BoardError::remote(format!("duplicate column id {}", column.id)));
        }
        state.columns.push(column.clone());
        Ok(column.clone())
    }

    async fn patch_column(&self, id: &ColumnId, patch: &ColumnPatch) -> Result<Column> {
        let mut state = self.state.lock().await;
        state.record(format!("PATCH /columns/{}", id))?;
        let column = state
            .columns
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })?;
        patch.apply_to(column);
        Ok(column.clone())
    }

    async fn delete_column(&self, id: &ColumnId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.record(format!("DELETE /columns/{}", id))?;
        let before = state.columns.len();
        state.columns.retain(|c| &c.id != id);
        if state.columns.len() == before {
            return Err(BoardError::ColumnNotFound { id: id.to_string() });
        }
        Ok(())
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        let mut state = self.state.lock().await;
        state.record("GET /cards".to_string())?;
        Ok(state.cards.clone())
    }

    async fn create_card(&self, card: &Card) -> Result<Card> {
        let mut state = self.state.lock().await;
        state.record("POST /cards".to_string())?;
        if state.cards.iter().any(|k| k.id == card.id) {
            return Err(BoardError::remote(format!("duplicate card id {}", card.id)));
        }
        state.cards.push(card.clone());
        Ok(card.clone())
    }

    async fn patch_card(&self, id: &CardId, patch: &CardPatch) -> Result<Card> {
        let mut state = self.state.lock().await;
        state.record(format!("PATCH /cards/{}", id))?;
        let card = state
            .cards
            .iter_mut()
            .find(|k| &k.id == id)
            .ok_or_else(|| BoardError::CardNotFound { id: id.to_string() })?;
        patch.apply_to(card);
        Ok(card.clone())
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.record(format!("DELETE /cards/{}", id))?;
        let before = state.cards.len();
        state.cards.retain(|k| &k.id != id);
        if state.cards.len() == before {
            return Err(BoardError::CardNotFound { id: id.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let service = InMemoryRecordService::new();
        let column = Column::new("To do", 0);
        service.create_column(&column).await.unwrap();

        let columns = service.list_columns().await.unwrap();
        assert_eq!(columns, vec![column]);
        assert_eq!(service.calls().await, vec!["POST /columns", "GET /columns"]);
    }

    #[tokio::test]
    async fn test_patch_merges_fields() {
        let card = Card::new(None, "Loose", "desc", 0);
        let service = InMemoryRecordService::with_records(vec![], vec![card.clone()]);

        let patched = service
            .patch_card(&card.id, &CardPatch::order(5))
            .await
            .unwrap();
        assert_eq!(patched.order, 5);
        assert_eq!(patched.title, "Loose");
    }

    #[tokio::test]
    async fn test_configured_failure_is_still_recorded() {
        let service = InMemoryRecordService::new();
        service.fail_on("GET /cards").await;

        assert!(service.list_cards().await.is_err());
        assert_eq!(service.calls().await, vec!["GET /cards"]);
    }

    #[tokio::test]
    async fn test_delete_missing_card() {
        let service = InMemoryRecordService::new();
        let result = service.delete_card(&CardId::from("nope")).await;
        assert!(matches!(result, Err(BoardError::CardNotFound { .. })));
    }
}
