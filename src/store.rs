//! Entity Store
//!
//! The client-side authoritative copy of columns and cards.
//! Only the controller mutates it, through the helpers below.

use tracing::{debug, warn};

use crate::models::{Card, CardId, Column, ColumnId};
use crate::mutation::{LocalEffect, ServerRecord, StateDelta};
use crate::order::sort_by_order;
use crate::reorder::{CardMove, ColumnReorder};

/// Columns and cards as last known locally
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardStore {
    columns: Vec<Column>,
    cards: Vec<Card>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(columns: Vec<Column>, cards: Vec<Card>) -> Self {
        Self { columns, cards }
    }

    /// Replace everything, as after an initial load
    pub fn replace_all(&mut self, columns: Vec<Column>, cards: Vec<Card>) {
        self.columns = columns;
        self.cards = cards;
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|k| &k.id == id)
    }

    pub fn column_exists(&self, id: &ColumnId) -> bool {
        self.find_column(id).is_some()
    }

    /// Columns in board order
    pub fn sorted_columns(&self) -> Vec<&Column> {
        sort_by_order(&self.columns)
    }

    /// Cards whose stored `column_id` equals `scope`, in storage order.
    /// Dangling column ids are not folded into `None` here.
    pub fn cards_in_scope(&self, scope: Option<&ColumnId>) -> Vec<&Card> {
        self.cards.iter().filter(|k| k.in_scope(scope)).collect()
    }

    pub fn scope_len(&self, scope: Option<&ColumnId>) -> usize {
        self.cards.iter().filter(|k| k.in_scope(scope)).count()
    }

    // ========================
    // Column Helpers
    // ========================

    /// Insert or replace a column by id
    pub fn upsert_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.id == column.id) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Remove a column. Its cards become unassigned with their order kept.
    /// Returns the ids of the re-scoped cards.
    pub fn remove_column(&mut self, id: &ColumnId) -> Vec<CardId> {
        self.columns.retain(|c| &c.id != id);
        let mut rescoped = Vec::new();
        for card in self.cards.iter_mut().filter(|k| k.column_id.as_ref() == Some(id)) {
            card.column_id = None;
            rescoped.push(card.id.clone());
        }
        rescoped
    }

    /// Apply a full-scope column reorder
    pub fn apply_column_reorder(&mut self, reorder: &ColumnReorder) {
        for (id, order) in &reorder.orders {
            if let Some(column) = self.columns.iter_mut().find(|c| &c.id == id) {
                column.order = *order;
            }
        }
    }

    // ========================
    // Card Helpers
    // ========================

    /// Insert or replace a card by id
    pub fn upsert_card(&mut self, card: Card) {
        match self.cards.iter_mut().find(|k| k.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn remove_card(&mut self, id: &CardId) -> Option<Card> {
        let index = self.cards.iter().position(|k| &k.id == id)?;
        Some(self.cards.remove(index))
    }

    /// Apply a planned card move in one pass: shifted cards and the moved card
    pub fn apply_card_move(&mut self, mv: &CardMove) {
        for card in self.cards.iter_mut() {
            if card.id == mv.card_id {
                card.column_id = Some(mv.to.clone());
                card.order = mv.order;
            } else if let Some(shift) = mv.shifted.iter().find(|s| s.key == card.id) {
                card.order = shift.to;
            }
        }
    }

    // ========================
    // Two-Phase Application
    // ========================

    /// Optimistic part of a delta, applied before anything is persisted
    pub fn apply_optimistic(&mut self, delta: &StateDelta) {
        if let LocalEffect::ReorderColumns(reorder) = delta.effect() {
            self.apply_column_reorder(reorder);
        }
    }

    /// Settle a delta after its remote calls succeeded
    pub fn reconcile(&mut self, delta: &StateDelta, records: Vec<ServerRecord>) {
        match delta.effect() {
            LocalEffect::Reconcile => {
                for record in records {
                    match record {
                        ServerRecord::Column(column) => {
                            debug!(column_id = %column.id, "reconciled column");
                            self.upsert_column(column);
                        }
                        ServerRecord::Card(card) => {
                            debug!(card_id = %card.id, "reconciled card");
                            self.upsert_card(card);
                        }
                        ServerRecord::Deleted => {}
                    }
                }
            }
            LocalEffect::ReorderColumns(_) => {}
            LocalEffect::MoveCard(mv) => self.apply_card_move(mv),
            LocalEffect::RemoveColumn(id) => {
                let rescoped = self.remove_column(id);
                debug!(column_id = %id, cards = rescoped.len(), "column removed, cards unassigned");
            }
            LocalEffect::RemoveCard(id) => {
                if self.remove_card(id).is_none() {
                    warn!(card_id = %id, "deleted card was not in the local store");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderShift;

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

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = BoardStore::new();
        store.upsert_column(column("a", 0));
        let mut renamed = column("a", 0);
        renamed.title = "Renamed".into();
        store.upsert_column(renamed);

        assert_eq!(store.columns().len(), 1);
        assert_eq!(store.columns()[0].title, "Renamed");
    }

    #[test]
    fn test_remove_column_unassigns_cards_keeping_order() {
        let mut store = BoardStore::with_records(
            vec![column("x", 0)],
            vec![card("a", Some("x"), 0), card("b", Some("x"), 1), card("c", None, 0)],
        );

        let rescoped = store.remove_column(&"x".into());

        assert_eq!(rescoped.len(), 2);
        let unassigned: Vec<u32> = store.cards_in_scope(None).iter().map(|k| k.order).collect();
        assert_eq!(unassigned, vec![0, 1, 0]);
    }

    #[test]
    fn test_cards_in_scope_is_literal() {
        let store = BoardStore::with_records(
            vec![column("x", 0)],
            vec![card("a", Some("gone"), 0), card("b", None, 0)],
        );
        assert_eq!(store.cards_in_scope(None).len(), 1);
        assert_eq!(store.scope_len(Some(&"gone".into())), 1);
    }

    #[test]
    fn test_apply_card_move_updates_all_affected() {
        let mut store = BoardStore::with_records(
            vec![column("x", 0), column("y", 1)],
            vec![card("a", Some("x"), 0), card("c", Some("y"), 0)],
        );
        let mv = CardMove {
            card_id: "a".into(),
            from: Some("x".into()),
            from_order: 0,
            to: "y".into(),
            order: 0,
            shifted: vec![OrderShift {
                key: "c".into(),
                from: 0,
                to: 1,
            }],
        };

        store.apply_card_move(&mv);

        assert_eq!(store.find_card(&"a".into()).unwrap().column_id, Some(ColumnId::from("y")));
        assert_eq!(store.find_card(&"a".into()).unwrap().order, 0);
        assert_eq!(store.find_card(&"c".into()).unwrap().order, 1);
    }
}
