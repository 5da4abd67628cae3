//! Filter Engine
//!
//! Derives the visible card set per scope from the store and the current
//! search queries. Nothing here mutates the store or looks at drag state.

use std::collections::HashMap;

use crate::models::{Card, Column, ColumnId};
use crate::order::sort_by_order;
use crate::store::BoardStore;

/// Case-insensitive substring match on title or description.
/// An empty query matches everything.
pub fn matches_query(card: &Card, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    card.title.to_lowercase().contains(&needle)
        || card.description.to_lowercase().contains(&needle)
}

/// Whether a card shows up in the unassigned pseudo-column: no column id, or
/// one that no longer resolves.
pub fn is_unassigned(card: &Card, columns: &[Column]) -> bool {
    match &card.column_id {
        None => true,
        Some(id) => !columns.iter().any(|c| &c.id == id),
    }
}

/// Global query, one query per column, and one for the unassigned view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    global: String,
    per_column: HashMap<ColumnId, String>,
    unassigned: String,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> &str {
        &self.global
    }

    pub fn set_global(&mut self, query: impl Into<String>) {
        self.global = query.into();
    }

    /// Query for one column; `""` when none was set
    pub fn column_query(&self, id: &ColumnId) -> &str {
        self.per_column.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn set_column_query(&mut self, id: ColumnId, query: impl Into<String>) {
        let query = query.into();
        if query.is_empty() {
            self.per_column.remove(&id);
        } else {
            self.per_column.insert(id, query);
        }
    }

    pub fn unassigned_query(&self) -> &str {
        &self.unassigned
    }

    pub fn set_unassigned_query(&mut self, query: impl Into<String>) {
        self.unassigned = query.into();
    }

    pub fn clear(&mut self) {
        self.global.clear();
        self.per_column.clear();
        self.unassigned.clear();
    }

    /// Cards passing the global query alone, in storage order
    pub fn filtered_cards<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        cards
            .iter()
            .filter(|k| matches_query(k, &self.global))
            .collect()
    }

    /// Visible cards of one column, in board order
    pub fn column_cards<'a>(&self, store: &'a BoardStore, id: &ColumnId) -> Vec<&'a Card> {
        let local = self.column_query(id);
        let visible = store
            .cards_in_scope(Some(id))
            .into_iter()
            .filter(|k| matches_query(k, &self.global) && matches_query(k, local));
        sort_by_order(visible)
    }

    /// Visible cards of the unassigned pseudo-column, in board order
    pub fn unassigned_cards<'a>(&self, store: &'a BoardStore) -> Vec<&'a Card> {
        let visible = store.cards().iter().filter(|k| {
            is_unassigned(k, store.columns())
                && matches_query(k, &self.global)
                && matches_query(k, &self.unassigned)
        });
        sort_by_order(visible)
    }
}
