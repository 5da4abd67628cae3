//! Card Commands
//!
//! Argument structs for card patches.

use serde::Serialize;

use crate::models::{Card, ColumnId};

/// Partial card update; absent fields are left untouched remotely.
///
/// `column_id` is doubly optional: `None` leaves the scope alone,
/// `Some(None)` sends `"columnId": null` to unassign the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "columnId", skip_serializing_if = "Option::is_none")]
    pub column_id: Option<Option<ColumnId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl CardPatch {
    /// Order-only patch, used for cards shifted by an insert
    pub fn order(order: u32) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    /// Scope and order patch, used for the dragged card of a move
    pub fn placement(column_id: Option<ColumnId>, order: u32) -> Self {
        Self {
            column_id: Some(column_id),
            order: Some(order),
            ..Self::default()
        }
    }

    /// Every mutable field, as submitted by the edit form
    pub fn full(
        title: impl Into<String>,
        description: impl Into<String>,
        column_id: Option<ColumnId>,
        order: u32,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            column_id: Some(column_id),
            order: Some(order),
        }
    }

    /// Apply to a local copy of the record
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(title) = &self.title {
            card.title = title.clone();
        }
        if let Some(description) = &self.description {
            card.description = description.clone();
        }
        if let Some(column_id) = &self.column_id {
            card.column_id = column_id.clone();
        }
        if let Some(order) = self.order {
            card.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassign_serializes_null() {
        let json = serde_json::to_string(&CardPatch::placement(None, 4)).unwrap();
        assert_eq!(json, r#"{"columnId":null,"order":4}"#);
    }

    #[test]
    fn test_order_patch_leaves_scope_out() {
        let json = serde_json::to_string(&CardPatch::order(1)).unwrap();
        assert_eq!(json, r#"{"order":1}"#);
    }

    #[test]
    fn test_apply_to_only_touches_present_fields() {
        let mut card = Card {
            id: "k".into(),
            column_id: Some("todo".into()),
            title: "Old".into(),
            description: "keep".into(),
            order: 0,
        };
        let patch = CardPatch {
            title: Some("New".into()),
            column_id: Some(None),
            ..CardPatch::default()
        };
        patch.apply_to(&mut card);
        assert_eq!(card.title, "New");
        assert_eq!(card.description, "keep");
        assert_eq!(card.column_id, None);
        assert_eq!(card.order, 0);
    }
}
