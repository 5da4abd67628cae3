//! Column Commands
//!
//! Argument structs for column patches.

use serde::Serialize;

use crate::models::Column;

/// Partial column update; absent fields are left untouched remotely
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl ColumnPatch {
    /// Order-only patch, used by full-scope reorders
    pub fn order(order: u32) -> Self {
        Self {
            title: None,
            order: Some(order),
        }
    }

    /// Rename patch; the edit form resubmits the current order alongside
    pub fn rename(title: impl Into<String>, order: u32) -> Self {
        Self {
            title: Some(title.into()),
            order: Some(order),
        }
    }

    /// Apply to a local copy of the record
    pub fn apply_to(&self, column: &mut Column) {
        if let Some(title) = &self.title {
            column.title = title.clone();
        }
        if let Some(order) = self.order {
            column.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_patch_omits_title() {
        let json = serde_json::to_string(&ColumnPatch::order(3)).unwrap();
        assert_eq!(json, r#"{"order":3}"#);
    }

    #[test]
    fn test_rename_patch_sends_both_fields() {
        let json = serde_json::to_value(ColumnPatch::rename("Done", 2)).unwrap();
        assert_eq!(json["title"], "Done");
        assert_eq!(json["order"], 2);
    }
}
