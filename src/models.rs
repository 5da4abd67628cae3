//! Board Models
//!
//! Data structures matching the remote record service.

use serde::{Deserialize, Serialize};
use std::fmt;

// ========================
// Identity
// ========================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh client-side identity (UUID v4)
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Column identity, assigned by the client at creation and never changed
    ColumnId
);

string_id!(
    /// Card identity, assigned by the client at creation and never changed
    CardId
);

/// The ordering scope of a card: its owning column, or `None` for unassigned
pub type CardScope = Option<ColumnId>;

// ========================
// Records
// ========================

/// Column data structure (matches remote record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Position among all columns
    pub order: u32,
}

impl Column {
    /// Create a column with a freshly generated id
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            id: ColumnId::generate(),
            title: title.into(),
            order,
        }
    }
}

/// Card data structure (matches remote record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Owning column; `None` means unassigned
    #[serde(rename = "columnId")]
    pub column_id: Option<ColumnId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Position within `column_id`
    pub order: u32,
}

impl Card {
    /// Create a card with a freshly generated id
    pub fn new(
        column_id: Option<ColumnId>,
        title: impl Into<String>,
        description: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: CardId::generate(),
            column_id,
            title: title.into(),
            description: description.into(),
            order,
        }
    }

    /// The scope this card is ordered within
    pub fn scope(&self) -> CardScope {
        self.column_id.clone()
    }

    pub fn in_scope(&self, scope: Option<&ColumnId>) -> bool {
        self.column_id.as_ref() == scope
    }
}
