//! Kanban Board Engine
//!
//! Ordering and reassignment of columns and cards on a kanban board, with
//! optimistic local updates persisted to a remote record service.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod mutation;
pub mod order;
pub mod reorder;
pub mod store;
pub mod sync;

pub use commands::{HttpRecordService, InMemoryRecordService, RecordService};
pub use config::BoardConfig;
pub use context::BoardContext;
pub use error::{BoardError, Result};
pub use models::{Card, CardId, Column, ColumnId};
pub use mutation::{CardEdit, Mutation};
