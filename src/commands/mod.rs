//! Record Service Commands
//!
//! Bindings to the remote record service, organized by entity.
//! The service is an opaque CRUD store: list, create, patch, delete per
//! entity type. `HttpRecordService` speaks to it over REST;
//! `InMemoryRecordService` keeps the records in process.

mod card;
mod column;
mod http;
mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Card, CardId, Column, ColumnId};

pub use card::CardPatch;
pub use column::ColumnPatch;
pub use http::HttpRecordService;
pub use memory::InMemoryRecordService;

/// Remote record service for columns and cards
///
/// All operations are async; implementations must be shareable across tasks
/// since batch reorders issue their calls concurrently.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// `GET /columns`
    async fn list_columns(&self) -> Result<Vec<Column>>;

    /// `POST /columns` with the full record (client-assigned id)
    async fn create_column(&self, column: &Column) -> Result<Column>;

    /// `PATCH /columns/{id}`
    async fn patch_column(&self, id: &ColumnId, patch: &ColumnPatch) -> Result<Column>;

    /// `DELETE /columns/{id}`
    async fn delete_column(&self, id: &ColumnId) -> Result<()>;

    /// `GET /cards`
    async fn list_cards(&self) -> Result<Vec<Card>>;

    /// `POST /cards` with the full record (client-assigned id)
    async fn create_card(&self, card: &Card) -> Result<Card>;

    /// `PATCH /cards/{id}`
    async fn patch_card(&self, id: &CardId, patch: &CardPatch) -> Result<Card>;

    /// `DELETE /cards/{id}`
    async fn delete_card(&self, id: &CardId) -> Result<()>;
}
