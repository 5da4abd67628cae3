//! Sync Adapter
//!
//! Issues the remote calls of a [`StateDelta`]. Stages run one after the
//! other; the calls inside a stage run concurrently and are all awaited
//! before the next stage starts. Nothing is rolled back on failure.

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::commands::RecordService;
use crate::error::{BoardError, Result};
use crate::models::{Card, Column};
use crate::mutation::{RecordOp, ServerRecord, StateDelta};

/// Issue one remote call
pub async fn execute(service: &dyn RecordService, op: &RecordOp) -> Result<ServerRecord> {
    debug!(call = %op.label(), "issuing remote call");
    let record = match op {
        RecordOp::CreateColumn(column) => ServerRecord::Column(service.create_column(column).await?),
        RecordOp::PatchColumn { id, patch } => {
            ServerRecord::Column(service.patch_column(id, patch).await?)
        }
        RecordOp::DeleteColumn(id) => {
            service.delete_column(id).await?;
            ServerRecord::Deleted
        }
        RecordOp::CreateCard(card) => ServerRecord::Card(service.create_card(card).await?),
        RecordOp::PatchCard { id, patch } => ServerRecord::Card(service.patch_card(id, patch).await?),
        RecordOp::DeleteCard(id) => {
            service.delete_card(id).await?;
            ServerRecord::Deleted
        }
    };
    Ok(record)
}

/// Persist every call of a delta and collect the server's records in op order.
///
/// A failed stage stops the delta: later stages are not issued. Calls of the
/// failed stage that did succeed stay applied remotely.
pub async fn persist(service: &dyn RecordService, delta: &StateDelta) -> Result<Vec<ServerRecord>> {
    let mut records = Vec::with_capacity(delta.len());

    for (stage, ops) in delta.stages().iter().enumerate() {
        let results = join_all(ops.iter().map(|op| execute(service, op))).await;
        let total = results.len();

        let mut failures = Vec::new();
        for (op, result) in ops.iter().zip(results) {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(call = %op.label(), stage, error = %e, "remote call failed");
                    failures.push(e);
                }
            }
        }

        if !failures.is_empty() {
            let failed = failures.len();
            let first = failures.remove(0);
            if total == 1 {
                return Err(first);
            }
            return Err(BoardError::Batch {
                failed,
                total,
                first: Box::new(first),
            });
        }
    }

    Ok(records)
}

/// Fetch every column and card; both lists are requested concurrently
pub async fn load_board(service: &dyn RecordService) -> Result<(Vec<Column>, Vec<Card>)> {
    let (columns, cards) = tokio::try_join!(service.list_columns(), service.list_cards())?;
    info!(columns = columns.len(), cards = cards.len(), "board loaded");
    Ok((columns, cards))
}
