//! Reorder Engine
//!
//! Turns a completed drop into an order assignment. Planning is pure: it
//! reads the store and returns what should change, or `None` for a drop that
//! changes nothing. Applying and persisting the plan is the caller's job.

use tracing::debug;

use crate::commands::{CardPatch, ColumnPatch};
use crate::error::{BoardError, Result};
use crate::models::{CardId, CardScope, Column, ColumnId};
use crate::mutation::RecordOp;
use crate::order::{move_to, renumber, shift_from, sort_by_order, OrderShift};
use crate::store::BoardStore;

/// New order for every column after a column drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReorder {
    pub moved: ColumnId,
    pub target: ColumnId,
    /// Every column, in its new position
    pub orders: Vec<(ColumnId, u32)>,
}

impl ColumnReorder {
    /// One order patch per column. A single shift moves every column between
    /// source and target, so the whole scope is rewritten.
    pub fn ops(&self) -> Vec<RecordOp> {
        self.orders
            .iter()
            .map(|(id, order)| RecordOp::PatchColumn {
                id: id.clone(),
                patch: ColumnPatch::order(*order),
            })
            .collect()
    }
}

/// Plan dropping `dragged` onto `target`'s position
pub fn plan_column_drop(
    columns: &[Column],
    dragged: &ColumnId,
    target: &ColumnId,
) -> Result<Option<ColumnReorder>> {
    if dragged == target {
        debug!(column_id = %dragged, "column dropped on itself, nothing to do");
        return Ok(None);
    }

    let sequence: Vec<ColumnId> = sort_by_order(columns)
        .into_iter()
        .map(|c| c.id.clone())
        .collect();
    if !sequence.contains(dragged) {
        return Err(BoardError::ColumnNotFound {
            id: dragged.to_string(),
        });
    }
    let target_index = sequence
        .iter()
        .position(|id| id == target)
        .ok_or_else(|| BoardError::ColumnNotFound {
            id: target.to_string(),
        })?;

    let reordered = move_to(&sequence, dragged, target_index);
    Ok(Some(ColumnReorder {
        moved: dragged.clone(),
        target: target.clone(),
        orders: renumber(&reordered),
    }))
}

/// A card's new scope and order, plus the cards pushed down to make room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMove {
    pub card_id: CardId,
    pub from: CardScope,
    pub from_order: u32,
    pub to: ColumnId,
    pub order: u32,
    pub shifted: Vec<OrderShift<CardId>>,
}

impl CardMove {
    pub fn is_cross_scope(&self) -> bool {
        self.from.as_ref() != Some(&self.to)
    }

    /// Order patches for the shifted cards
    pub fn shift_ops(&self) -> Vec<RecordOp> {
        self.shifted
            .iter()
            .map(|shift| RecordOp::PatchCard {
                id: shift.key.clone(),
                patch: CardPatch::order(shift.to),
            })
            .collect()
    }

    /// Scope and order patch for the moved card
    pub fn placement_op(&self) -> RecordOp {
        RecordOp::PatchCard {
            id: self.card_id.clone(),
            patch: CardPatch::placement(Some(self.to.clone()), self.order),
        }
    }
}

/// Plan dropping card `dragged` into `target_column`, onto `target_card`'s
/// position when given, or at the end of the column otherwise.
///
/// `target_column == None` is the unassigned pseudo-column, which accepts no
/// drops. The origin scope is left as is: the gap the card leaves behind is
/// not closed.
pub fn plan_card_drop(
    store: &BoardStore,
    dragged: &CardId,
    target_column: Option<&ColumnId>,
    target_card: Option<&CardId>,
) -> Result<Option<CardMove>> {
    let card = store
        .find_card(dragged)
        .ok_or_else(|| BoardError::CardNotFound {
            id: dragged.to_string(),
        })?;

    let Some(to) = target_column else {
        debug!(card_id = %dragged, "unassigned column is not a drop target");
        return Ok(None);
    };
    if !store.column_exists(to) {
        return Err(BoardError::ColumnNotFound { id: to.to_string() });
    }
    if target_card == Some(dragged) {
        debug!(card_id = %dragged, "card dropped on itself, nothing to do");
        return Ok(None);
    }

    let same_scope = card.in_scope(Some(to));
    let destination = store.cards_in_scope(Some(to));
    let resolved = target_card.and_then(|id| destination.iter().find(|k| &k.id == id));

    let (order, shifted) = match resolved {
        Some(target) => {
            if same_scope && target.order == card.order {
                debug!(card_id = %dragged, "card already at target position");
                return Ok(None);
            }
            let order = target.order;
            (order, shift_from(destination.iter().copied(), order, dragged))
        }
        None => {
            if let Some(id) = target_card {
                debug!(card_id = %id, column_id = %to, "target card not in column, appending");
            }
            let order = destination.len() as u32;
            if same_scope && order == card.order {
                debug!(card_id = %dragged, "card already at append position");
                return Ok(None);
            }
            (order, Vec::new())
        }
    };

    Ok(Some(CardMove {
        card_id: card.id.clone(),
        from: card.scope(),
        from_order: card.order,
        to: to.clone(),
        order,
        shifted,
    }))
}
