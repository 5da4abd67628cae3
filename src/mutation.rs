//! Board Mutations
//!
//! Two-phase commands. `plan` turns an intended mutation into a
//! [`StateDelta`]: the remote calls to issue, grouped into sequential stages
//! of concurrent calls, and the local effect to apply. The store applies the
//! optimistic part right away and reconciles the rest once the calls settle.

use tracing::debug;

use crate::commands::{CardPatch, ColumnPatch};
use crate::error::{BoardError, Result};
use crate::models::{Card, CardId, Column, ColumnId};
use crate::order::next_order;
use crate::reorder::{plan_card_drop, plan_column_drop, CardMove, ColumnReorder};
use crate::store::BoardStore;

/// Fields submitted by the card edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEdit {
    pub title: String,
    pub description: String,
    /// `None` is the form's "No Column" choice
    pub column_id: Option<ColumnId>,
}

/// An intended change to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateColumn {
        title: String,
    },
    RenameColumn {
        id: ColumnId,
        title: String,
    },
    DeleteColumn {
        id: ColumnId,
    },
    CreateCard {
        column_id: ColumnId,
        title: String,
        description: String,
    },
    EditCard {
        id: CardId,
        edit: CardEdit,
    },
    DeleteCard {
        id: CardId,
    },
    DropColumn {
        dragged: ColumnId,
        target: ColumnId,
    },
    DropCard {
        dragged: CardId,
        target_column: Option<ColumnId>,
        target_card: Option<CardId>,
    },
}

/// One remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOp {
    CreateColumn(Column),
    PatchColumn { id: ColumnId, patch: ColumnPatch },
    DeleteColumn(ColumnId),
    CreateCard(Card),
    PatchCard { id: CardId, patch: CardPatch },
    DeleteCard(CardId),
}

impl RecordOp {
    /// `"METHOD /path"` form, for logs
    pub fn label(&self) -> String {
        match self {
            Self::CreateColumn(_) => "POST /columns".to_string(),
            Self::PatchColumn { id, .. } => format!("PATCH /columns/{}", id),
            Self::DeleteColumn(id) => format!("DELETE /columns/{}", id),
            Self::CreateCard(_) => "POST /cards".to_string(),
            Self::PatchCard { id, .. } => format!("PATCH /cards/{}", id),
            Self::DeleteCard(id) => format!("DELETE /cards/{}", id),
        }
    }
}

/// What the record service answered for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerRecord {
    Column(Column),
    Card(Card),
    Deleted,
}

/// Local consequence of a delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalEffect {
    /// Replace local records with the server's representation
    Reconcile,
    /// Applied before persisting; nothing left to do afterwards
    ReorderColumns(ColumnReorder),
    /// Applied in one update after every patch succeeded
    MoveCard(CardMove),
    RemoveColumn(ColumnId),
    RemoveCard(CardId),
}

/// Remote calls plus the local effect of one mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDelta {
    stages: Vec<Vec<RecordOp>>,
    effect: LocalEffect,
}

impl StateDelta {
    pub fn new(effect: LocalEffect) -> Self {
        Self {
            stages: Vec::new(),
            effect,
        }
    }

    /// Append a stage of concurrent calls; empty stages are dropped
    pub fn then(mut self, ops: Vec<RecordOp>) -> Self {
        if !ops.is_empty() {
            self.stages.push(ops);
        }
        self
    }

    pub fn stages(&self) -> &[Vec<RecordOp>] {
        &self.stages
    }

    pub fn ops(&self) -> impl Iterator<Item = &RecordOp> {
        self.stages.iter().flatten()
    }

    pub fn effect(&self) -> &LocalEffect {
        &self.effect
    }

    /// Number of remote calls
    pub fn len(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the local effect lands before the remote calls
    pub fn is_optimistic(&self) -> bool {
        matches!(self.effect, LocalEffect::ReorderColumns(_))
    }
}

/// Plan a mutation against the current store.
///
/// Returns `Ok(None)` for logical no-ops, which must not reach the service.
pub fn plan(store: &BoardStore, mutation: Mutation) -> Result<Option<StateDelta>> {
    let delta = match mutation {
        Mutation::CreateColumn { title } => {
            let column = Column::new(title, next_order(store.columns().len()));
            debug!(column_id = %column.id, order = column.order, "planned column create");
            StateDelta::new(LocalEffect::Reconcile).then(vec![RecordOp::CreateColumn(column)])
        }
        Mutation::RenameColumn { id, title } => {
            let column = store
                .find_column(&id)
                .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })?;
            let patch = ColumnPatch::rename(title, column.order);
            StateDelta::new(LocalEffect::Reconcile).then(vec![RecordOp::PatchColumn { id, patch }])
        }
        Mutation::DeleteColumn { id } => {
            if !store.column_exists(&id) {
                return Err(BoardError::ColumnNotFound { id: id.to_string() });
            }
            StateDelta::new(LocalEffect::RemoveColumn(id.clone()))
                .then(vec![RecordOp::DeleteColumn(id)])
        }
        Mutation::CreateCard {
            column_id,
            title,
            description,
        } => {
            if !store.column_exists(&column_id) {
                return Err(BoardError::ColumnNotFound {
                    id: column_id.to_string(),
                });
            }
            let order = next_order(store.scope_len(Some(&column_id)));
            let card = Card::new(Some(column_id), title, description, order);
            debug!(card_id = %card.id, order, "planned card create");
            StateDelta::new(LocalEffect::Reconcile).then(vec![RecordOp::CreateCard(card)])
        }
        Mutation::EditCard { id, edit } => {
            let card = store
                .find_card(&id)
                .ok_or_else(|| BoardError::CardNotFound { id: id.to_string() })?;
            if let Some(column_id) = &edit.column_id {
                if !store.column_exists(column_id) {
                    return Err(BoardError::ColumnNotFound {
                        id: column_id.to_string(),
                    });
                }
            }
            let patch = CardPatch::full(edit.title, edit.description, edit.column_id, card.order);
            StateDelta::new(LocalEffect::Reconcile).then(vec![RecordOp::PatchCard { id, patch }])
        }
        Mutation::DeleteCard { id } => {
            if store.find_card(&id).is_none() {
                return Err(BoardError::CardNotFound { id: id.to_string() });
            }
            StateDelta::new(LocalEffect::RemoveCard(id.clone())).then(vec![RecordOp::DeleteCard(id)])
        }
        Mutation::DropColumn { dragged, target } => {
            let Some(reorder) = plan_column_drop(store.columns(), &dragged, &target)? else {
                return Ok(None);
            };
            let ops = reorder.ops();
            StateDelta::new(LocalEffect::ReorderColumns(reorder)).then(ops)
        }
        Mutation::DropCard {
            dragged,
            target_column,
            target_card,
        } => {
            let Some(mv) = plan_card_drop(
                store,
                &dragged,
                target_column.as_ref(),
                target_card.as_ref(),
            )?
            else {
                return Ok(None);
            };
            let shifts = mv.shift_ops();
            let placement = mv.placement_op();
            StateDelta::new(LocalEffect::MoveCard(mv))
                .then(shifts)
                .then(vec![placement])
        }
    };
    Ok(Some(delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardStore {
        BoardStore::with_records(
            vec![
                Column {
                    id: "x".into(),
                    title: "X".into(),
                    order: 0,
                },
                Column {
                    id: "y".into(),
                    title: "Y".into(),
                    order: 1,
                },
            ],
            vec![
                Card {
                    id: "a".into(),
                    column_id: Some("x".into()),
                    title: "A".into(),
                    description: String::new(),
                    order: 0,
                },
                Card {
                    id: "c".into(),
                    column_id: Some("y".into()),
                    title: "C".into(),
                    description: String::new(),
                    order: 0,
                },
            ],
        )
    }

    #[test]
    fn test_create_card_appends_to_scope() {
        let delta = plan(
            &board(),
            Mutation::CreateCard {
                column_id: "x".into(),
                title: "New".into(),
                description: String::new(),
            },
        )
        .unwrap()
        .unwrap();

        let op = delta.ops().next().cloned();
        match op {
            Some(RecordOp::CreateCard(card)) => {
                assert_eq!(card.order, 1);
                assert_eq!(card.column_id, Some(ColumnId::from("x")));
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_create_card_requires_column() {
        let result = plan(
            &board(),
            Mutation::CreateCard {
                column_id: "nope".into(),
                title: "New".into(),
                description: String::new(),
            },
        );
        assert!(matches!(result, Err(BoardError::ColumnNotFound { .. })));
    }

    #[test]
    fn test_edit_card_keeps_order_and_may_unassign() {
        let delta = plan(
            &board(),
            Mutation::EditCard {
                id: "a".into(),
                edit: CardEdit {
                    title: "A2".into(),
                    description: "d".into(),
                    column_id: None,
                },
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            delta.ops().next(),
            Some(&RecordOp::PatchCard {
                id: "a".into(),
                patch: CardPatch::full("A2", "d", None, 0),
            })
        );
    }

    #[test]
    fn test_card_drop_stages_shifts_before_placement() {
        let delta = plan(
            &board(),
            Mutation::DropCard {
                dragged: "a".into(),
                target_column: Some("y".into()),
                target_card: Some("c".into()),
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(delta.stages().len(), 2);
        assert_eq!(delta.stages()[0][0].label(), "PATCH /cards/c");
        assert_eq!(delta.stages()[1][0].label(), "PATCH /cards/a");
        assert!(!delta.is_optimistic());
    }

    #[test]
    fn test_column_drop_is_optimistic_full_rewrite() {
        let delta = plan(
            &board(),
            Mutation::DropColumn {
                dragged: "y".into(),
                target: "x".into(),
            },
        )
        .unwrap()
        .unwrap();

        assert!(delta.is_optimistic());
        assert_eq!(delta.len(), 2);
    }

    #[test]
    fn test_noop_drop_plans_nothing() {
        let delta = plan(
            &board(),
            Mutation::DropColumn {
                dragged: "x".into(),
                target: "x".into(),
            },
        )
        .unwrap();
        assert!(delta.is_none());
    }
}
