//! Board DragDrop
//!
//! Drag-and-drop state machine for a board of columns and cards.
//! Input agnostic: callers translate their own pointer or drag events into
//! the calls below.

use std::fmt;

/// Anything that can be picked up
pub trait Draggable: Clone {
    type Id: Clone + PartialEq + fmt::Debug;

    fn drag_id(&self) -> Self::Id;
}

/// What is being dragged
#[derive(Clone, Debug, PartialEq)]
pub enum DragSubject<C, K> {
    Column(C),
    Card(K),
}

/// Primary drag state
#[derive(Clone, Debug, PartialEq)]
pub enum DragState<C, K> {
    Idle,
    DraggingColumn(C),
    DraggingCard(K),
}

impl<C, K> Default for DragState<C, K> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Drop target types
#[derive(Clone, Debug, PartialEq)]
pub enum HoverTarget<CI, KI> {
    /// A column (its header for column drags, its card list for card drags)
    Column(CI),
    /// A card inside a column
    Card(KI),
}

/// Hover target keyed by the ids of the two draggable kinds
pub type Target<C, K> = HoverTarget<<C as Draggable>::Id, <K as Draggable>::Id>;

/// Computed drop action
#[derive(Clone, Debug, PartialEq)]
pub struct DropAction<C: Draggable, K: Draggable> {
    pub subject: DragSubject<C, K>,
    pub target: Target<C, K>,
}

/// DnD state: the primary state plus the auxiliary hover target
#[derive(Clone, Debug)]
pub struct DndState<C: Draggable, K: Draggable> {
    state: DragState<C, K>,
    hover: Option<Target<C, K>>,
}

impl<C: Draggable, K: Draggable> Default for DndState<C, K> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            hover: None,
        }
    }
}

impl<C: Draggable, K: Draggable> DndState<C, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState<C, K> {
        &self.state
    }

    pub fn hover(&self) -> Option<&Target<C, K>> {
        self.hover.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        !self.is_idle()
    }

    pub fn dragged_column(&self) -> Option<&C> {
        match &self.state {
            DragState::DraggingColumn(c) => Some(c),
            _ => None,
        }
    }

    pub fn dragged_card(&self) -> Option<&K> {
        match &self.state {
            DragState::DraggingCard(k) => Some(k),
            _ => None,
        }
    }

    /// Drag-start over a column handle. Ignored while another drag is live.
    pub fn start_column_drag(&mut self, column: C) -> bool {
        self.start(DragSubject::Column(column))
    }

    /// Drag-start over a card. Ignored while another drag is live.
    pub fn start_card_drag(&mut self, card: K) -> bool {
        self.start(DragSubject::Card(card))
    }

    fn start(&mut self, subject: DragSubject<C, K>) -> bool {
        if self.is_dragging() {
            tracing::trace!("drag start ignored, drag already in progress");
            return false;
        }
        self.hover = None;
        self.state = match subject {
            DragSubject::Column(c) => {
                tracing::debug!(column = ?c.drag_id(), "column drag started");
                DragState::DraggingColumn(c)
            }
            DragSubject::Card(k) => {
                tracing::debug!(card = ?k.drag_id(), "card drag started");
                DragState::DraggingCard(k)
            }
        };
        true
    }

    /// Hover over a column. Column drags ignore their own column.
    pub fn hover_column(&mut self, id: C::Id) {
        match &self.state {
            DragState::DraggingColumn(c) if c.drag_id() == id => {}
            DragState::DraggingColumn(_) | DragState::DraggingCard(_) => {
                self.hover = Some(HoverTarget::Column(id));
            }
            _ => {}
        }
    }

    /// Hover over a card. Only card drags record it, and never over themselves.
    pub fn hover_card(&mut self, id: K::Id) {
        if let DragState::DraggingCard(k) = &self.state {
            if k.drag_id() != id {
                self.hover = Some(HoverTarget::Card(id));
            }
        }
    }

    /// Pointer left the current target
    pub fn leave(&mut self) {
        if self.is_dragging() {
            self.hover = None;
        }
    }

    /// Drop at an explicit target. Always returns to `Idle`; yields the
    /// dragged subject only if a drag was in progress.
    pub fn drop_on(&mut self, target: Target<C, K>) -> Option<DropAction<C, K>> {
        self.finish().map(|subject| DropAction { subject, target })
    }

    /// Release the pointer: drop onto the hovered target, if any
    pub fn release(&mut self) -> Option<DropAction<C, K>> {
        let target = self.hover.take();
        let subject = self.finish();
        match (subject, target) {
            (Some(subject), Some(target)) => Some(DropAction { subject, target }),
            _ => None,
        }
    }

    /// End the drag and hand back what was dragged
    pub fn finish(&mut self) -> Option<DragSubject<C, K>> {
        let state = std::mem::take(&mut self.state);
        self.hover = None;
        match state {
            DragState::DraggingColumn(c) => Some(DragSubject::Column(c)),
            DragState::DraggingCard(k) => Some(DragSubject::Card(k)),
            DragState::Idle => None,
        }
    }

    /// End drag operation, whether or not anything was dropped
    pub fn end_drag(&mut self) {
        if !self.is_idle() {
            tracing::debug!("drag ended");
        }
        self.state = DragState::Idle;
        self.hover = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Col(&'static str);

    #[derive(Clone, Debug, PartialEq)]
    struct Crd(&'static str);

    impl Draggable for Col {
        type Id = &'static str;
        fn drag_id(&self) -> Self::Id {
            self.0
        }
    }

    impl Draggable for Crd {
        type Id = &'static str;
        fn drag_id(&self) -> Self::Id {
            self.0
        }
    }

    type Dnd = DndState<Col, Crd>;

    #[test]
    fn test_column_drag_ignores_self_hover() {
        let mut dnd = Dnd::new();
        assert!(dnd.start_column_drag(Col("a")));
        dnd.hover_column("a");
        assert_eq!(dnd.hover(), None);
        dnd.hover_column("b");
        assert_eq!(dnd.hover(), Some(&HoverTarget::Column("b")));
    }

    #[test]
    fn test_card_drag_hover_targets() {
        let mut dnd = Dnd::new();
        dnd.start_card_drag(Crd("k"));
        dnd.hover_card("k");
        assert_eq!(dnd.hover(), None);
        dnd.hover_card("j");
        assert_eq!(dnd.hover(), Some(&HoverTarget::Card("j")));
        dnd.hover_column("todo");
        assert_eq!(dnd.hover(), Some(&HoverTarget::Column("todo")));
        dnd.leave();
        assert_eq!(dnd.hover(), None);
    }

    #[test]
    fn test_hover_while_idle_is_ignored() {
        let mut dnd = Dnd::new();
        dnd.hover_column("a");
        dnd.hover_card("k");
        assert_eq!(dnd.hover(), None);
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut dnd = Dnd::new();
        dnd.start_card_drag(Crd("k"));
        assert!(!dnd.start_column_drag(Col("a")));
        assert_eq!(dnd.dragged_card(), Some(&Crd("k")));
        assert_eq!(dnd.dragged_column(), None);
    }

    #[test]
    fn test_drop_returns_to_idle() {
        let mut dnd = Dnd::new();
        dnd.start_column_drag(Col("a"));
        dnd.hover_column("b");
        let action = dnd.drop_on(HoverTarget::Column("b")).unwrap();
        assert_eq!(action.subject, DragSubject::Column(Col("a")));
        assert_eq!(action.target, HoverTarget::Column("b"));
        assert!(dnd.is_idle());
        assert_eq!(dnd.hover(), None);
    }

    #[test]
    fn test_drop_without_drag_is_none() {
        let mut dnd = Dnd::new();
        assert!(dnd.drop_on(HoverTarget::Column("b")).is_none());
    }

    #[test]
    fn test_release_uses_hover() {
        let mut dnd = Dnd::new();
        dnd.start_card_drag(Crd("k"));
        assert!(dnd.release().is_none());
        assert!(dnd.is_idle());

        dnd.start_card_drag(Crd("k"));
        dnd.hover_card("j");
        let action = dnd.release().unwrap();
        assert_eq!(action.target, HoverTarget::Card("j"));
    }

    #[test]
    fn test_end_drag_clears_everything() {
        let mut dnd = Dnd::new();
        dnd.start_card_drag(Crd("k"));
        dnd.hover_card("j");
        dnd.end_drag();
        assert!(dnd.is_idle());
        assert_eq!(dnd.hover(), None);
    }
}
