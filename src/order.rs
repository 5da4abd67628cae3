//! Order Index
//!
//! Pure functions over the zero-based `order` field of a scope
//! (all columns, or the cards sharing one `column_id`).
//! Nothing here touches the store or the network.

use crate::models::{Card, CardId, Column, ColumnId};

/// Something ranked by an `order` within its scope
pub trait Ordered {
    type Key: Clone + Eq;

    fn key(&self) -> &Self::Key;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

impl Ordered for Column {
    type Key = ColumnId;

    fn key(&self) -> &ColumnId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl Ordered for Card {
    type Key = CardId;

    fn key(&self) -> &CardId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// One member's order change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderShift<K> {
    pub key: K,
    pub from: u32,
    pub to: u32,
}

/// Order for an entity appended to a scope of `scope_len` members
pub fn next_order(scope_len: usize) -> u32 {
    scope_len as u32
}

/// Members sorted by order. Stable, so ties keep their storage order.
pub fn sort_by_order<'a, T, I>(items: I) -> Vec<&'a T>
where
    T: Ordered + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&T> = items.into_iter().collect();
    sorted.sort_by_key(|item| item.order());
    sorted
}

/// Splice `moved` out of `sequence` and reinsert it at `target_index`.
///
/// `target_index` is read against the original sequence, so moving the first
/// of `[a, b, c]` to index 1 yields `[b, a, c]`. Returns the sequence unchanged
/// when `moved` is not a member.
pub fn move_to<K: Clone + PartialEq>(sequence: &[K], moved: &K, target_index: usize) -> Vec<K> {
    let mut result = sequence.to_vec();
    let Some(source_index) = result.iter().position(|k| k == moved) else {
        return result;
    };
    let item = result.remove(source_index);
    let at = target_index.min(result.len());
    result.insert(at, item);
    result
}

/// Assign every member its index as order
pub fn renumber<K: Clone>(sequence: &[K]) -> Vec<(K, u32)> {
    sequence
        .iter()
        .enumerate()
        .map(|(index, key)| (key.clone(), index as u32))
        .collect()
}

/// Members at or past `at` (other than `excluding`) moved up by one to make
/// room for an insert at `at`.
pub fn shift_from<'a, T, I>(members: I, at: u32, excluding: &T::Key) -> Vec<OrderShift<T::Key>>
where
    T: Ordered + 'a,
    I: IntoIterator<Item = &'a T>,
{
    members
        .into_iter()
        .filter(|m| m.order() >= at && m.key() != excluding)
        .map(|m| OrderShift {
            key: m.key().clone(),
            from: m.order(),
            to: m.order() + 1,
        })
        .collect()
}

/// True when `orders` is exactly `{0, .., n-1}`
pub fn is_dense<I: IntoIterator<Item = u32>>(orders: I) -> bool {
    let mut orders: Vec<u32> = orders.into_iter().collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, &o)| o == i as u32)
}
