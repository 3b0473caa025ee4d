//! Dense, ID-indexed storage for runtime entities.
//!
//! The scheduler keys its module hierarchy and callback registry by opaque
//! ID newtypes. [`Arena`] gives those tables append-only allocation, O(1)
//! lookup, and stable IDs for the lifetime of the table.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::Index;

/// Opaque ID newtypes that index an [`Arena`].
///
/// Implementors map losslessly to and from a `u32` slot index.
pub trait EntityId: Copy {
    /// Creates an ID from a raw slot index.
    fn from_index(index: u32) -> Self;

    /// Returns the raw slot index.
    fn index(self) -> u32;
}

/// An append-only, ID-indexed container.
///
/// Items are never removed or reordered, so an ID handed out by
/// [`insert`](Arena::insert) stays valid as long as the arena lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: EntityId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _id: PhantomData<I>,
}

impl<I: EntityId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EntityId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Appends an item and returns its ID.
    pub fn insert(&mut self, item: T) -> I {
        let id = I::from_index(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Looks up an item, returning `None` for an ID this arena never issued.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.items.get(id.index() as usize)
    }

    /// Returns a mutable reference to an item.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.index() as usize]
    }

    /// Returns the number of items stored.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates `(ID, &item)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_index(i as u32), item))
    }

    /// Iterates item references in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: EntityId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.items[id.index() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    struct TestId(u32);

    impl EntityId for TestId {
        fn from_index(index: u32) -> Self {
            Self(index)
        }

        fn index(self) -> u32 {
            self.0
        }
    }

    #[test]
    fn insert_returns_sequential_ids() {
        let mut arena: Arena<TestId, &str> = Arena::new();
        assert_eq!(arena.insert("a"), TestId(0));
        assert_eq!(arena.insert("b"), TestId(1));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn index_and_try_get() {
        let mut arena: Arena<TestId, i32> = Arena::new();
        let id = arena.insert(7);
        assert_eq!(arena[id], 7);
        assert_eq!(arena.try_get(TestId(5)), None);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena: Arena<TestId, i32> = Arena::new();
        let id = arena.insert(1);
        *arena.get_mut(id) += 10;
        assert_eq!(arena[id], 11);
    }

    #[test]
    fn iter_in_insertion_order() {
        let mut arena: Arena<TestId, char> = Arena::new();
        arena.insert('x');
        arena.insert('y');
        let collected: Vec<_> = arena.iter().collect();
        assert_eq!(collected, vec![(TestId(0), &'x'), (TestId(1), &'y')]);
        assert_eq!(arena.values().count(), 2);
    }

    #[test]
    fn empty_arena() {
        let arena: Arena<TestId, ()> = Arena::default();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
    }
}
