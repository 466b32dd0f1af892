use core::fmt;

use crate::allocator::{Allocator, Global};
use crate::compare::Natural;
use crate::raw::{Handle, RawAvlTree};

use super::Position;

/// A bidirectional cursor over an [`AvlMap`](super::AvlMap).
///
/// A cursor sits either on an entry or at the end. [`move_next`](Cursor::move_next)
/// steps to the in-order successor and [`move_prev`](Cursor::move_prev) to the
/// predecessor. Moving past the last entry lands on the end, and moving back from
/// the end lands on the last entry, so the end joins the two ends of the map into
/// a ring.
///
/// Each step follows parent links and needs no stack. A single step is O(log n)
/// worst case and a full walk is O(n).
///
/// Two cursors compare equal when they sit on the same position.
///
/// # Examples
///
/// ```
/// use avl_collections::AvlMap;
///
/// let map = AvlMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
/// let mut cursor = map.cursor_at(map.find(&2));
/// assert_eq!(cursor.key_value(), Some((&2, &'b')));
///
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.is_end());
///
/// cursor.move_prev();
/// assert_eq!(cursor.key(), Some(&3));
/// ```
pub struct Cursor<'a, K, V, C = Natural, A: Allocator = Global> {
    tree: &'a RawAvlTree<K, V, C, A>,
    current: Handle,
}

impl<'a, K, V, C, A: Allocator> Cursor<'a, K, V, C, A> {
    pub(super) fn new(tree: &'a RawAvlTree<K, V, C, A>, current: Handle) -> Self {
        Self { tree, current }
    }

    /// The position the cursor is on.
    #[must_use]
    pub fn position(&self) -> Position {
        Position(self.current)
    }

    /// Returns `true` if the cursor is at the end.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_nil()
    }

    /// The key of the current entry, or `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    /// The value of the current entry, or `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// The current entry, or `None` at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        (!self.current.is_nil()).then(|| tree.entry(self.current))
    }

    /// Advances to the in-order successor. From the last entry this reaches the
    /// end; from the end it wraps to the first entry.
    pub fn move_next(&mut self) {
        self.current = self.tree.next(self.current);
    }

    /// Retreats to the in-order predecessor. From the end this reaches the last
    /// entry; from the first entry it reaches the end.
    pub fn move_prev(&mut self) {
        self.current = self.tree.prev(self.current);
    }

    /// The entry [`move_next`](Cursor::move_next) would land on.
    #[must_use]
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        let next = self.tree.next(self.current);
        let tree = self.tree;
        (!next.is_nil()).then(|| tree.entry(next))
    }

    /// The entry [`move_prev`](Cursor::move_prev) would land on.
    #[must_use]
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        let prev = self.tree.prev(self.current);
        let tree = self.tree;
        (!prev.is_nil()).then(|| tree.entry(prev))
    }
}

impl<K, V, C, A: Allocator> Clone for Cursor<'_, K, V, C, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            current: self.current,
        }
    }
}

impl<K, V, C, A: Allocator> PartialEq for Cursor<'_, K, V, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<K, V, C, A: Allocator> Eq for Cursor<'_, K, V, C, A> {}

impl<K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for Cursor<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}
