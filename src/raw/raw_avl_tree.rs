use core::borrow::Borrow;
use core::cmp::{self, Ordering};
use core::ptr;

use smallvec::{SmallVec, smallvec};

use crate::allocator::Allocator;
use crate::compare::Compare;
use crate::error::Result;
use crate::vector::Vector;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// The AVL tree backing `AvlMap`.
///
/// Nodes and values live in two arenas so that mutable iteration can hand out
/// `&mut V` while the links are still being read. [`Handle::NIL`] plays the
/// sentinel: it is every missing child, the root's parent, and the past-the-end
/// position of iteration.
pub(crate) struct RawAvlTree<K, V, C, A: Allocator> {
    /// Tree nodes: key, value handle, links and height.
    nodes: Arena<Node<K>, A>,
    /// Values, addressed by `Node::value`.
    values: Arena<V, A>,
    root: Handle,
    comparator: C,
}

impl<K, V, C, A: Allocator + Clone> RawAvlTree<K, V, C, A> {
    pub(crate) fn try_with_capacity_in(capacity: usize, comparator: C, alloc: A) -> Result<Self> {
        Ok(Self {
            nodes: Arena::try_with_capacity_in(capacity, alloc.clone())?,
            values: Arena::try_with_capacity_in(capacity, alloc)?,
            root: Handle::NIL,
            comparator,
        })
    }

    pub(crate) fn with_capacity_in(capacity: usize, comparator: C, alloc: A) -> Self {
        Self {
            nodes: Arena::with_capacity_in(capacity, alloc.clone()),
            values: Arena::with_capacity_in(capacity, alloc),
            root: Handle::NIL,
            comparator,
        }
    }
}

impl<K, V, C, A: Allocator> RawAvlTree<K, V, C, A> {
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    pub(crate) fn capacity(&self) -> usize {
        cmp::min(self.nodes.capacity(), self.values.capacity())
    }

    /// Upper bound on the number of entries, limited by the handle width and
    /// by what the allocator can address.
    pub(crate) fn max_size(&self) -> usize {
        cmp::min(Handle::MAX, self.allocator().max_size::<Node<K>>())
    }

    pub(crate) fn allocator(&self) -> &A {
        self.nodes.allocator()
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Height of the whole tree; 0 when empty.
    pub(crate) fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.node(handle).key()
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(self.node(handle).value())
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.node(handle).value();
        self.values.get_mut(value)
    }

    #[inline]
    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (node.key(), self.values.get(node.value()))
    }

    /// Returns the key and a mutable pointer to the value of the node at `handle`.
    ///
    /// # Safety
    /// - `this` must point to a valid `RawAvlTree` that is not otherwise borrowed
    ///   mutably for the duration of the call.
    /// - The caller must have logical exclusive access to the value at `handle`.
    pub(crate) unsafe fn entry_mut_ptr<'a>(this: *mut Self, handle: Handle) -> (&'a K, &'a mut V)
    where
        Self: 'a,
    {
        // SAFETY: The node arena is only read. The value arena is reached through
        // `get_mut_ptr`, which borrows nothing but the slot for `handle`.
        unsafe {
            let node = (*ptr::addr_of!((*this).nodes)).get(handle);
            let value = Arena::get_mut_ptr(ptr::addr_of_mut!((*this).values), node.value());
            (node.key(), &mut *value)
        }
    }

    /// The smallest entry, or `NIL` when empty.
    pub(crate) fn first(&self) -> Handle {
        if self.root.is_nil() { Handle::NIL } else { self.min_of(self.root) }
    }

    /// The largest entry, or `NIL` when empty.
    pub(crate) fn last(&self) -> Handle {
        if self.root.is_nil() { Handle::NIL } else { self.max_of(self.root) }
    }

    fn min_of(&self, mut handle: Handle) -> Handle {
        loop {
            let left = self.node(handle).left();
            if left.is_nil() {
                return handle;
            }
            handle = left;
        }
    }

    fn max_of(&self, mut handle: Handle) -> Handle {
        loop {
            let right = self.node(handle).right();
            if right.is_nil() {
                return handle;
            }
            handle = right;
        }
    }

    /// In-order successor. The successor of the last entry is `NIL`, and the
    /// successor of `NIL` is the first entry.
    pub(crate) fn next(&self, handle: Handle) -> Handle {
        if handle.is_nil() {
            return self.first();
        }
        let right = self.node(handle).right();
        if !right.is_nil() {
            return self.min_of(right);
        }
        let mut child = handle;
        let mut parent = self.node(handle).parent();
        while !parent.is_nil() && self.node(parent).right() == child {
            child = parent;
            parent = self.node(parent).parent();
        }
        parent
    }

    /// In-order predecessor. The predecessor of the first entry is `NIL`, and the
    /// predecessor of `NIL` is the last entry.
    pub(crate) fn prev(&self, handle: Handle) -> Handle {
        if handle.is_nil() {
            return self.last();
        }
        let left = self.node(handle).left();
        if !left.is_nil() {
            return self.max_of(left);
        }
        let mut child = handle;
        let mut parent = self.node(handle).parent();
        while !parent.is_nil() && self.node(parent).left() == child {
            child = parent;
            parent = self.node(parent).parent();
        }
        parent
    }

    #[inline]
    fn height_of(&self, handle: Handle) -> u8 {
        if handle.is_nil() { 0 } else { self.node(handle).height() }
    }

    fn balance_factor(&self, handle: Handle) -> i16 {
        let node = self.node(handle);
        i16::from(self.height_of(node.left())) - i16::from(self.height_of(node.right()))
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.node(handle);
        let height = 1 + cmp::max(self.height_of(node.left()), self.height_of(node.right()));
        self.node_mut(handle).set_height(height);
    }

    fn set_parent(&mut self, child: Handle, parent: Handle) {
        if !child.is_nil() {
            self.node_mut(child).set_parent(parent);
        }
    }

    /// Points whatever referenced `old` from `parent` (or the root) at `new`.
    fn replace_child(&mut self, parent: Handle, old: Handle, new: Handle) {
        if parent.is_nil() {
            self.root = new;
        } else {
            let node = self.node_mut(parent);
            let side = node.side_of(old);
            node.set_child(side, new);
        }
    }

    /// Rotates `top` down towards `side`; its child on the other side takes its
    /// place. Returns the new subtree root.
    fn rotate(&mut self, top: Handle, side: Side) -> Handle {
        let pivot = self.node(top).child(side.opposite());
        let inner = self.node(pivot).child(side);
        let parent = self.node(top).parent();

        self.node_mut(top).set_child(side.opposite(), inner);
        self.set_parent(inner, top);

        self.replace_child(parent, top, pivot);
        self.node_mut(pivot).set_parent(parent);

        self.node_mut(pivot).set_child(side, top);
        self.node_mut(top).set_parent(pivot);

        self.update_height(top);
        self.update_height(pivot);
        tracing::trace!(?side, "rotated subtree");
        pivot
    }

    /// Restores heights and the AVL balance from `start` up to the root.
    fn rebalance(&mut self, start: Handle) {
        let mut current = start;
        while !current.is_nil() {
            let balance = self.balance_factor(current);
            let top = if balance > 1 {
                let left = self.node(current).left();
                if self.balance_factor(left) < 0 {
                    self.rotate(left, Side::Left);
                }
                self.rotate(current, Side::Right)
            } else if balance < -1 {
                let right = self.node(current).right();
                if self.balance_factor(right) > 0 {
                    self.rotate(right, Side::Right);
                }
                self.rotate(current, Side::Left)
            } else {
                self.update_height(current);
                current
            };
            current = self.node(top).parent();
        }
    }

    /// Allocates a leaf for `key`/`value` as the `side` child of `parent` (the
    /// root when `parent` is `NIL`) and rebalances.
    ///
    /// Both allocations happen before anything is linked, so on failure the tree
    /// is unchanged.
    fn link_leaf(&mut self, parent: Handle, side: Side, key: K, value: V) -> Result<Handle> {
        let value = self.values.try_alloc(value)?;
        let node = match self.nodes.try_alloc(Node::new(key, value, parent)) {
            Ok(node) => node,
            Err(err) => {
                self.values.free(value);
                return Err(err);
            }
        };
        if parent.is_nil() {
            self.root = node;
        } else {
            self.node_mut(parent).set_child(side, node);
        }
        self.rebalance(node);
        Ok(node)
    }

    /// Unlinks the node at `target`, rebalances, and returns its entry.
    ///
    /// A node with two children is replaced by its in-order predecessor, which is
    /// relinked into place; no other node changes handle.
    pub(crate) fn remove_at(&mut self, target: Handle) -> (K, V) {
        let (left, right, parent) = {
            let node = self.node(target);
            (node.left(), node.right(), node.parent())
        };

        let rebalance_from = if left.is_nil() || right.is_nil() {
            let child = if left.is_nil() { right } else { left };
            self.replace_child(parent, target, child);
            self.set_parent(child, parent);
            parent
        } else {
            let replacement = self.max_of(left);
            let replacement_parent = self.node(replacement).parent();
            let lowest_changed = if replacement_parent == target {
                replacement
            } else {
                let orphan = self.node(replacement).left();
                self.node_mut(replacement_parent).set_child(Side::Right, orphan);
                self.set_parent(orphan, replacement_parent);
                self.node_mut(replacement).set_child(Side::Left, left);
                self.set_parent(left, replacement);
                replacement_parent
            };
            self.node_mut(replacement).set_child(Side::Right, right);
            self.set_parent(right, replacement);
            self.replace_child(parent, target, replacement);
            self.node_mut(replacement).set_parent(parent);
            lowest_changed
        };

        let node = self.nodes.take(target);
        let value = self.values.take(node.value());
        self.rebalance(rebalance_from);
        (node.into_key(), value)
    }

    /// Destroys every entry in post-order, keeping the allocations.
    pub(crate) fn clear(&mut self) {
        let count = self.len();
        let mut current = self.root;
        while !current.is_nil() {
            let (left, right, parent) = {
                let node = self.node(current);
                (node.left(), node.right(), node.parent())
            };
            current = if !left.is_nil() {
                left
            } else if !right.is_nil() {
                right
            } else {
                // A leaf: detach it first so the walk never revisits it.
                if !parent.is_nil() {
                    let node = self.node_mut(parent);
                    let side = node.side_of(current);
                    node.set_child(side, Handle::NIL);
                } else {
                    self.root = Handle::NIL;
                }
                let node = self.nodes.take(current);
                self.values.free(node.value());
                parent
            };
        }
        self.root = Handle::NIL;
        self.nodes.clear();
        self.values.clear();
        if count > 0 {
            tracing::trace!(nodes = count, "cleared tree");
        }
    }

    /// Moves every entry out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vector(&mut self) -> Vector<(K, V), A>
    where
        A: Clone,
    {
        let mut order = Vector::with_capacity_in(self.len(), self.allocator().clone());
        let mut current = self.first();
        while !current.is_nil() {
            order.push_back(current);
            current = self.next(current);
        }

        let mut entries = Vector::with_capacity_in(order.len(), self.allocator().clone());
        for &handle in order.iter() {
            let node = self.nodes.take(handle);
            let value = self.values.take(node.value());
            entries.push_back((node.into_key(), value));
        }

        self.root = Handle::NIL;
        self.nodes.clear();
        self.values.clear();
        entries
    }

    /// Deep-copies `source` into this (empty) tree, preserving its shape.
    ///
    /// Heights are taken from `source`, so they only hold once the copy is
    /// complete. If a `clone` panics, the entries copied so far stay linked and
    /// are dropped with `self`, which must then be discarded.
    fn copy_from(&mut self, source: &Self)
    where
        K: Clone,
        V: Clone,
    {
        debug_assert!(self.is_empty(), "`RawAvlTree::copy_from()` - target is not empty!");
        if source.root.is_nil() {
            return;
        }

        // (source node, copied parent, side of the copied parent to link into)
        let mut pending: SmallVec<[(Handle, Handle, Side); 32]> = smallvec![(source.root, Handle::NIL, Side::Left)];
        while let Some((from, parent, side)) = pending.pop() {
            let node = source.node(from);
            let key = node.key().clone();
            let value = self.values.alloc(source.values.get(node.value()).clone());
            let mut copy = Node::new(key, value, parent);
            copy.set_height(node.height());
            let to = self.nodes.alloc(copy);
            if parent.is_nil() {
                self.root = to;
            } else {
                self.node_mut(parent).set_child(side, to);
            }

            if !node.right().is_nil() {
                pending.push((node.right(), to, Side::Right));
            }
            if !node.left().is_nil() {
                pending.push((node.left(), to, Side::Left));
            }
        }
        tracing::trace!(nodes = self.len(), "copied tree");
    }
}

impl<K, V, C, A: Allocator> RawAvlTree<K, V, C, A> {
    /// Finds the node whose key is equivalent to `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.node(current);
            current = match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(current),
            };
        }
        None
    }

    /// The first node whose key is not less than `key`, or `NIL`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut current = self.root;
        let mut bound = Handle::NIL;
        while !current.is_nil() {
            let node = self.node(current);
            if self.comparator.less(node.key().borrow(), key) {
                current = node.right();
            } else {
                bound = current;
                current = node.left();
            }
        }
        bound
    }

    /// The first node whose key is greater than `key`, or `NIL`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut current = self.root;
        let mut bound = Handle::NIL;
        while !current.is_nil() {
            let node = self.node(current);
            if self.comparator.less(key, node.key().borrow()) {
                bound = current;
                current = node.left();
            } else {
                current = node.right();
            }
        }
        bound
    }

    /// Inserts `key`/`value` unless an equivalent key exists.
    ///
    /// Returns the handle of the node holding the key and whether it was newly
    /// inserted. An existing entry is left untouched and `value` is dropped.
    pub(crate) fn try_insert(&mut self, key: K, value: V) -> Result<(Handle, bool)>
    where
        C: Compare<K>,
    {
        let mut parent = Handle::NIL;
        let mut side = Side::Left;
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.node(current);
            side = match self.comparator.compare(&key, node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok((current, false)),
            };
            parent = current;
            current = node.child(side);
        }
        self.link_leaf(parent, side, key, value).map(|node| (node, true))
    }

    /// Like [`try_insert`](Self::try_insert), but skips the descent when `key`
    /// belongs immediately after `hint`.
    pub(crate) fn try_insert_hint(&mut self, hint: Handle, key: K, value: V) -> Result<(Handle, bool)>
    where
        C: Compare<K>,
    {
        if !hint.is_nil() && self.comparator.less(self.key(hint), &key) {
            let next = self.next(hint);
            if next.is_nil() || self.comparator.less(&key, self.key(next)) {
                // Between `hint` and its successor, exactly one of the two has a
                // free slot facing the other.
                let (parent, side) = if self.node(hint).right().is_nil() {
                    (hint, Side::Right)
                } else {
                    (next, Side::Left)
                };
                return self.link_leaf(parent, side, key, value).map(|node| (node, true));
            }
        }
        self.try_insert(key, value)
    }
}

impl<K, V, C, A: Allocator> Drop for RawAvlTree<K, V, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for RawAvlTree<K, V, C, A> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_in(self.len(), self.comparator.clone(), self.allocator().clone());
        copy.copy_from(self);
        copy
    }

    /// Builds the copy aside and only then replaces `self`, which keeps its
    /// allocator. If a `clone` panics, `self` is left as it was.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = Self::with_capacity_in(source.len(), source.comparator.clone(), self.allocator().clone());
        copy.copy_from(source);
        *self = copy;
    }
}
