//! An ordered map based on an AVL tree.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::Index;
use core::ptr;

use crate::allocator::{Allocator, Global, handle_error};
use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};
use crate::raw::{Handle, RawAvlTree};
use crate::vector;

mod cursor;

pub use cursor::Cursor;

/// An ordered map based on a height-balanced ([AVL]) binary search tree.
///
/// Entries are kept in the order given by the comparator `C`, which defaults to
/// the key's [`Ord`] implementation ([`Natural`]). Keys are unique: inserting a
/// key that is already present leaves the existing entry untouched.
///
/// Every node lives in an arena drawn from the allocator `A`, and is linked to
/// its children and its parent by compact handles. The parent links make
/// traversal stateless: a [`Position`] names a single node (or the end), and
/// stepping forwards or backwards from it needs nothing else. Positions stay
/// valid until the entry they name is erased, whatever else is inserted or
/// removed in the meantime.
///
/// Iterators obtained from functions such as [`AvlMap::iter`], [`AvlMap::keys`]
/// or [`AvlMap::values`] produce their items in key order, and take worst-case
/// logarithmic and amortized constant time per item returned.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated
/// to the `AvlMap` that observed it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use avl_collections::AvlMap;
///
/// let mut map = AvlMap::new();
/// for key in [5, 3, 8, 1, 4, 7, 9] {
///     map.insert(key, key * 10);
/// }
///
/// assert!(map.find(&6).is_end());
/// assert_eq!(map.key_value_at(map.find(&7)), Some((&7, &70)));
/// assert_eq!(map.key_value_at(map.lower_bound(&6)), Some((&7, &70)));
/// assert_eq!(map.key_value_at(map.upper_bound(&7)), Some((&8, &80)));
///
/// // A duplicate key is not inserted and the original value is kept.
/// let (position, inserted) = map.insert(7, 0);
/// assert!(!inserted);
/// assert_eq!(map.key_value_at(position), Some((&7, &70)));
/// assert_eq!(map.len(), 7);
/// ```
///
/// [AVL]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlMap<K, V, C = Natural, A: Allocator = Global> {
    raw: RawAvlTree<K, V, C, A>,
}

/// A position in an [`AvlMap`]: either an entry or the end.
///
/// Positions are plain tokens. They are returned by lookups such as
/// [`find`](AvlMap::find) and [`lower_bound`](AvlMap::lower_bound) and handed back
/// to the map to read, modify or erase the entry, or to start a [`Cursor`].
///
/// A position stays valid until its entry is erased. Using it afterwards is a
/// logic error: the map either panics or, if the slot was reused, reports a
/// different entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position(Handle);

impl Position {
    /// Returns `true` if this is the past-the-end position.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_nil()
    }
}

/// An iterator over the entries of an `AvlMap`.
///
/// This `struct` is created by the [`iter`] method on [`AvlMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use avl_collections::AvlMap;
///
/// let map = AvlMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V, C = Natural, A: Allocator = Global> {
    tree: Option<&'a RawAvlTree<K, V, C, A>>,
    front: Handle,
    back: Handle,
    remaining: usize,
}

/// A mutable iterator over the entries of an `AvlMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`AvlMap`].
///
/// [`iter_mut`]: AvlMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V, C = Natural, A: Allocator = Global> {
    tree: *mut RawAvlTree<K, V, C, A>,
    front: Handle,
    back: Handle,
    remaining: usize,
    _marker: PhantomData<&'a mut RawAvlTree<K, V, C, A>>,
}

// SAFETY: IterMut hands out `&K` and `&mut V`, and only reads the comparator and allocator.
unsafe impl<K: Sync, V: Send, C: Sync, A: Allocator + Sync> Send for IterMut<'_, K, V, C, A> {}
// SAFETY: Shared access to an IterMut gives no access to the entries at all.
unsafe impl<K: Sync, V: Sync, C: Sync, A: Allocator + Sync> Sync for IterMut<'_, K, V, C, A> {}

/// An owning iterator over the entries of an `AvlMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V, A: Allocator = Global> {
    inner: vector::IntoIter<(K, V), A>,
}

/// An iterator over the keys of an `AvlMap`.
///
/// This `struct` is created by the [`keys`] method on [`AvlMap`].
///
/// [`keys`]: AvlMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, C = Natural, A: Allocator = Global> {
    inner: Iter<'a, K, V, C, A>,
}

/// An iterator over the values of an `AvlMap`.
///
/// This `struct` is created by the [`values`] method on [`AvlMap`].
///
/// [`values`]: AvlMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, C = Natural, A: Allocator = Global> {
    inner: Iter<'a, K, V, C, A>,
}

/// A mutable iterator over the values of an `AvlMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`AvlMap`].
///
/// [`values_mut`]: AvlMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V, C = Natural, A: Allocator = Global> {
    inner: IterMut<'a, K, V, C, A>,
}

impl<K, V> AvlMap<K, V> {
    /// Makes a new, empty `AvlMap` ordered by `Ord`.
    ///
    /// Allocates the sentinel slots of the node and value arenas.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity_in(0, Global)
    }

    /// Makes a new, empty `AvlMap` with room for `capacity` entries before the
    /// arenas grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let map: AvlMap<i32, i32> = AvlMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Makes a new, empty `AvlMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// map.insert("ccc", 3);
    /// map.insert("a", 1);
    /// map.insert("bb", 2);
    /// // "zz" has the same length as "bb", so it is the same key.
    /// assert!(!map.insert("zz", 0).1);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "bb", "ccc"]);
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_in(comparator, Global)
    }

    /// Builds a map ordered by `comparator` from an iterator of entries.
    ///
    /// When a key repeats, the first entry wins.
    pub fn from_iter_with<I>(iter: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        C: Compare<K>,
    {
        let mut map = Self::with_comparator(comparator);
        map.extend(iter);
        map
    }
}

impl<K, V, C, A: Allocator + Clone> AvlMap<K, V, C, A> {
    /// Makes a new, empty `AvlMap` ordered by `comparator` that allocates from `alloc`.
    #[must_use]
    pub fn with_comparator_in(comparator: C, alloc: A) -> Self {
        AvlMap {
            raw: RawAvlTree::with_capacity_in(0, comparator, alloc),
        }
    }

    /// Makes a new, empty `AvlMap` that allocates from `alloc`.
    #[must_use]
    pub fn new_in(alloc: A) -> Self
    where
        C: Default,
    {
        Self::with_comparator_in(C::default(), alloc)
    }

    /// Makes a new, empty `AvlMap` with room for `capacity` entries that
    /// allocates from `alloc`.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self
    where
        C: Default,
    {
        AvlMap {
            raw: RawAvlTree::with_capacity_in(capacity, C::default(), alloc),
        }
    }

    /// Like [`with_capacity_in`](AvlMap::with_capacity_in), but reports
    /// allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] or [`Error::CapacityOverflow`] if the
    /// arenas cannot be allocated.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self>
    where
        C: Default,
    {
        Ok(AvlMap {
            raw: RawAvlTree::try_with_capacity_in(capacity, C::default(), alloc)?,
        })
    }
}

impl<K, V, C, A: Allocator> AvlMap<K, V, C, A> {
    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of entries the map could ever hold.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.raw.max_size()
    }

    /// Returns the number of entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns a reference to the underlying allocator.
    #[must_use]
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// Returns the comparator that orders the keys.
    #[must_use]
    pub const fn key_comp(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    ///
    /// The AVL balance keeps it below `1.45 * log2(len + 2)`.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let map: AvlMap<_, _> = (1..=7).map(|k| (k, ())).collect();
    /// assert_eq!(map.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Clears the map, removing all entries. The arenas keep their capacity.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Exchanges the contents, comparators and allocators of two maps.
    ///
    /// Positions keep naming the same entries, now in the other map.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.raw, &mut other.raw);
    }

    /// The position of the smallest entry, or [`end`](AvlMap::end) when empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        Position(self.raw.first())
    }

    /// The past-the-end position.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position(Handle::NIL)
    }

    /// Returns the entry at `position`, or `None` at the end.
    ///
    /// # Panics
    ///
    /// May panic if `position` names an erased entry.
    #[must_use]
    pub fn key_value_at(&self, position: Position) -> Option<(&K, &V)> {
        (!position.is_end()).then(|| self.raw.entry(position.0))
    }

    /// Returns the value at `position` mutably, or `None` at the end.
    ///
    /// # Panics
    ///
    /// May panic if `position` names an erased entry.
    pub fn value_at_mut(&mut self, position: Position) -> Option<&mut V> {
        if position.is_end() { None } else { Some(self.raw.value_mut(position.0)) }
    }

    /// Removes the entry at `position` and returns it.
    ///
    /// Every other position stays valid.
    ///
    /// # Panics
    ///
    /// Panics if `position` is the end or names an erased entry.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let two = map.find(&2);
    /// let three = map.find(&3);
    /// assert_eq!(map.erase_at(two), (2, "b"));
    /// assert_eq!(map.key_value_at(three), Some((&3, &"c")));
    /// ```
    pub fn erase_at(&mut self, position: Position) -> (K, V) {
        assert!(!position.is_end(), "`AvlMap::erase_at()` - `position` is end!");
        self.raw.remove_at(position.0)
    }

    /// Removes every entry in `[first, last)` and returns how many were removed.
    ///
    /// # Panics
    ///
    /// Panics if `last` does not follow `first`, or if either names an erased entry.
    ///
    /// # Complexity
    ///
    /// O(k log n) for k removed entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map: AvlMap<_, _> = (0..10).map(|k| (k, k)).collect();
    /// let removed = map.erase_range(map.lower_bound(&3), map.lower_bound(&7));
    /// assert_eq!(removed, 4);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 1, 2, 7, 8, 9]);
    /// ```
    pub fn erase_range(&mut self, first: Position, last: Position) -> usize {
        let mut current = first.0;
        let mut removed = 0;
        while current != last.0 {
            assert!(!current.is_nil(), "`AvlMap::erase_range()` - `last` is not reachable from `first`!");
            let next = self.raw.next(current);
            self.raw.remove_at(current);
            current = next;
            removed += 1;
        }
        removed
    }

    /// Returns the first entry in the map, the one with the minimum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.key_value_at(self.begin())
    }

    /// Returns the last entry in the map, the one with the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.key_value_at(Position(self.raw.last()))
    }

    /// Returns a cursor on the first entry (or the end, if the map is empty).
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C, A> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns a cursor on the last entry (or the end, if the map is empty).
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C, A> {
        Cursor::new(&self.raw, self.raw.last())
    }

    /// Returns a cursor on `position`.
    pub fn cursor_at(&self, position: Position) -> Cursor<'_, K, V, C, A> {
        Cursor::new(&self.raw, position.0)
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let map = AvlMap::from([(3, "c"), (2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// let reversed: Vec<_> = map.iter().rev().map(|(k, _)| *k).collect();
    /// assert_eq!(reversed, [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, C, A> {
        Iter {
            tree: Some(&self.raw),
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, C, A> {
        let front = self.raw.first();
        let back = self.raw.last();
        let remaining = self.raw.len();
        IterMut {
            tree: ptr::from_mut(&mut self.raw),
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V, C, A> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V, C, A> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, String::from("hello")), (2, String::from("goodbye"))]);
    /// for value in map.values_mut() {
    ///     value.push('!');
    /// }
    /// assert_eq!(map[&2], "goodbye!");
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, C, A> {
        ValuesMut { inner: self.iter_mut() }
    }
}

impl<K, V, C, A: Allocator> AvlMap<K, V, C, A> {
    /// Returns the position of the entry for `key`, or the end if there is none.
    ///
    /// The key may be any borrowed form of the map's key type, as long as the
    /// comparator orders the borrowed form the same way.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position(self.raw.search(key).unwrap_or(Handle::NIL))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(String::from("one"), 1);
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.search(key).map(|node| self.raw.value(node))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let node = self.raw.search(key)?;
        Some(self.raw.value_mut(node))
    }

    /// Returns the stored key and the value corresponding to the supplied key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.search(key).map(|node| self.raw.entry(node))
    }

    /// Checked access to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the map has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::{AvlMap, Error};
    ///
    /// let map = AvlMap::from([(1, "a")]);
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Checked mutable access to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the map has no entry for `key`.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains an entry for `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.raw.search(key).is_some()
    }

    /// Returns the number of entries for `key`: 0 or 1.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.contains_key(key))
    }

    /// Returns the position of the first entry whose key is not less than `key`,
    /// or the end if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position(self.raw.lower_bound(key))
    }

    /// Returns the position of the first entry whose key is greater than `key`,
    /// or the end if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Position(self.raw.upper_bound(key))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`: the positions delimiting
    /// the entries equivalent to `key`. They are equal when there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let map = AvlMap::from([(1, 'a'), (3, 'c')]);
    /// let (first, last) = map.equal_range(&3);
    /// assert_eq!(map.key_value_at(first), Some((&3, &'c')));
    /// assert!(last.is_end());
    /// let (first, last) = map.equal_range(&2);
    /// assert_eq!(first, last);
    /// ```
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry for `key`, returning the stored key and value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let node = self.raw.search(key)?;
        Some(self.raw.remove_at(node))
    }

    /// Removes the entry for `key` and returns how many entries were removed: 0 or 1.
    pub fn erase_key<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.remove_entry(key).is_some())
    }
}

impl<K, V, C: Compare<K>, A: Allocator> AvlMap<K, V, C, A> {
    /// Inserts `key` with `value` unless the map already has an entry for `key`.
    ///
    /// Returns the position of the entry for `key` and whether it was inserted.
    /// If the key was already present, the map is unchanged and `value` is
    /// dropped.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// let (_, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    ///
    /// let (position, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(map.key_value_at(position), Some((&37, &"a")));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.try_insert(key, value).unwrap_or_else(|err| handle_error(err))
    }

    /// Like [`insert`](AvlMap::insert), but reports allocation failure instead of
    /// aborting. On failure the map is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] if the allocator refuses to grow an arena, or
    /// [`Error::CapacityOverflow`] if the map is out of node handles.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool)> {
        let (node, inserted) = self.raw.try_insert(key, value)?;
        Ok((Position(node), inserted))
    }

    /// Inserts `key` with `value`, using `hint` as a suggestion for where it goes.
    ///
    /// When the entry belongs immediately after `hint`, the search is skipped and
    /// the insertion takes amortized constant time. Otherwise this behaves like
    /// [`insert`](AvlMap::insert). Either way the entry ends up at its ordered
    /// position.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// let mut hint = map.end();
    /// for key in 0..100 {
    ///     hint = map.insert_hint(hint, key, key * key).0;
    /// }
    /// assert_eq!(map.len(), 100);
    /// assert_eq!(map[&9], 81);
    /// ```
    pub fn insert_hint(&mut self, hint: Position, key: K, value: V) -> (Position, bool) {
        match self.raw.try_insert_hint(hint.0, key, value) {
            Ok((node, inserted)) => (Position(node), inserted),
            Err(err) => handle_error(err),
        }
    }

    /// Returns the value for `key`, inserting `V::default()` first if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let mut counts: AvlMap<&str, i32> = AvlMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_default(word) += 1;
    /// }
    /// assert_eq!(counts[&"a"], 2);
    /// assert_eq!(counts[&"b"], 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns the value for `key`, inserting the result of `default` first if
    /// there is none. `default` is only called when the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let node = match self.raw.search(&key) {
            Some(node) => node,
            None => match self.raw.try_insert(key, default()) {
                Ok((node, _)) => node,
                Err(err) => handle_error(err),
            },
        };
        self.raw.value_mut(node)
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for AvlMap<K, V, C, A> {
    /// Deep copy with the same shape as `self`.
    fn clone(&self) -> Self {
        AvlMap { raw: self.raw.clone() }
    }

    /// Assignment: replaces the entries and comparator of `self` with copies of
    /// those in `source`.
    ///
    /// The copy is built before the old entries are dropped, so if a `clone`
    /// panics `self` keeps its previous contents.
    fn clone_from(&mut self, source: &Self) {
        self.raw.clone_from(&source.raw);
    }
}

impl<K: Hash, V: Hash, C, A: Allocator> Hash for AvlMap<K, V, C, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C, A: Allocator> PartialEq for AvlMap<K, V, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C, A: Allocator> Eq for AvlMap<K, V, C, A> {}

impl<K: PartialOrd, V: PartialOrd, C, A: Allocator> PartialOrd for AvlMap<K, V, C, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C, A: Allocator> Ord for AvlMap<K, V, C, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for AvlMap<K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for AvlMap<K, V, C> {
    fn default() -> Self {
        AvlMap::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for AvlMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        AvlMap::from_iter_with(iter, C::default())
    }
}

impl<K, V, C: Compare<K>, A: Allocator> Extend<(K, V)> for AvlMap<K, V, C, A> {
    /// Inserts every entry in turn. Entries whose key is already present are skipped.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>, A: Allocator> Extend<(&'a K, &'a V)> for AvlMap<K, V, C, A> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C, A: Allocator> IntoIterator for &'a AvlMap<K, V, C, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, A>;

    fn into_iter(self) -> Iter<'a, K, V, C, A> {
        self.iter()
    }
}

impl<'a, K, V, C, A: Allocator> IntoIterator for &'a mut AvlMap<K, V, C, A> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, C, A>;

    fn into_iter(self) -> IterMut<'a, K, V, C, A> {
        self.iter_mut()
    }
}

impl<K, V, C, A: Allocator + Clone> IntoIterator for AvlMap<K, V, C, A> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, A>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlMap;
    ///
    /// let map = AvlMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V, A> {
        IntoIter {
            inner: self.raw.drain_to_vector().into_iter(),
        }
    }
}

impl<K, Q, V, C, A: Allocator> Index<&Q> for AvlMap<K, V, C, A>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Compare<Q>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key"),
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, C, A: Allocator> Iterator for Iter<'a, K, V, C, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let entry = tree.entry(self.front);
        self.front = tree.next(self.front);
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for Iter<'_, K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let entry = tree.entry(self.back);
        self.back = tree.prev(self.back);
        self.remaining -= 1;
        Some(entry)
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for Iter<'_, K, V, C, A> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, C, A: Allocator> FusedIterator for Iter<'_, K, V, C, A> {}

impl<K, V, C, A: Allocator> fmt::Debug for Iter<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<K, V, C, A: Allocator> Default for Iter<'_, K, V, C, A> {
    /// Creates an empty `avl_map::Iter`.
    ///
    /// ```
    /// # use avl_collections::avl_map;
    /// let iter: avl_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            tree: None,
            front: Handle::NIL,
            back: Handle::NIL,
            remaining: 0,
        }
    }
}

impl<K, V, C, A: Allocator> Clone for Iter<'_, K, V, C, A> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, C, A: Allocator> Iterator for IterMut<'a, K, V, C, A> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front;
        // SAFETY: `remaining > 0`, so `tree` came from a live `&mut` in `iter_mut()`.
        // Each node is yielded once, so the `&mut V` handed out never alias.
        unsafe {
            self.front = (*self.tree).next(node);
            self.remaining -= 1;
            Some(RawAvlTree::entry_mut_ptr(self.tree, node))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for IterMut<'_, K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back;
        // SAFETY: As in `next`.
        unsafe {
            self.back = (*self.tree).prev(node);
            self.remaining -= 1;
            Some(RawAvlTree::entry_mut_ptr(self.tree, node))
        }
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for IterMut<'_, K, V, C, A> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, C, A: Allocator> FusedIterator for IterMut<'_, K, V, C, A> {}

impl<K, V, C, A: Allocator> fmt::Debug for IterMut<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V, C, A: Allocator> Default for IterMut<'_, K, V, C, A> {
    fn default() -> Self {
        IterMut {
            // Never dereferenced while `remaining == 0`.
            tree: ptr::null_mut(),
            front: Handle::NIL,
            back: Handle::NIL,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V, A: Allocator> Iterator for IntoIter<K, V, A> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, A: Allocator> DoubleEndedIterator for IntoIter<K, V, A> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V, A: Allocator> ExactSizeIterator for IntoIter<K, V, A> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, A: Allocator> FusedIterator for IntoIter<K, V, A> {}

impl<K: fmt::Debug, V: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<'a, K, V, C, A: Allocator> Iterator for Keys<'a, K, V, C, A> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for Keys<'_, K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for Keys<'_, K, V, C, A> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C, A: Allocator> FusedIterator for Keys<'_, K, V, C, A> {}

impl<K: fmt::Debug, V, C, A: Allocator> fmt::Debug for Keys<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V, C, A: Allocator> Default for Keys<'_, K, V, C, A> {
    fn default() -> Self {
        Keys { inner: Iter::default() }
    }
}

impl<K, V, C, A: Allocator> Clone for Keys<'_, K, V, C, A> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, C, A: Allocator> Iterator for Values<'a, K, V, C, A> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for Values<'_, K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for Values<'_, K, V, C, A> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C, A: Allocator> FusedIterator for Values<'_, K, V, C, A> {}

impl<K, V: fmt::Debug, C, A: Allocator> fmt::Debug for Values<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V, C, A: Allocator> Default for Values<'_, K, V, C, A> {
    fn default() -> Self {
        Values { inner: Iter::default() }
    }
}

impl<K, V, C, A: Allocator> Clone for Values<'_, K, V, C, A> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, C, A: Allocator> Iterator for ValuesMut<'a, K, V, C, A> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for ValuesMut<'_, K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for ValuesMut<'_, K, V, C, A> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C, A: Allocator> FusedIterator for ValuesMut<'_, K, V, C, A> {}

impl<K, V, C, A: Allocator> fmt::Debug for ValuesMut<'_, K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V, C, A: Allocator> Default for ValuesMut<'_, K, V, C, A> {
    fn default() -> Self {
        ValuesMut {
            inner: IterMut::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Reverse;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::alloc::Layout;
    use core::cell::Cell;
    use core::ptr::NonNull;

    /// Refuses every request once `remaining` allocations have been made.
    #[derive(Clone)]
    struct Budget {
        remaining: Rc<Cell<usize>>,
    }

    impl Budget {
        fn new(allocations: usize) -> Self {
            Self {
                remaining: Rc::new(Cell::new(allocations)),
            }
        }
    }

    // SAFETY: Forwards to `Global` when within budget.
    unsafe impl Allocator for Budget {
        fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
            match self.remaining.get() {
                0 => Err(crate::allocator::alloc_failed(layout)),
                n => {
                    self.remaining.set(n - 1);
                    Global.allocate(layout)
                }
            }
        }

        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            unsafe { Global.deallocate(ptr, layout) }
        }
    }

    #[test]
    fn positions_survive_other_mutations() {
        let mut map = AvlMap::new();
        let five = map.insert(5, "five").0;
        for key in 0..100 {
            if key != 5 {
                map.insert(key, "other");
            }
        }
        for key in (0..100).filter(|k| k % 3 == 0 && *k != 5) {
            map.remove(&key);
        }
        assert_eq!(map.key_value_at(five), Some((&5, &"five")));
        *map.value_at_mut(five).unwrap() = "FIVE";
        assert_eq!(map[&5], "FIVE");
        assert!(map.value_at_mut(map.end()).is_none());
    }

    #[test]
    #[should_panic(expected = "`AvlMap::erase_at()` - `position` is end!")]
    fn erase_at_end_panics() {
        let mut map: AvlMap<i32, i32> = AvlMap::new();
        let end = map.end();
        map.erase_at(end);
    }

    #[test]
    fn try_insert_failure_leaves_map_unchanged() {
        // Two sentinel slots plus one growth step for each arena.
        let mut map: AvlMap<i32, i32, Natural, Budget> = AvlMap::new_in(Budget::new(4));
        assert_eq!(map.try_insert(1, 10), Ok((map.find(&1), true)));
        let before: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();

        let mut failed = false;
        for key in 2..64 {
            match map.try_insert(key, key * 10) {
                Ok(_) => {}
                Err(err) => {
                    assert!(matches!(err, Error::AllocFailed { .. }));
                    assert!(!map.contains_key(&key));
                    failed = true;
                    break;
                }
            }
        }
        assert!(failed);
        assert!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>().starts_with(&before));
        assert_eq!(map.len(), map.iter().count());
        map.raw.validate_invariants();
    }

    #[test]
    fn reverse_comparator_orders_descending() {
        let map: AvlMap<_, _, Reverse> = (0..10).map(|k| (k, ())).collect();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(map.key_value_at(map.lower_bound(&4)), Some((&4, &())));
        assert_eq!(map.key_value_at(map.upper_bound(&4)), Some((&3, &())));
        map.raw.validate_invariants();
    }

    #[test]
    fn borrowed_lookups() {
        let mut map = AvlMap::new();
        map.insert(String::from("b"), 2);
        map.insert(String::from("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.count("b"), 1);
        assert_eq!(map.erase_key("c"), 0);
        assert_eq!(map.erase_key("b"), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn into_iter_drops_unconsumed_entries() {
        let tracker = Rc::new(());
        let map: AvlMap<_, _> = (0..10).map(|k| (k, Rc::clone(&tracker))).collect();
        assert_eq!(Rc::strong_count(&tracker), 11);
        let mut iter = map.into_iter();
        assert_eq!(iter.next().map(|(k, _)| k), Some(0));
        assert_eq!(iter.next_back().map(|(k, _)| k), Some(9));
        drop(iter);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut map: AvlMap<_, _> = (0..6).map(|k| (k, 0)).collect();
        let mut iter = map.iter_mut();
        while let Some((k, v)) = iter.next() {
            *v = *k;
            if let Some((k, v)) = iter.next_back() {
                *v = *k * 10;
            }
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [0, 1, 2, 30, 40, 50]);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = AvlMap::from([(1, 'a')]);
        let mut b = AvlMap::from([(2, 'b'), (3, 'c')]);
        let three = b.find(&3);
        a.swap(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
        assert_eq!(a.key_value_at(three), Some((&3, &'c')));
    }
}
