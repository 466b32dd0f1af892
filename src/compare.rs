use core::cmp::Ordering;

/// A strict weak ordering over keys, used by [`AvlMap`](crate::AvlMap) in place
/// of the key type's own [`Ord`].
///
/// Two keys are treated as equivalent (the same key) when `compare` returns
/// [`Ordering::Equal`]. It is a logic error for the ordering to change while keys
/// are stored in a map.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```
/// use avl_collections::AvlMap;
///
/// let mut map = AvlMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// map.insert(1, "a");
/// map.insert(2, "b");
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2, 1]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Returns `true` if `a` orders strictly before `b`.
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders keys by their [`Ord`] implementation. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: ?Sized + Ord> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
///
/// ```
/// use avl_collections::{AvlMap, Reverse};
///
/// let map: AvlMap<_, _, _> = AvlMap::from_iter_with([(1, 'a'), (3, 'c'), (2, 'b')], Reverse);
/// assert_eq!(map.values().copied().collect::<String>(), "cba");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse;

impl<K: ?Sized + Ord> Compare<K> for Reverse {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
