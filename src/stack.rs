//! A last-in, first-out adapter over a sequence container.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::allocator::Allocator;
use crate::vector::Vector;

/// A sequence that can grow and shrink at its back.
///
/// This is all [`Stack`] needs from its underlying container.
pub trait BackSequence<T> {
    /// Appends `value` at the back.
    fn push_back(&mut self, value: T);

    /// Removes and returns the last element, or `None` if empty.
    fn pop_back(&mut self) -> Option<T>;

    /// The last element, or `None` if empty.
    fn back(&self) -> Option<&T>;

    /// The last element mutably, or `None` if empty.
    fn back_mut(&mut self) -> Option<&mut T>;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, A: Allocator> BackSequence<T> for Vector<T, A> {
    fn push_back(&mut self, value: T) {
        Vector::push_back(self, value);
    }

    fn pop_back(&mut self) -> Option<T> {
        Vector::pop_back(self)
    }

    fn back(&self) -> Option<&T> {
        Vector::back(self)
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        Vector::back_mut(self)
    }

    fn len(&self) -> usize {
        Vector::len(self)
    }
}

impl<T> BackSequence<T> for Vec<T> {
    fn push_back(&mut self, value: T) {
        self.push(value);
    }

    fn pop_back(&mut self) -> Option<T> {
        self.pop()
    }

    fn back(&self) -> Option<&T> {
        self.last()
    }

    fn back_mut(&mut self) -> Option<&mut T> {
        self.last_mut()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// A LIFO stack that delegates storage to `S`, a [`Vector`] by default.
///
/// Comparisons, hashing and formatting go straight to the container, so two
/// stacks compare like their containers do (lexicographically, bottom first).
///
/// # Examples
///
/// ```
/// use avl_collections::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1);
/// stack.push(2);
/// assert_eq!(stack.top(), Some(&2));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.len(), 1);
/// ```
pub struct Stack<T, S: BackSequence<T> = Vector<T>> {
    container: S,
    _marker: PhantomData<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack backed by a new [`Vector`].
    #[must_use]
    pub const fn new() -> Self {
        Self::from_container(Vector::new())
    }
}

impl<T, S: BackSequence<T>> Stack<T, S> {
    /// Wraps an existing container. Its last element becomes the top.
    ///
    /// ```
    /// use avl_collections::Stack;
    ///
    /// let stack = Stack::from_container(vec![1, 2, 3]);
    /// assert_eq!(stack.top(), Some(&3));
    /// ```
    pub const fn from_container(container: S) -> Self {
        Self {
            container,
            _marker: PhantomData,
        }
    }

    /// Pushes `value` on top.
    pub fn push(&mut self, value: T) {
        self.container.push_back(value);
    }

    /// Removes the top element and returns it, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.container.pop_back()
    }

    /// The top element.
    #[must_use]
    pub fn top(&self) -> Option<&T> {
        self.container.back()
    }

    /// The top element, mutably.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.container.back_mut()
    }

    /// Number of elements on the stack.
    ///
    /// ```
    /// use avl_collections::Stack;
    ///
    /// let mut stack = Stack::new();
    /// stack.push('a');
    /// stack.push('b');
    /// assert_eq!(stack.len(), 2);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.container.len()
    }

    /// Returns `true` if the stack holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Exchanges the contents of two stacks.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.container, &mut other.container);
    }

    /// Unwraps the underlying container.
    pub fn into_inner(self) -> S {
        self.container
    }
}

impl<T, S: BackSequence<T> + Clone> Clone for Stack<T, S> {
    fn clone(&self) -> Self {
        Self::from_container(self.container.clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.container.clone_from(&source.container);
    }
}

impl<T, S: BackSequence<T> + Default> Default for Stack<T, S> {
    fn default() -> Self {
        Self::from_container(S::default())
    }
}

impl<T, S: BackSequence<T> + fmt::Debug> fmt::Debug for Stack<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stack").field(&self.container).finish()
    }
}

impl<T, S: BackSequence<T> + Hash> Hash for Stack<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.container.hash(state);
    }
}

impl<T, S: BackSequence<T> + PartialEq> PartialEq for Stack<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
    }
}

impl<T, S: BackSequence<T> + Eq> Eq for Stack<T, S> {}

impl<T, S: BackSequence<T> + PartialOrd> PartialOrd for Stack<T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.container.partial_cmp(&other.container)
    }
}

impl<T, S: BackSequence<T> + Ord> Ord for Stack<T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.container.cmp(&other.container)
    }
}

impl<T, S: BackSequence<T> + Default> FromIterator<T> for Stack<T, S> {
    /// Pushes every item in turn; the last one ends up on top.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::default();
        stack.extend(iter);
        stack
    }
}

impl<T, S: BackSequence<T>> Extend<T> for Stack<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn lifo_order() {
        let mut stack: Stack<_> = (1..=3).collect();
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        stack.push(7);
        assert_eq!(stack.pop(), Some(7));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn top_mut_edits_in_place() {
        let mut stack = Stack::new();
        assert_eq!(stack.top_mut(), None);
        stack.push(1);
        *stack.top_mut().unwrap() += 10;
        assert_eq!(stack.top(), Some(&11));
    }

    #[test]
    fn works_over_std_vec() {
        let mut stack = Stack::from_container(Vec::new());
        stack.push('a');
        stack.push('b');
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.into_inner(), vec!['a', 'b']);
    }

    #[test]
    fn compares_like_its_container() {
        let a: Stack<_> = [1, 2, 3].into_iter().collect();
        let b: Stack<_> = [1, 2, 4].into_iter().collect();
        let c: Stack<_> = [1, 2].into_iter().collect();
        assert!(a < b);
        assert!(c < a);
        assert_eq!(a.clone(), a);
        assert_ne!(a, c);
    }

    #[test]
    fn swap_exchanges_stacks() {
        let mut a: Stack<_> = [1].into_iter().collect();
        let mut b: Stack<_> = [2, 3].into_iter().collect();
        a.swap(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.top(), Some(&1));
    }
}
