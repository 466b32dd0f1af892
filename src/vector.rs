use core::cmp::{self, Ordering};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem::{self, ManuallyDrop};
use core::ops::{Bound, Deref, DerefMut, Index, IndexMut, RangeBounds};
use core::ptr::{self, NonNull};
use core::slice::{self, SliceIndex};

use crate::allocator::{Allocator, Global, handle_error};
use crate::error::{Error, Result};

mod raw_buffer;

use raw_buffer::RawBuffer;

/// A contiguous growable array whose storage comes from an [`Allocator`].
///
/// Elements live in `[0, len)` of a single buffer of `capacity` slots. Appending
/// to a full buffer doubles its capacity (starting from 1), so
/// [`push_back`](Vector::push_back) is amortized O(1).
///
/// Operations that clone user values into the array ([`insert_n`](Vector::insert_n),
/// [`resize`](Vector::resize), [`assign`](Vector::assign), [`Clone`] including
/// `clone_from`) are strongly exception safe: if a `clone` panics, the array
/// keeps its previous elements. Only `insert_n` and `resize` also promise the
/// previous capacity. Allocation
/// failures surface through the `try_*` methods as [`Error::AllocFailed`], again
/// without touching the array.
///
/// `Vector` dereferences to a slice, which provides random access, iteration
/// (`iter().rev()` walks it back to front) and the rest of the slice API.
///
/// # Examples
///
/// ```
/// use avl_collections::Vector;
///
/// let mut v = Vector::new();
/// for i in 1..=5 {
///     v.push_back(i);
/// }
/// v.insert(2, 99);
/// assert_eq!(v.as_slice(), [1, 2, 99, 3, 4, 5]);
/// assert_eq!(v.at(10), Err(avl_collections::Error::IndexOutOfRange { index: 10, len: 6 }));
/// ```
pub struct Vector<T, A: Allocator = Global> {
    buf: RawBuffer<T, A>,
    len: usize,
}

// SAFETY: `Vector` owns its elements and allocator like `Vec` does.
unsafe impl<T: Send, A: Allocator + Send> Send for Vector<T, A> {}
// SAFETY: Shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Vector<T, A> {}

impl<T> Vector<T> {
    /// Creates an empty array. Does not allocate.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty array with room for at least `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts if the allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates an array holding `n` clones of `value` (the fill constructor).
    ///
    /// ```
    /// use avl_collections::Vector;
    ///
    /// let v = Vector::from_elem(3, 'x');
    /// assert_eq!(v.as_slice(), ['x', 'x', 'x']);
    /// assert_eq!(v.capacity(), 3);
    /// ```
    #[must_use]
    pub fn from_elem(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut v = Self::with_capacity(n);
        v.insert_n(0, n, value);
        v
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Creates an empty array that will allocate from `alloc`.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuffer::new_in(alloc),
            len: 0,
        }
    }

    /// Creates an empty array with room for `capacity` elements, allocated from
    /// `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts if the allocation fails.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::try_with_capacity_in(capacity, alloc).unwrap_or_else(|err| handle_error(err))
    }

    /// Fallible version of [`with_capacity_in`](Vector::with_capacity_in).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] or [`Error::CapacityOverflow`].
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            buf: RawBuffer::try_with_capacity_in(capacity, alloc)?,
            len: 0,
        })
    }

    /// Returns the allocator backing this array.
    #[must_use]
    pub const fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without reallocating.
    ///
    /// Zero-sized element types report `usize::MAX`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the largest length the allocator could theoretically support.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.allocator().max_size::<T>()
    }

    /// Views the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` holds initialized elements; the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// Views the elements as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: As above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Returns a raw pointer to the buffer without borrowing the elements.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns a mutable raw pointer to the buffer without borrowing the elements.
    ///
    /// Unlike going through [`as_mut_slice`](Vector::as_mut_slice), no reference to
    /// the elements is created, so pointers derived from earlier calls stay valid.
    #[must_use]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice().get(index).ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Returns the first element, or `None` if empty.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the first element mutably, or `None` if empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Returns the last element, or `None` if empty.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns the last element mutably, or `None` if empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Makes sure the array can hold at least `capacity` elements in total.
    ///
    /// Allocates exactly `capacity` slots when it exceeds the current capacity,
    /// moves the elements across and releases the old buffer. Does nothing
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts if the allocation fails.
    ///
    /// # Complexity
    ///
    /// O(n) when reallocating, O(1) otherwise.
    pub fn reserve(&mut self, capacity: usize) {
        self.try_reserve(capacity).unwrap_or_else(|err| handle_error(err));
    }

    /// Fallible version of [`reserve`](Vector::reserve).
    ///
    /// ```
    /// use avl_collections::Vector;
    ///
    /// let mut v = Vector::from([1, 2, 3]);
    /// v.try_reserve(10).unwrap();
    /// assert_eq!(v.capacity(), 10);
    /// assert!(v.try_reserve(usize::MAX).is_err());
    /// assert_eq!(v.as_slice(), [1, 2, 3]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] or [`Error::CapacityOverflow`]; the array is
    /// left unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        self.buf.try_reallocate(capacity, self.len)
    }

    /// Appends an element.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts if the allocation fails.
    ///
    /// # Complexity
    ///
    /// Amortized O(1)
    pub fn push_back(&mut self, value: T) {
        self.try_push_back(value).unwrap_or_else(|err| handle_error(err));
    }

    /// Fallible version of [`push_back`](Vector::push_back).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] or [`Error::CapacityOverflow`]. `value` is
    /// dropped and the array is left unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<()> {
        self.grow_for(1)?;
        // SAFETY: `grow_for` guarantees a free slot at `len`.
        unsafe { self.buf.construct(self.buf.ptr().add(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: The slot at the old `len - 1` is initialized and now outside `[0, len)`.
        Some(unsafe { self.buf.ptr().add(self.len).read() })
    }

    /// Inserts `value` at `index`, shifting later elements one slot towards the back.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len;
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        self.grow_for(1).unwrap_or_else(|err| handle_error(err));
        // SAFETY: `index <= len < capacity`; the tail is shifted within the buffer.
        unsafe {
            let at = self.buf.ptr().add(index);
            ptr::copy(at, at.add(1), len - index);
            self.buf.construct(at, value);
        }
        self.len += 1;
    }

    /// Inserts `n` clones of `value` at `index`.
    ///
    /// If a clone panics the array is restored to its previous state, capacity
    /// included.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Complexity
    ///
    /// O(n + len)
    pub fn insert_n(&mut self, index: usize, n: usize, value: T)
    where
        T: Clone,
    {
        self.try_insert_with(index, n, || value.clone()).unwrap_or_else(|err| handle_error(err));
    }

    /// Inserts every item of `iter` at `index`, preserving their order.
    ///
    /// If the iterator panics, the items taken so far are dropped and the
    /// original elements are left in place. The capacity may have grown.
    ///
    /// ```
    /// use avl_collections::Vector;
    ///
    /// let mut v = Vector::from([1, 5]);
    /// v.insert_iter(1, 2..5);
    /// assert_eq!(v.as_slice(), [1, 2, 3, 4, 5]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_iter<I>(&mut self, index: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len;
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");

        let mut rollback = Rollback {
            vec: self,
            len,
            armed: true,
        };
        let iter = iter.into_iter();
        rollback.vec.reserve(len.saturating_add(iter.size_hint().0));
        for item in iter {
            rollback.vec.push_back(item);
        }
        rollback.armed = false;

        let added = rollback.vec.len - len;
        rollback.vec.as_mut_slice()[index..].rotate_right(added);
    }

    /// Removes and returns the element at `index`, shifting later elements down.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn erase(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(index < len, "removal index (is {index}) should be < len (is {len})");
        // SAFETY: `index < len`; the value is read out before its slot is overwritten.
        unsafe {
            let at = self.buf.ptr().add(index);
            let value = at.read();
            ptr::copy(at.add(1), at, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Removes the elements in `range`, shifting later elements down.
    ///
    /// If an element's destructor panics, the elements after the range are leaked.
    ///
    /// ```
    /// use avl_collections::Vector;
    ///
    /// let mut v: Vector<_> = (0..8).collect();
    /// v.erase_range(2..5);
    /// assert_eq!(v.as_slice(), [0, 1, 5, 6, 7]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or extends past `len`.
    pub fn erase_range<R>(&mut self, range: R)
    where
        R: RangeBounds<usize>,
    {
        let len = self.len;
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.checked_add(1).expect("range start overflows usize"),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.checked_add(1).expect("range end overflows usize"),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        assert!(start <= end, "range start (is {start}) should be <= range end (is {end})");
        assert!(end <= len, "range end (is {end}) should be <= len (is {len})");

        // SAFETY: `[start, end)` lies within `[0, len)`. `len` is lowered first so a
        // panicking destructor cannot cause a double drop.
        unsafe {
            let base = self.buf.ptr();
            self.len = start;
            self.buf.destroy_range(base.add(start), end - start);
            ptr::copy(base.add(end), base.add(start), len - end);
            self.len = len - (end - start);
        }
    }

    /// Shortens the array to `len` elements, dropping the rest. No effect if
    /// `len` is not less than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let count = self.len - len;
        self.len = len;
        // SAFETY: `len < old len`; the tail was initialized and is now outside `[0, len)`.
        unsafe { self.buf.destroy_range(self.buf.ptr().add(len), count) };
    }

    /// Removes every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the array to `len` elements.
    ///
    /// Shrinking drops trailing elements; growing appends clones of `value`.
    ///
    /// ```
    /// use avl_collections::Vector;
    ///
    /// let mut v = Vector::from([1, 2]);
    /// v.resize(4, 0);
    /// assert_eq!(v.as_slice(), [1, 2, 0, 0]);
    /// v.resize(1, 0);
    /// assert_eq!(v.as_slice(), [1]);
    /// ```
    pub fn resize(&mut self, len: usize, value: T)
    where
        T: Clone,
    {
        if len <= self.len {
            self.truncate(len);
        } else {
            self.insert_n(self.len, len - self.len, value);
        }
    }

    /// Replaces the contents with `n` clones of `value`.
    ///
    /// The clones are made before the old elements are dropped, so if one
    /// panics the array keeps its previous contents.
    ///
    /// # Complexity
    ///
    /// O(n + len)
    pub fn assign(&mut self, n: usize, value: T)
    where
        T: Clone,
    {
        self.replace_with(n, || value.clone());
    }

    /// Replaces the contents with the items of `iter`.
    ///
    /// The old elements are dropped first. If the iterator panics, the array
    /// holds the items taken so far.
    pub fn assign_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(iter);
    }

    /// Appends clones of every element of `other`.
    pub fn extend_from_slice(&mut self, other: &[T])
    where
        T: Clone,
    {
        let required = self.len.checked_add(other.len()).unwrap_or_else(|| handle_error(Error::CapacityOverflow));
        self.reserve(required);
        for value in other {
            self.push_back(value.clone());
        }
    }

    /// Exchanges the contents (and allocators) of two arrays in O(1).
    ///
    /// Named `swap_with` so that the slice method `swap(a, b)` stays reachable.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Makes room for `additional` more elements using the doubling growth policy.
    fn grow_for(&mut self, additional: usize) -> Result<()> {
        let required = self.len.checked_add(additional).ok_or(Error::CapacityOverflow)?;
        if required <= self.capacity() {
            return Ok(());
        }
        self.buf.try_reallocate(self.grown_capacity(required), self.len)
    }

    fn grown_capacity(&self, required: usize) -> usize {
        cmp::max(cmp::max(self.capacity().saturating_mul(2), required), 1)
    }

    /// Inserts `n` values produced by `fill` at `index` with the strong guarantee.
    ///
    /// With spare capacity the tail is shifted in place and moved back if `fill`
    /// panics. Otherwise the result is assembled in a new block that is only
    /// installed once every value has been produced.
    /// Appends `n` values from `fill`, then drops the `len` values that were
    /// there before. A panicking `fill` leaves the array as it was.
    fn replace_with<F>(&mut self, n: usize, fill: F)
    where
        F: FnMut() -> T,
    {
        let old = self.len;
        self.try_insert_with(old, n, fill).unwrap_or_else(|err| handle_error(err));
        self.erase_range(..old);
    }

    fn try_insert_with<F>(&mut self, index: usize, n: usize, mut fill: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        let len = self.len;
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        if n == 0 {
            return Ok(());
        }
        let required = len.checked_add(n).ok_or(Error::CapacityOverflow)?;
        let tail = len - index;

        if required <= self.capacity() {
            let base = self.buf.ptr();
            // SAFETY: `required <= capacity`, so the shifted tail and the gap fit.
            unsafe { ptr::copy(base.add(index), base.add(index + n), tail) };
            let mut gap = ShiftedGap {
                buf: &self.buf,
                index,
                n,
                tail,
                filled: 0,
            };
            while gap.filled < n {
                let value = fill();
                // SAFETY: `index + filled` is inside the gap.
                unsafe { gap.buf.construct(base.add(index + gap.filled), value) };
                gap.filled += 1;
            }
            mem::forget(gap);
        } else {
            let new_cap = self.grown_capacity(required);
            let block = self.buf.allocate_like(new_cap)?;
            let dst = block.as_ptr();
            let mut fresh = FreshBlock {
                buf: &self.buf,
                block,
                cap: new_cap,
                index,
                filled: 0,
            };
            while fresh.filled < n {
                let value = fill();
                // SAFETY: `index + filled < required <= new_cap`.
                unsafe { fresh.buf.construct(dst.add(index + fresh.filled), value) };
                fresh.filled += 1;
            }
            mem::forget(fresh);
            // SAFETY: The new block has room for `required` values. The old values are
            // moved bitwise and the old block released without dropping them.
            unsafe {
                let src = self.buf.ptr();
                ptr::copy_nonoverlapping(src, dst, index);
                ptr::copy_nonoverlapping(src.add(index), dst.add(index + n), tail);
                self.buf.install(block, new_cap);
            }
        }

        self.len = required;
        Ok(())
    }
}

/// Undoes an in-place insertion when the fill panics: drops the values written
/// so far and moves the tail back over the gap.
struct ShiftedGap<'a, T, A: Allocator> {
    buf: &'a RawBuffer<T, A>,
    index: usize,
    n: usize,
    tail: usize,
    filled: usize,
}

impl<T, A: Allocator> Drop for ShiftedGap<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: `[index, index + filled)` holds the values written so far and the
        // tail sits at `index + n`; both are within the buffer.
        unsafe {
            let gap = self.buf.ptr().add(self.index);
            self.buf.destroy_range(gap, self.filled);
            ptr::copy(gap.add(self.n), gap, self.tail);
        }
    }
}

/// Tears down a block under construction when the fill panics. The original
/// buffer has not been touched at that point.
struct FreshBlock<'a, T, A: Allocator> {
    buf: &'a RawBuffer<T, A>,
    block: NonNull<T>,
    cap: usize,
    index: usize,
    filled: usize,
}

impl<T, A: Allocator> Drop for FreshBlock<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: Only `[index, index + filled)` of the new block is initialized.
        unsafe {
            let written = self.block.as_ptr().add(self.index);
            self.buf.destroy_range(written, self.filled);
            self.buf.release(self.block, self.cap);
        }
    }
}

/// Truncates back to `len` unless disarmed.
struct Rollback<'a, T, A: Allocator> {
    vec: &'a mut Vector<T, A>,
    len: usize,
    armed: bool,
}

impl<T, A: Allocator> Drop for Rollback<'_, T, A> {
    fn drop(&mut self) {
        if self.armed {
            self.vec.truncate(self.len);
        }
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` is initialized; the buffer is released by `RawBuffer`.
        unsafe { self.buf.destroy_range(self.buf.ptr(), self.len) }
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator> Index<I> for Vector<T, A> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator> IndexMut<I> for Vector<T, A> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    /// Deep copy with capacity equal to the source length.
    ///
    /// A panicking `clone` drops the partial copy; `self` is never modified.
    fn clone(&self) -> Self {
        let mut copy = Vector::with_capacity_in(self.len, self.allocator().clone());
        copy.extend_from_slice(self);
        copy
    }

    /// Assignment: copies `source` behind the current elements, reusing the
    /// buffer when it is large enough, then drops the old elements. If a
    /// `clone` panics, `self` keeps its previous contents.
    fn clone_from(&mut self, source: &Self) {
        let mut next = 0;
        self.replace_with(source.len, || {
            let value = source[next].clone();
            next += 1;
            value
        });
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Vector::new()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: PartialEq, A1: Allocator, A2: Allocator> PartialEq<Vector<T, A2>> for Vector<T, A1> {
    fn eq(&self, other: &Vector<T, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Vector::new();
        v.extend(iter);
        v
    }
}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(self.len.saturating_add(iter.size_hint().0));
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(values: &[T]) -> Self {
        let mut v = Vector::with_capacity(values.len());
        v.extend_from_slice(values);
        v
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so ownership of the buffer moves to the iterator.
        let buf = unsafe { ptr::read(&this.buf) };
        IntoIter {
            buf,
            front: 0,
            back: this.len,
        }
    }
}

/// An owning iterator over the elements of a [`Vector`].
///
/// ```
/// use avl_collections::Vector;
///
/// let v = Vector::from([1, 2, 3]);
/// let mut iter = v.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.len(), 1);
/// ```
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RawBuffer<T, A>,
    front: usize,
    back: usize,
}

// SAFETY: The iterator owns the remaining elements, as `Vector` does.
unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}
// SAFETY: Shared access exposes nothing but `Debug` output.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: Slots in `[front, back)` are initialized and each is read once.
        let value = unsafe { self.buf.ptr().add(self.front).read() };
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: As in `next`.
        Some(unsafe { self.buf.ptr().add(self.back).read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: `[front, back)` still holds values that were never yielded.
        unsafe {
            let rest = self.buf.ptr().add(self.front);
            self.buf.destroy_range(rest, self.back - self.front);
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SAFETY: `[front, back)` is initialized.
        let rest = unsafe { slice::from_raw_parts(self.buf.ptr().add(self.front), self.back - self.front) };
        f.debug_tuple("IntoIter").field(&rest).finish()
    }
}
