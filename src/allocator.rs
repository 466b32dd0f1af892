//! Pluggable memory acquisition for the collections in this crate.
//!
//! Both [`Vector`](crate::Vector) and [`AvlMap`](crate::AvlMap) obtain their
//! storage through an [`Allocator`]. The default, [`Global`], forwards to the
//! platform allocator.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::error::{Error, Result};

/// A strategy for acquiring and releasing raw memory, and for constructing and
/// destroying values in it.
///
/// Zero-sized layouts are never passed to [`allocate`](Allocator::allocate).
///
/// # Safety
///
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and that stay valid until
/// passed back to [`deallocate`](Allocator::deallocate) on the same allocator or
/// a clone of it.
pub unsafe trait Allocator {
    /// Acquires a block of memory described by `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] when the request cannot be satisfied.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Releases a block previously returned by [`allocate`](Allocator::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator (or a clone)
    /// with the same `layout`, and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Moves `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes and properly aligned. Any value already in
    /// the slot is overwritten without being dropped.
    #[inline]
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: Upheld by the caller.
        unsafe { ptr.as_ptr().write(value) }
    }

    /// Drops the value at `ptr` in place, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, properly aligned `T` that is not used again
    /// until reconstructed.
    #[inline]
    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        // SAFETY: Upheld by the caller.
        unsafe { core::ptr::drop_in_place(ptr.as_ptr()) }
    }

    /// The largest number of `T` a single allocation can theoretically hold.
    #[inline]
    fn max_size<T>(&self) -> usize {
        match core::mem::size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }
}

/// The platform allocator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Global;

// SAFETY: Forwards to `alloc::alloc`, which upholds the trait contract for
// non-zero-sized layouts.
unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        debug_assert!(layout.size() != 0, "`Global::allocate()` - zero-sized layout!");
        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| alloc_failed(layout))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Upheld by the caller.
        unsafe { alloc::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// Builds the error for a refused `layout`, logging the failure.
#[cold]
pub(crate) fn alloc_failed(layout: Layout) -> Error {
    tracing::debug!(size = layout.size(), align = layout.align(), "allocation failed");
    Error::AllocFailed {
        size: layout.size(),
        align: layout.align(),
    }
}

/// Turns a fallible allocation result into the `std` behaviour for infallible
/// APIs: abort on allocation failure, panic on capacity overflow.
#[track_caller]
pub(crate) fn handle_error(err: Error) -> ! {
    match err {
        Error::AllocFailed { size, align } => {
            // `AllocFailed` is only ever built from a valid layout.
            match Layout::from_size_align(size, align) {
                Ok(layout) => alloc::alloc::handle_alloc_error(layout),
                Err(_) => panic!("capacity overflow"),
            }
        }
        Error::CapacityOverflow => panic!("capacity overflow"),
        other => panic!("unexpected allocation error: {other}"),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn global_round_trip() {
        let layout = Layout::new::<u64>();
        let ptr = Global.allocate(layout).unwrap().cast::<u64>();
        unsafe {
            Global.construct(ptr, 42);
            assert_eq!(*ptr.as_ptr(), 42);
            Global.destroy(ptr);
            Global.deallocate(ptr.cast(), layout);
        }
    }

    #[test]
    fn max_size_scales_with_element_size() {
        assert_eq!(Global.max_size::<()>(), usize::MAX);
        assert_eq!(Global.max_size::<u8>(), isize::MAX as usize);
        assert_eq!(Global.max_size::<u64>(), isize::MAX as usize / 8);
    }

    #[test]
    fn alloc_failed_reports_layout() {
        let layout = Layout::from_size_align(48, 16).unwrap();
        assert_eq!(alloc_failed(layout), Error::AllocFailed { size: 48, align: 16 });
    }
}
