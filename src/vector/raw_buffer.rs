use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::allocator::Allocator;
use crate::error::{Error, Result};

/// An owned, uninitialized block of `cap` slots for `T`.
///
/// The buffer only owns memory. Tracking which slots hold live values is up to
/// the owner (`Vector` keeps them in `[0, len)`).
pub(crate) struct RawBuffer<T, A: Allocator> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator> RawBuffer<T, A> {
    pub(crate) const IS_ZST: bool = mem::size_of::<T>() == 0;

    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            alloc,
            _marker: PhantomData,
        }
    }

    pub(crate) fn try_with_capacity_in(cap: usize, alloc: A) -> Result<Self> {
        let ptr = Self::allocate_block(&alloc, cap)?;
        Ok(Self {
            ptr,
            cap: if Self::IS_ZST { usize::MAX } else { cap },
            alloc,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub(crate) const fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Moves `value` into the uninitialized slot at `slot` through the allocator.
    ///
    /// # Safety
    ///
    /// `slot` must lie in this buffer or in a block from
    /// [`allocate_like`](Self::allocate_like), and must be uninitialized.
    #[inline]
    pub(crate) unsafe fn construct(&self, slot: *mut T, value: T) {
        // SAFETY: Upheld by the caller; block pointers are never null.
        unsafe { self.alloc.construct(NonNull::new_unchecked(slot), value) }
    }

    /// Destroys the `count` live values starting at `first`, front to back,
    /// through the allocator. If a destructor panics, the values after it are
    /// leaked.
    ///
    /// # Safety
    ///
    /// `[first, first + count)` must hold live values in this buffer or in a
    /// block from [`allocate_like`](Self::allocate_like). They must not be used
    /// again.
    pub(crate) unsafe fn destroy_range(&self, first: *mut T, count: usize) {
        for offset in 0..count {
            // SAFETY: Upheld by the caller.
            unsafe { self.alloc.destroy(NonNull::new_unchecked(first.add(offset))) }
        }
    }

    /// Acquires a fresh block for `cap` values from this buffer's allocator.
    ///
    /// The block is not owned by `self` until passed to [`install`](Self::install).
    pub(crate) fn allocate_like(&self, cap: usize) -> Result<NonNull<T>> {
        Self::allocate_block(&self.alloc, cap)
    }

    /// Releases a block obtained from [`allocate_like`](Self::allocate_like)
    /// without installing it.
    ///
    /// # Safety
    ///
    /// `block` must come from `allocate_like(cap)` on this buffer and must not
    /// hold any value that still needs dropping.
    pub(crate) unsafe fn release(&self, block: NonNull<T>, cap: usize) {
        // SAFETY: Upheld by the caller.
        unsafe { Self::deallocate_block(&self.alloc, block, cap) }
    }

    /// Replaces the owned block with `block`, releasing the old one.
    ///
    /// Values left in the old block are forgotten, not dropped; the caller must
    /// already have moved them out.
    ///
    /// # Safety
    ///
    /// `block` must come from `allocate_like(cap)` on this buffer.
    pub(crate) unsafe fn install(&mut self, block: NonNull<T>, cap: usize) {
        if Self::IS_ZST {
            return;
        }
        tracing::trace!(old_capacity = self.cap, new_capacity = cap, "reallocating buffer");
        let old = mem::replace(&mut self.ptr, block);
        let old_cap = mem::replace(&mut self.cap, cap);
        // SAFETY: `old` was the block owned by `self` with capacity `old_cap`.
        unsafe { Self::deallocate_block(&self.alloc, old, old_cap) }
    }

    /// Moves the first `len` values into a new block of `new_cap` slots.
    ///
    /// On failure nothing changes.
    pub(crate) fn try_reallocate(&mut self, new_cap: usize, len: usize) -> Result<()> {
        debug_assert!(len <= new_cap);
        if Self::IS_ZST {
            return Ok(());
        }
        let block = self.allocate_like(new_cap)?;
        // SAFETY: Both blocks hold at least `len` slots and are distinct allocations.
        // Bitwise moves cannot fail, so the old values are simply forgotten.
        unsafe {
            core::ptr::copy_nonoverlapping(self.ptr(), block.as_ptr(), len);
            self.install(block, new_cap);
        }
        Ok(())
    }

    fn layout(cap: usize) -> Result<Layout> {
        let layout = Layout::array::<T>(cap).map_err(|_| Error::CapacityOverflow)?;
        if layout.size() > isize::MAX as usize {
            return Err(Error::CapacityOverflow);
        }
        Ok(layout)
    }

    fn allocate_block(alloc: &A, cap: usize) -> Result<NonNull<T>> {
        if Self::IS_ZST || cap == 0 {
            return Ok(NonNull::dangling());
        }
        let layout = Self::layout(cap)?;
        Ok(alloc.allocate(layout)?.cast())
    }

    unsafe fn deallocate_block(alloc: &A, block: NonNull<T>, cap: usize) {
        if Self::IS_ZST || cap == 0 {
            return;
        }
        // The layout was validated when the block was allocated.
        if let Ok(layout) = Self::layout(cap) {
            // SAFETY: Upheld by the caller.
            unsafe { alloc.deallocate(block.cast(), layout) }
        }
    }
}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        // SAFETY: The block is owned by `self`; live values were dropped by the owner.
        unsafe { Self::deallocate_block(&self.alloc, self.ptr, self.cap) }
    }
}
