use core::ptr;

use crate::allocator::{Allocator, handle_error};
use crate::error::{Error, Result};
use crate::vector::Vector;

use super::handle::Handle;

enum Slot<T> {
    /// Slot 0, standing in for [`Handle::NIL`].
    Sentinel,
    Occupied(T),
    Vacant { next_free: Handle },
}

/// Slab storage addressed by [`Handle`], backed by a [`Vector`] from the
/// collection's allocator.
///
/// Freed slots form an intrusive list threaded through the vacant slots and are
/// reused before the vector grows. Handles of live elements never move.
pub(crate) struct Arena<T, A: Allocator> {
    slots: Vector<Slot<T>, A>,
    // `Handle::NIL` when no slot is vacant.
    free_head: Handle,
    len: usize,
}

impl<T, A: Allocator> Arena<T, A> {
    pub(crate) fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        let slots_needed = capacity.checked_add(1).ok_or(Error::CapacityOverflow)?;
        let mut slots = Vector::try_with_capacity_in(slots_needed, alloc)?;
        slots.try_push_back(Slot::Sentinel)?;
        Ok(Self {
            slots,
            free_head: Handle::NIL,
            len: 0,
        })
    }

    pub(crate) fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::try_with_capacity_in(capacity, alloc).unwrap_or_else(|err| handle_error(err))
    }

    pub(crate) fn allocator(&self) -> &A {
        self.slots.allocator()
    }

    /// Number of elements that fit without growing the backing vector.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity() - 1
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Stores `element`, reusing a vacant slot when there is one.
    ///
    /// On failure the arena is unchanged and `element` is dropped.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle> {
        let handle = if self.free_head.is_nil() {
            if self.slots.len() > Handle::MAX {
                return Err(Error::CapacityOverflow);
            }
            self.slots.try_push_back(Slot::Occupied(element))?;
            Handle::from_index(self.slots.len() - 1)
        } else {
            let handle = self.free_head;
            let slot = &mut self.slots[handle.to_index()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("`Arena::try_alloc()` - free list points at a live slot!");
            };
            *slot = Slot::Occupied(element);
            self.free_head = next_free;
            handle
        };
        self.len += 1;
        Ok(handle)
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        self.try_alloc(element).unwrap_or_else(|err| handle_error(err))
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            _ => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            _ => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Returns a pointer to the element at `handle` without borrowing any other slot.
    ///
    /// # Safety
    ///
    /// - `this` must point to a live `Arena` that nothing else borrows as a whole
    ///   for the duration of the call.
    /// - No other reference to the element at `handle` may be live while the
    ///   returned pointer is dereferenced mutably.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr(this: *mut Self, handle: Handle) -> *mut T {
        // SAFETY: Upheld by the caller. `as_mut_ptr` borrows only the vector header,
        // so references to other elements handed out earlier stay valid.
        unsafe {
            let slots = &mut (*this).slots;
            assert!(handle.to_index() < slots.len(), "`Arena::get_mut_ptr()` - `handle` is invalid!");
            match &mut *slots.as_mut_ptr().add(handle.to_index()) {
                Slot::Occupied(element) => ptr::from_mut(element),
                _ => panic!("`Arena::get_mut_ptr()` - `handle` is invalid!"),
            }
        }
    }

    /// Moves the element out and puts its slot on the free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let index = handle.to_index();
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[index], vacant) {
            Slot::Occupied(element) => {
                self.free_head = handle;
                self.len -= 1;
                element
            }
            other => {
                self.slots[index] = other;
                panic!("`Arena::take()` - `handle` is invalid!");
            }
        }
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    /// Drops every element, keeping the sentinel slot and the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.truncate(1);
        self.free_head = Handle::NIL;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::allocator::Global;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn arena() -> Arena<u32, Global> {
        Arena::with_capacity_in(0, Global)
    }

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32, Global> = Arena::with_capacity_in(10, Global);
        assert_eq!(arena.capacity(), 10);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn first_handle_is_not_nil() {
        let mut arena = arena();
        let handle = arena.alloc(7);
        assert!(!handle.is_nil());
        assert_eq!(handle.to_index(), 1);
    }

    #[test]
    fn freed_slots_are_reused_last_in_first_out() {
        let mut arena = arena();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let _c = arena.alloc(3);
        arena.free(a);
        arena.free(b);
        assert_eq!(arena.alloc(4), b);
        assert_eq!(arena.alloc(5), a);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn sentinel_is_not_an_element() {
        let arena = arena();
        let _ = arena.get(Handle::NIL);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_take() {
        let mut arena = arena();
        let handle = arena.alloc(1);
        arena.free(handle);
        let _ = arena.take(handle);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena = arena();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(!handle.is_nil());
                        prop_assert!(model.iter().all(|&(h, _)| h != handle));
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, value2);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            10 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
