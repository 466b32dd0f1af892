#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a slot in an [`Arena`](super::arena::Arena).
///
/// Slot 0 of every arena is reserved, so [`Handle::NIL`] never names a stored
/// element. In the node arena it is the tree's sentinel: the missing child, the
/// parent of the root, and the past-the-end position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(RawHandle);

impl Handle {
    pub(crate) const NIL: Self = Self(0);
    pub(crate) const MAX: usize = RawHandle::MAX as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self(index as RawHandle)
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn is_nil(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Handles stay as small as the raw index so nodes keep three links in 12 bytes.
    assert_eq_size!(Handle, RawHandle);

    #[test]
    fn nil_is_slot_zero() {
        assert!(Handle::NIL.is_nil());
        assert_eq!(Handle::NIL.to_index(), 0);
        assert!(!Handle::from_index(1).is_nil());
    }

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::from_index(index);
            assert_eq!(handle.to_index(), index);
        }
    }
}
