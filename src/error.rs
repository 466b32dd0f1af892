//! Error types shared by every collection in the crate.
//!
//! Only two kinds of failure are reported as values: asking for something that is
//! not there (`at` on a map or array) and running out of memory. Everything else
//! is either a normal outcome encoded in the return value (a duplicate key on
//! insert, a missing key on find) or a logic error on the caller's side.

use thiserror::Error;

/// Errors returned by checked accessors and fallible allocation paths.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// A checked map lookup (`at`/`at_mut`) found no entry for the key.
    #[error("no entry found for key")]
    KeyNotFound,

    /// A checked array access (`at`/`at_mut`) was past the end.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the array at the time of the call.
        len: usize,
    },

    /// The allocator could not satisfy a request.
    ///
    /// The collection that made the request is left exactly as it was.
    #[error("memory allocation of {size} bytes (align {align}) failed")]
    AllocFailed {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },

    /// A requested capacity cannot be represented.
    #[error("capacity overflow")]
    CapacityOverflow,
}

/// A `Result` alias using the crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "no entry found for key");
        assert_eq!(
            Error::IndexOutOfRange { index: 7, len: 3 }.to_string(),
            "index 7 out of range for length 3"
        );
        assert_eq!(
            Error::AllocFailed { size: 64, align: 8 }.to_string(),
            "memory allocation of 64 bytes (align 8) failed"
        );
    }
}
