// Copyright 2026 The tagpool developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error support.

use core::fmt;

/// [`Pool`] construction and allocation errors.
///
/// Every fallible pool operation reports its failure to the immediate
/// caller through this type; nothing is retried internally, and no error
/// leaves the pool's buffer in a partially mutated state.
///
/// [`Pool`]: struct.Pool.html
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The backing buffer is too small to host even one element and its
    /// pair of boundary tags.
    BufferTooSmall,
    /// The element type's alignment exceeds what the buffer and tag
    /// layout can guarantee.
    UnsupportedAlignment,
    /// Integer overflow detected (a very large element count, or a buffer
    /// whose capacity cannot be represented in a tag).
    Overflow,
    /// No free block has sufficient capacity for the request.
    InsufficientMemory,
    /// The pointer handed to [`deallocate()`] is out of range, does not
    /// address a block in use, or disagrees with the block's tags.
    ///
    /// [`deallocate()`]: struct.Pool.html#method.deallocate
    InvalidPointer,
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BufferTooSmall => {
                write!(f, "buffer too small for a minimal block")
            }
            Error::UnsupportedAlignment => {
                write!(f, "element alignment exceeds buffer guarantees")
            }
            Error::Overflow => write!(f, "integer overflow"),
            Error::InsufficientMemory => {
                write!(f, "insufficient free pool space")
            }
            Error::InvalidPointer => write!(f, "invalid block pointer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
