// Copyright 2026 The tagpool developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Boundary tag codec.
//!
//! Every block in a pool is bracketed by a pair of signed 32-bit tags
//! stored directly in the buffer. A tag's magnitude is the block's payload
//! capacity in bytes, and its sign is the block's state: positive for
//! free, negative for in use. A tag of zero is never valid.
//!
//! Payload capacities are not required to be multiples of the tag width,
//! so trailing tags can land on any byte offset; all tag access is
//! therefore unaligned.

use core::mem::size_of;
use core::ptr;

/// Width of a single boundary tag, in bytes.
pub(crate) const TAG_SIZE: usize = size_of::<i32>();

/// Byte distance from a tag to its partner at the other end of the block.
///
/// This is the single traversal formula used everywhere blocks are walked:
/// the partner tag lies `|value| + TAG_SIZE` bytes further along, for free
/// and used blocks alike.
#[inline]
pub(crate) fn pair_distance(value: i32) -> usize {
    value.unsigned_abs() as usize + TAG_SIZE
}

/// Offset-addressed view of a pool's buffer for tag access.
///
/// All reads and writes of tag values go through this type, which bounds-
/// checks the offset against the buffer length before touching memory.
/// Callers within the crate compute offsets from tag values they have
/// already read, so an out-of-bounds access here is an internal bug, not a
/// recoverable condition.
pub(crate) struct Tags {
    base: *mut u8,
    len: usize,
}

impl Tags {
    #[inline]
    pub(crate) fn new(base: *mut u8, len: usize) -> Self {
        Tags { base, len }
    }

    /// Total buffer length, in bytes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Reads the tag stored at the given byte offset.
    #[inline]
    pub(crate) fn get(&self, offset: usize) -> i32 {
        assert!(
            offset + TAG_SIZE <= self.len,
            "tag read out of bounds: offset {} in a {}-byte buffer",
            offset,
            self.len,
        );
        unsafe { ptr::read_unaligned(self.base.add(offset) as *const i32) }
    }

    /// Writes a tag value at the given byte offset.
    #[inline]
    pub(crate) fn set(&self, offset: usize, value: i32) {
        assert!(
            offset + TAG_SIZE <= self.len,
            "tag write out of bounds: offset {} in a {}-byte buffer",
            offset,
            self.len,
        );
        unsafe {
            ptr::write_unaligned(self.base.add(offset) as *mut i32, value);
        }
    }

    /// Pointer to the byte at the given offset.
    #[inline]
    pub(crate) fn byte_ptr(&self, offset: usize) -> *mut u8 {
        debug_assert!(offset <= self.len);
        unsafe { self.base.add(offset) }
    }
}
