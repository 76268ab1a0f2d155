// Copyright 2026 The tagpool developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fixed-capacity, in-place memory pool using boundary tags.
//!
//! # Overview
//!
//! [`Pool`] manages a single fixed-size byte buffer as a sequence of
//! variable-length blocks, with all bookkeeping stored inside the buffer
//! itself and no dependency on any other memory facility. Each block is
//! bracketed by a pair of signed 32-bit boundary tags: the magnitude is
//! the block's payload capacity in bytes, and the sign is its state
//! (positive for free, negative for in use).
//!
//! ```text
//! +------+--------------------+------+------+-----------+------+
//! | -12  |  12 bytes in use   | -12  |  +8  |  8 free   |  +8  |
//! +------+--------------------+------+------+-----------+------+
//!   tag        payload          tag    tag    payload     tag
//! ```
//!
//! Allocation is first-fit: blocks are scanned in ascending offset order
//! and the earliest free block large enough for the request is taken. If
//! the leftover space could host at least one more element plus its own
//! tag pair, the block is split in two; otherwise it is consumed whole
//! and the excess rides along as padding. Deallocation validates the
//! returned pointer against the tags, then merges the freed block with
//! any free neighbor on either side, so two free blocks are never left
//! adjacent.
//!
//! Because every structural decision is encoded in the tags, the whole
//! pool can be checked for consistency with one linear walk. The pool
//! performs exactly that walk after construction and after every mutation
//! in debug and test builds; release builds compile the check out.
//!
//! # Crate Features
//!
//! - **`std`**: Allows boxed slices to be used as the backing buffer
//!   type. Enabled by default; can be disabled to build the crate with
//!   `#![no_std]`.
//!
//! # Examples
//!
//! Backing a pool with an inline array, allocating, constructing, and
//! releasing:
//!
//! ```
//! use tagpool::{array_type_for_bytes, Pool};
//!
//! // 4-byte-aligned, 256-byte buffer.
//! type Buffer = array_type_for_bytes!(u32, 256);
//!
//! let pool = Pool::<u32, Buffer>::new([0; 64]).unwrap();
//!
//! let values = pool.allocate(3).unwrap();
//! unsafe {
//!     for i in 0..3 {
//!         let slot = core::ptr::NonNull::new_unchecked(
//!             values.as_ptr().add(i),
//!         );
//!         pool.construct(slot, i as u32 * 10);
//!     }
//!     assert_eq!(*values.as_ptr().add(2), 20);
//!     for i in 0..3 {
//!         let slot = core::ptr::NonNull::new_unchecked(
//!             values.as_ptr().add(i),
//!         );
//!         pool.destroy(slot);
//!     }
//! }
//! pool.deallocate(values, 3).unwrap();
//! ```
//!
//! # Limitations
//!
//! - Element types must have an alignment no greater than the tag width
//!   (4 bytes) and no greater than the backing buffer's guaranteed
//!   alignment; [`Pool::new()`] rejects anything else.
//! - The pool is not safe for concurrent access; callers sharing one
//!   across threads must serialize access externally.
//! - The buffer is never grown, shrunk, or compacted. An allocation that
//!   exceeds the largest free block fails even if the total free space
//!   would suffice.
//! - Moving or dropping a pool invalidates every pointer it has handed
//!   out, and dropping it never runs element destructors; callers tear
//!   elements down with [`Pool::destroy()`] first.
//!
//! [`Pool`]: struct.Pool.html
//! [`Pool::destroy()`]: struct.Pool.html#method.destroy
//! [`Pool::new()`]: struct.Pool.html#method.new

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate core;

mod error;
mod pool;
mod tag;
mod traits;
mod utility;


pub use error::Error;
pub use pool::Pool;
pub use traits::{Buffer, ByteData};

// Re-export `size_of()` for easier use with our exported macros.
pub use core::mem::size_of;
