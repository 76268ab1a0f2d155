// Copyright 2026 The tagpool developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Buffer declaration macros.

/// Returns the minimum number of elements of a given type necessary for
/// storage of a given byte count. The actual supported byte count may be
/// larger due to padding.
///
/// # Examples
///
/// ```
/// use tagpool::array_len_for_bytes;
///
/// assert_eq!(array_len_for_bytes!(u32, 24), 6);
/// assert_eq!(array_len_for_bytes!(u32, 25), 7);
/// ```
#[macro_export]
macro_rules! array_len_for_bytes {
    ($element:ty, $bytes:expr) => {
        ($bytes + $crate::size_of::<$element>() - 1)
            / $crate::size_of::<$element>()
    };

    ($element:ty, $bytes:expr,) => {
        $crate::array_len_for_bytes!($element, $bytes)
    };
}

/// Declares a static array of the specified element type that is large
/// enough for storage of a given byte count. The actual supported byte
/// count may be larger due to padding.
///
/// Useful for declaring pool buffers whose alignment comes from the
/// element type while sizing them in bytes.
///
/// # Examples
///
/// ```
/// use tagpool::{array_type_for_bytes, Pool};
///
/// // `BufferType` is the same as `[u32; 6]`.
/// type BufferType = array_type_for_bytes!(u32, 24);
///
/// let pool = Pool::<u32, BufferType>::new([0; 6]).unwrap();
/// assert_eq!(pool.capacity(), 16);
/// ```
#[macro_export]
macro_rules! array_type_for_bytes {
    ($element:ty, $bytes:expr) => {
        [$element; $crate::array_len_for_bytes!($element, $bytes)]
    };

    ($element:ty, $bytes:expr,) => {
        $crate::array_type_for_bytes!($element, $bytes)
    };
}
