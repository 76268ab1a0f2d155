// Copyright 2026 The tagpool developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Support traits.

use core::mem::{align_of, size_of};
use core::slice;

#[cfg(feature = "std")]
use std::boxed::Box;

/// Trait for types that can be safely used as the backing data type for
/// storage of arbitrary data.
///
/// `ByteData` is implemented by default for all basic integer types.
///
/// # Safety
///
/// This trait is used to constrain implementations of the [`Buffer`]
/// trait to known types that are considered "safe" to use as the backing
/// storage of a pool. To properly implement this trait, the type should
/// have the following characteristics:
///
/// - Allow arbitrary bytes within instances of the type to be written to
///   with arbitrary values without affecting other bytes.
/// - Allow previously written bytes to be read back regardless of whether
///   other bytes have been written to yet.
/// - Have no [`Drop`] implementation that relies on the data being in any
///   particular state.
///
/// [`Buffer`]: trait.Buffer.html
/// [`Drop`]: https://doc.rust-lang.org/core/ops/trait.Drop.html
pub unsafe trait ByteData: Sized {}

unsafe impl ByteData for u8 {}
unsafe impl ByteData for u16 {}
unsafe impl ByteData for u32 {}
unsafe impl ByteData for u64 {}
unsafe impl ByteData for u128 {}
unsafe impl ByteData for usize {}
unsafe impl ByteData for i8 {}
unsafe impl ByteData for i16 {}
unsafe impl ByteData for i32 {}
unsafe impl ByteData for i64 {}
unsafe impl ByteData for i128 {}
unsafe impl ByteData for isize {}

/// Trait for types that can be used as the backing buffer of a [`Pool`].
///
/// `Buffer` is implemented for static arrays, mutable slice references,
/// and (when the `std` feature is enabled) boxed slices whose element type
/// implements [`ByteData`]. The element type determines the buffer's
/// guaranteed alignment: a `[u32; 6]` buffer is 4-byte aligned wherever it
/// lives, while a `[u8; 24]` buffer guarantees nothing.
///
/// # Safety
///
/// Implementations must return a stable view of one contiguous region of
/// memory: `as_bytes()` and `as_bytes_mut()` must address the same bytes,
/// the length must never change, and [`ALIGN`] must not exceed the
/// region's actual alignment guarantee.
///
/// [`ALIGN`]: trait.Buffer.html#associatedconstant.ALIGN
/// [`ByteData`]: trait.ByteData.html
/// [`Pool`]: struct.Pool.html
pub unsafe trait Buffer {
    /// Alignment guaranteed for the start of the buffer, in bytes.
    const ALIGN: usize;

    /// Byte view of the buffer contents.
    fn as_bytes(&self) -> &[u8];

    /// Mutable byte view of the buffer contents.
    fn as_bytes_mut(&mut self) -> &mut [u8];
}

unsafe impl<T, const N: usize> Buffer for [T; N]
where
    T: ByteData,
{
    const ALIGN: usize = align_of::<T>();

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            slice::from_raw_parts(
                self.as_ptr() as *const u8,
                N * size_of::<T>(),
            )
        }
    }

    #[inline]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe {
            slice::from_raw_parts_mut(
                self.as_mut_ptr() as *mut u8,
                N * size_of::<T>(),
            )
        }
    }
}

unsafe impl<'a, T> Buffer for &'a mut [T]
where
    T: ByteData,
{
    const ALIGN: usize = align_of::<T>();

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            slice::from_raw_parts(
                self.as_ptr() as *const u8,
                self.len() * size_of::<T>(),
            )
        }
    }

    #[inline]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe {
            slice::from_raw_parts_mut(
                self.as_mut_ptr() as *mut u8,
                self.len() * size_of::<T>(),
            )
        }
    }
}

#[cfg(feature = "std")]
unsafe impl<T> Buffer for Box<[T]>
where
    T: ByteData,
{
    const ALIGN: usize = align_of::<T>();

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            slice::from_raw_parts(
                self.as_ptr() as *const u8,
                self.len() * size_of::<T>(),
            )
        }
    }

    #[inline]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe {
            slice::from_raw_parts_mut(
                self.as_mut_ptr() as *mut u8,
                self.len() * size_of::<T>(),
            )
        }
    }
}
