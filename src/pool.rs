// Copyright 2026 The tagpool developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `Pool` type implementation.

use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr;
use core::ptr::NonNull;

use super::tag::{pair_distance, Tags, TAG_SIZE};
use super::{Buffer, Error};

/// Fixed-capacity, in-place memory pool for elements of a single type.
///
/// A `Pool` manages its backing buffer as a sequence of variable-length
/// blocks, each bracketed by a pair of signed boundary tags stored
/// directly in the buffer. No bookkeeping exists outside the buffer
/// itself: a tag's magnitude is the block's payload capacity in bytes and
/// its sign is the block's state (positive for free, negative for in
/// use).
///
/// Allocation scans blocks in ascending offset order and takes the first
/// free block large enough for the request, splitting off the remainder
/// as a new free block when the remainder could host at least one more
/// element with its own pair of tags. Deallocation validates the pointer
/// against the tags before touching anything, then merges the freed block
/// with a free neighbor on either side so that two free blocks are never
/// left adjacent.
///
/// Pointers returned by [`allocate()`] are non-owning views into the
/// pool's buffer. They remain valid until they are passed back to
/// [`deallocate()`], as long as the pool itself is neither moved nor
/// dropped. Dropping a pool never runs element destructors; callers
/// tear down elements with [`destroy()`] before releasing their blocks.
///
/// # Examples
///
/// ```
/// use tagpool::Pool;
///
/// // 24 bytes of 4-byte-aligned storage: room for two `u32` blocks.
/// let pool = Pool::<u32, [u32; 6]>::new([0; 6]).unwrap();
///
/// let x = pool.allocate(1).unwrap();
/// let y = pool.allocate(1).unwrap();
/// unsafe {
///     pool.construct(x, 7);
///     pool.construct(y, 11);
///     assert_eq!(*x.as_ref() + *y.as_ref(), 18);
///     pool.destroy(x);
///     pool.destroy(y);
/// }
/// pool.deallocate(x, 1).unwrap();
/// pool.deallocate(y, 1).unwrap();
/// ```
///
/// [`allocate()`]: #method.allocate
/// [`deallocate()`]: #method.deallocate
/// [`destroy()`]: #method.destroy
pub struct Pool<T, BufferT>
where
    BufferT: Buffer,
{
    /// Buffer from which blocks are carved. Kept in an `UnsafeCell` so
    /// that allocation methods can take `&self` while callers hold
    /// pointers into the buffer.
    buffer: UnsafeCell<BufferT>,
    /// Element type marker.
    _element: PhantomData<T>,
}

impl<T, BufferT> Pool<T, BufferT>
where
    BufferT: Buffer,
{
    /// Creates a pool spanning the given buffer.
    ///
    /// The entire buffer becomes a single free block with a usable
    /// capacity of the buffer length minus two tag widths. The initial
    /// contents of the buffer are ignored.
    ///
    /// Fails with [`Error::BufferTooSmall`] if the buffer cannot host one
    /// element plus two tags, with [`Error::UnsupportedAlignment`] if the
    /// element type's alignment exceeds the tag width or the buffer's
    /// guaranteed alignment, and with [`Error::Overflow`] if the usable
    /// capacity does not fit in a tag.
    ///
    /// Zero-sized element types are not supported and are rejected with a
    /// panic, as a block of zero payload bytes has no valid tag encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagpool::{Error, Pool};
    ///
    /// // One `u32` plus two tags is exactly 12 bytes.
    /// assert!(Pool::<u32, [u32; 3]>::new([0; 3]).is_ok());
    ///
    /// // A byte buffer guarantees nothing about alignment, so it cannot
    /// // back a pool of `u32`.
    /// assert_eq!(
    ///     Pool::<u32, [u8; 12]>::new([0; 12]).unwrap_err(),
    ///     Error::UnsupportedAlignment,
    /// );
    ///
    /// // One byte short of the minimal `u8` block.
    /// assert_eq!(
    ///     Pool::<u8, [u8; 8]>::new([0; 8]).unwrap_err(),
    ///     Error::BufferTooSmall,
    /// );
    /// ```
    ///
    /// [`Error::BufferTooSmall`]: enum.Error.html#variant.BufferTooSmall
    /// [`Error::Overflow`]: enum.Error.html#variant.Overflow
    /// [`Error::UnsupportedAlignment`]:
    /// enum.Error.html#variant.UnsupportedAlignment
    pub fn new(buffer: BufferT) -> Result<Self, Error> {
        assert!(
            size_of::<T>() > 0,
            "zero-sized element types are not supported",
        );

        if align_of::<T>() > TAG_SIZE || align_of::<T>() > BufferT::ALIGN {
            return Err(Error::UnsupportedAlignment);
        }

        let len = buffer.as_bytes().len();
        if len < size_of::<T>() + TAG_SIZE * 2 {
            return Err(Error::BufferTooSmall);
        }

        let capacity = len - TAG_SIZE * 2;
        if capacity > i32::MAX as usize {
            return Err(Error::Overflow);
        }

        let pool = Pool {
            buffer: UnsafeCell::new(buffer),
            _element: PhantomData,
        };

        let tags = pool.tags();
        tags.set(0, capacity as i32);
        tags.set(len - TAG_SIZE, capacity as i32);

        debug_assert!(pool.is_consistent());
        Ok(pool)
    }

    /// Allocates a block with room for `count` elements.
    ///
    /// Blocks are scanned in ascending offset order and the first free
    /// block with sufficient capacity is taken (first-fit). If the
    /// leftover space in that block could host at least one more element
    /// plus its own pair of tags, the block is split and the remainder
    /// stays free; otherwise the whole block is consumed and the excess
    /// is carried as unaddressable padding until the block is freed.
    ///
    /// The returned pointer addresses uninitialized storage for `count`
    /// elements; use [`construct()`] to place values in it.
    ///
    /// Fails with [`Error::InsufficientMemory`] when no free block can
    /// satisfy the request, and with [`Error::Overflow`] when the
    /// requested size overflows. Panics if `count` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagpool::{Error, Pool};
    ///
    /// let pool = Pool::<u32, [u32; 6]>::new([0; 6]).unwrap();
    ///
    /// let p = pool.allocate(2).unwrap();
    /// assert_eq!(pool.allocate(1).unwrap_err(), Error::InsufficientMemory);
    ///
    /// pool.deallocate(p, 2).unwrap();
    /// assert!(pool.allocate(1).is_ok());
    /// ```
    ///
    /// [`construct()`]: #method.construct
    /// [`Error::InsufficientMemory`]:
    /// enum.Error.html#variant.InsufficientMemory
    /// [`Error::Overflow`]: enum.Error.html#variant.Overflow
    pub fn allocate(&self, count: usize) -> Result<NonNull<T>, Error> {
        assert!(count > 0, "cannot allocate zero elements");

        let needed = count
            .checked_mul(size_of::<T>())
            .ok_or(Error::Overflow)?;
        if needed > i32::MAX as usize {
            return Err(Error::Overflow);
        }

        let tags = self.tags();
        let len = tags.len();
        let mut offset = 0;
        while offset < len {
            let lead = tags.get(offset);
            let capacity = lead.unsigned_abs() as usize;
            if lead > 0 && capacity >= needed {
                let payload = offset + TAG_SIZE;
                let remainder = capacity - needed;
                if remainder >= TAG_SIZE * 2 + size_of::<T>() {
                    // Split: carve out a used block of exactly the
                    // requested size, then re-tag what is left as a
                    // smaller free block.
                    let used = -(needed as i32);
                    tags.set(offset, used);
                    tags.set(payload + needed, used);

                    let free_lead = payload + needed + TAG_SIZE;
                    let free = (remainder - TAG_SIZE * 2) as i32;
                    tags.set(free_lead, free);
                    tags.set(free_lead + pair_distance(free), free);
                } else {
                    // Too tight to host another block: consume the whole
                    // block, keeping its magnitude. The unusable
                    // remainder rides along as padding.
                    tags.set(offset, -lead);
                    tags.set(payload + capacity, -lead);
                }

                debug_assert!(self.is_consistent());
                let ptr = tags.byte_ptr(payload) as *mut T;
                return Ok(unsafe { NonNull::new_unchecked(ptr) });
            }
            offset += capacity + TAG_SIZE * 2;
        }

        Err(Error::InsufficientMemory)
    }

    /// Releases the block previously returned by an [`allocate()`] call
    /// for `count` elements.
    ///
    /// The pointer is validated against the pool bounds and the block's
    /// tags before anything is mutated: it must address the first payload
    /// byte of a block currently in use whose capacity can hold `count`
    /// elements. Offset pointers, double frees, stray pointers from
    /// other pools, and corrupted tags all surface as
    /// [`Error::InvalidPointer`] with the pool untouched.
    ///
    /// Once validated, the block is flipped to free and merged with a
    /// free neighbor on either side in the same call, reclaiming the
    /// interior tag pairs.
    ///
    /// Any elements in the block must already have been torn down via
    /// [`destroy()`]; deallocation itself never runs destructors.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagpool::{Error, Pool};
    ///
    /// let pool = Pool::<u32, [u32; 6]>::new([0; 6]).unwrap();
    ///
    /// let p = pool.allocate(1).unwrap();
    /// assert_eq!(pool.deallocate(p, 1), Ok(()));
    /// assert_eq!(pool.deallocate(p, 1), Err(Error::InvalidPointer));
    /// ```
    ///
    /// [`allocate()`]: #method.allocate
    /// [`destroy()`]: #method.destroy
    /// [`Error::InvalidPointer`]: enum.Error.html#variant.InvalidPointer
    pub fn deallocate(
        &self,
        ptr: NonNull<T>,
        count: usize,
    ) -> Result<(), Error> {
        let tags = self.tags();
        let len = tags.len();

        let base = tags.byte_ptr(0) as usize;
        let offset = match (ptr.as_ptr() as usize).checked_sub(base) {
            Some(offset) => offset,
            None => return Err(Error::InvalidPointer),
        };
        if offset < TAG_SIZE
            || offset > len - TAG_SIZE - size_of::<T>()
        {
            return Err(Error::InvalidPointer);
        }

        let lead_offset = offset - TAG_SIZE;
        let lead = tags.get(lead_offset);
        if lead >= 0 {
            return Err(Error::InvalidPointer);
        }

        let capacity = lead.unsigned_abs() as usize;
        let trail_offset = offset + capacity;
        if trail_offset + TAG_SIZE > len || tags.get(trail_offset) != lead
        {
            return Err(Error::InvalidPointer);
        }

        let released = count
            .checked_mul(size_of::<T>())
            .ok_or(Error::InvalidPointer)?;
        if count == 0 || released > capacity {
            return Err(Error::InvalidPointer);
        }

        // The block checks out; free it and fold in any free neighbor.
        // Interior tags of absorbed neighbors are left stale, as the
        // block walk never lands on them again.
        let mut merged_lead = lead_offset;
        let mut merged_trail = trail_offset;
        let mut merged_capacity = capacity;

        // A real left neighbor contributes at least its own tag pair
        // before this block's leading tag.
        if lead_offset >= TAG_SIZE * 2 {
            let left = tags.get(lead_offset - TAG_SIZE);
            if left > 0 {
                let left_capacity = left as usize;
                merged_lead = lead_offset
                    .checked_sub(TAG_SIZE * 2 + left_capacity)
                    .ok_or(Error::InvalidPointer)?;
                merged_capacity += left_capacity + TAG_SIZE * 2;
            }
        }

        if trail_offset + TAG_SIZE * 2 <= len {
            let right = tags.get(trail_offset + TAG_SIZE);
            if right > 0 {
                let right_capacity = right as usize;
                merged_trail =
                    trail_offset + TAG_SIZE * 2 + right_capacity;
                if merged_trail + TAG_SIZE > len {
                    return Err(Error::InvalidPointer);
                }
                merged_capacity += right_capacity + TAG_SIZE * 2;
            }
        }

        let merged = merged_capacity as i32;
        tags.set(merged_lead, merged);
        tags.set(merged_trail, merged);

        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Moves `value` into the storage at `ptr`.
    ///
    /// This is a pure placement pass-through: the pool takes no part in
    /// the element's own initialization semantics beyond writing it into
    /// place without reading or dropping the previous contents.
    ///
    /// # Safety
    ///
    /// `ptr` must address element storage obtained from [`allocate()`] on
    /// this pool that has not yet been deallocated, and must not hold a
    /// previously constructed value that still needs to be dropped.
    ///
    /// [`allocate()`]: #method.allocate
    #[inline]
    pub unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        ptr::write(ptr.as_ptr(), value);
    }

    /// Drops the element at `ptr` in place.
    ///
    /// The storage itself remains allocated; pass it to [`deallocate()`]
    /// to release the block.
    ///
    /// # Safety
    ///
    /// `ptr` must address a valid, constructed element within a block
    /// obtained from [`allocate()`] on this pool, and the value must not
    /// be used or dropped again afterwards.
    ///
    /// [`allocate()`]: #method.allocate
    /// [`deallocate()`]: #method.deallocate
    #[inline]
    pub unsafe fn destroy(&self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr());
    }

    /// Usable capacity of an empty pool, in bytes.
    ///
    /// This is the buffer length minus the two boundary tags of the
    /// initial block. Splitting introduces additional tag pairs, so the
    /// sum of allocatable bytes shrinks as the pool fragments.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.tags().len() - TAG_SIZE * 2
    }

    /// Total payload bytes currently held by blocks in use.
    ///
    /// Blocks consumed whole count their full capacity, including any
    /// padding beyond the size that was requested.
    pub fn used_bytes(&self) -> usize {
        self.sum_blocks(false)
    }

    /// Total payload bytes currently available across all free blocks.
    ///
    /// Note that a single allocation larger than the largest free block
    /// can still fail even when it would fit in this total.
    pub fn available_bytes(&self) -> usize {
        self.sum_blocks(true)
    }

    /// Walks the whole buffer verifying the boundary-tag invariants: no
    /// zero tags, matching tag pairs, no two adjacent free blocks, and
    /// blocks covering the buffer exactly.
    ///
    /// This is a correctness oracle for the pool implementation itself,
    /// invoked via `debug_assert!` after construction and after every
    /// mutation; a `false` return indicates a bug in the pool, not a
    /// caller error.
    pub(crate) fn is_consistent(&self) -> bool {
        let tags = self.tags();
        let len = tags.len();
        let mut offset = 0;
        let mut previous_free = false;
        while offset < len {
            if offset + TAG_SIZE * 2 > len {
                return false;
            }
            let lead = tags.get(offset);
            if lead == 0 {
                return false;
            }
            let trail_offset = offset + pair_distance(lead);
            if trail_offset + TAG_SIZE > len
                || tags.get(trail_offset) != lead
            {
                return false;
            }
            let free = lead > 0;
            if previous_free && free {
                return false;
            }
            previous_free = free;
            offset = trail_offset + TAG_SIZE;
        }
        offset == len
    }

    /// Sums the capacities of free or used blocks.
    fn sum_blocks(&self, free: bool) -> usize {
        let tags = self.tags();
        let len = tags.len();
        let mut total = 0;
        let mut offset = 0;
        while offset < len {
            let lead = tags.get(offset);
            let capacity = lead.unsigned_abs() as usize;
            if (lead > 0) == free {
                total += capacity;
            }
            offset += capacity + TAG_SIZE * 2;
        }
        total
    }

    /// Tag accessor over the backing buffer.
    fn tags(&self) -> Tags {
        unsafe {
            let bytes = (*self.buffer.get()).as_bytes_mut();
            Tags::new(bytes.as_mut_ptr(), bytes.len())
        }
    }
}

/// Pools of the same element type are always interchangeable: equality
/// reflects the allocator type's strategy, not the buffer instance, which
/// is the compatibility contract generic containers expect of a stateless
/// allocator.
impl<T, BufferT> PartialEq for Pool<T, BufferT>
where
    BufferT: Buffer,
{
    #[inline]
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T, BufferT> Eq for Pool<T, BufferT> where BufferT: Buffer {}

impl<T, BufferT> fmt::Debug for Pool<T, BufferT>
where
    BufferT: Buffer,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity())
            .field("used_bytes", &self.used_bytes())
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
