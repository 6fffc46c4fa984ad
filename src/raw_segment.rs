//! Raw buffer allocation for deque segments.
//!
//! This module handles the memory of a single fixed-capacity segment,
//! similar to how `RawVec` works for `Vec` in the standard library.
//! It knows nothing about which slots are initialized.

use std::alloc::{handle_alloc_error, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

use allocator_api2::alloc::{Allocator, Global};

/// Fixed-capacity buffer that owns an allocation but not its elements.
///
/// Zero-sized element types and zero capacities never touch the allocator;
/// the pointer is dangling and `capacity` is reported as requested so the
/// circular index math stays uniform.
pub(crate) struct RawSegment<T, A: Allocator = Global> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator> RawSegment<T, A> {
    /// Smallest capacity handed out for a grown segment.
    /// Avoids tiny allocations that heap allocators round up anyway.
    /// - 8 for 1-byte elements
    /// - 4 for moderate elements (<= 1 KiB)
    /// - 1 for large elements and ZSTs
    pub(crate) const MIN_SEGMENT_CAP: usize = {
        let size = std::mem::size_of::<T>();
        if size == 0 {
            1
        } else if size == 1 {
            8
        } else if size <= 1024 {
            4
        } else {
            1
        }
    };

    const IS_ZST: bool = std::mem::size_of::<T>() == 0;

    /// Allocates room for exactly `cap` elements in `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if the byte size overflows `isize`. Aborts through
    /// [`handle_alloc_error`] if the allocator fails.
    pub(crate) fn with_capacity_in(cap: usize, alloc: A) -> Self {
        if Self::IS_ZST || cap == 0 {
            return Self {
                ptr: NonNull::dangling(),
                cap,
                alloc,
                _marker: PhantomData,
            };
        }

        let layout = match Layout::array::<T>(cap) {
            Ok(layout) => layout,
            Err(_) => capacity_overflow(),
        };
        let ptr = match alloc.allocate(layout) {
            Ok(ptr) => ptr.cast::<T>(),
            Err(_) => handle_alloc_error(layout),
        };

        Self {
            ptr,
            cap,
            alloc,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns a raw pointer to the slot at `index`.
    ///
    /// # Safety
    ///
    /// `index` must be less than `capacity`, or zero.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index < self.cap || index == 0);
        self.ptr.as_ptr().add(index)
    }
}

impl<T, A: Allocator> Drop for RawSegment<T, A> {
    fn drop(&mut self) {
        // Only frees memory. `Segment` drops live elements first.
        if Self::IS_ZST || self.cap == 0 {
            return;
        }
        // Safety: the same layout was validated by `Layout::array` on allocation.
        unsafe {
            let layout = Layout::from_size_align_unchecked(
                std::mem::size_of::<T>() * self.cap,
                std::mem::align_of::<T>(),
            );
            self.alloc.deallocate(self.ptr.cast(), layout);
        }
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("segment capacity overflow");
}

// Safety: RawSegment owns its allocation; T and A determine thread safety
unsafe impl<T: Send, A: Allocator + Send> Send for RawSegment<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawSegment<T, A> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_segment_cap() {
        assert_eq!(RawSegment::<u8>::MIN_SEGMENT_CAP, 8);
        assert_eq!(RawSegment::<i32>::MIN_SEGMENT_CAP, 4);
        assert_eq!(RawSegment::<[u8; 4096]>::MIN_SEGMENT_CAP, 1);
        assert_eq!(RawSegment::<()>::MIN_SEGMENT_CAP, 1);
    }

    #[test]
    fn test_allocate_and_write() {
        let raw: RawSegment<u64> = RawSegment::with_capacity_in(8, Global);
        assert_eq!(raw.capacity(), 8);
        unsafe {
            for i in 0..8 {
                raw.slot(i).write(i as u64 * 3);
            }
            for i in 0..8 {
                assert_eq!(raw.slot(i).read(), i as u64 * 3);
            }
        }
    }

    #[test]
    fn test_zero_capacity() {
        let raw: RawSegment<String> = RawSegment::with_capacity_in(0, Global);
        assert_eq!(raw.capacity(), 0);
    }

    #[test]
    fn test_zst_reports_requested_capacity() {
        let raw: RawSegment<()> = RawSegment::with_capacity_in(1_000_000, Global);
        assert_eq!(raw.capacity(), 1_000_000);
    }
}
