//! Fixed-capacity circular segment.
//!
//! A segment stores a contiguous run of queue elements in a ring of
//! `capacity` slots. It tracks the index of its oldest element and an
//! explicit live count, so a full segment and an empty one are never
//! confused even though their cursors coincide.

use std::iter::Chain;
use std::slice;

use allocator_api2::alloc::{Allocator, Global};

use crate::raw_segment::RawSegment;

/// Borrowing iterator over one segment, oldest element first.
pub(crate) type SegmentIter<'a, T> = Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>;

/// Returns an iterator that yields nothing.
pub(crate) fn empty_iter<'a, T>() -> SegmentIter<'a, T> {
    let empty: &[T] = &[];
    empty.iter().chain(empty.iter())
}

pub(crate) struct Segment<T, A: Allocator = Global> {
    buf: RawSegment<T, A>,
    /// Index of the oldest live element
    front: usize,
    /// Number of live elements
    len: usize,
}

impl<T, A: Allocator> Segment<T, A> {
    pub(crate) fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self {
            buf: RawSegment::with_capacity_in(capacity, alloc),
            front: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) const fn is_full(&self) -> bool {
        self.len == self.buf.capacity()
    }

    /// Offset of the first live element within the ring.
    #[cfg(test)]
    #[inline]
    pub(crate) const fn start(&self) -> usize {
        self.front
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    #[inline]
    fn wrap_add(&self, index: usize, n: usize) -> usize {
        let room = self.capacity() - index;
        if n >= room {
            n - room
        } else {
            index + n
        }
    }

    #[inline]
    fn wrap_sub(&self, index: usize, n: usize) -> usize {
        if index >= n {
            index - n
        } else {
            self.capacity() - (n - index)
        }
    }

    /// Index one past the newest live element.
    #[inline]
    fn back_index(&self) -> usize {
        if self.capacity() == 0 {
            0
        } else {
            self.wrap_add(self.front, self.len)
        }
    }

    /// Appends an element after the newest one.
    ///
    /// # Panics
    ///
    /// Panics if the segment is full.
    #[inline]
    pub(crate) fn push_back(&mut self, value: T) {
        assert!(!self.is_full(), "push_back on a full segment");
        let index = self.back_index();
        // Safety: index < capacity and the slot is vacant because len < capacity
        unsafe { self.buf.slot(index).write(value) };
        self.len += 1;
    }

    /// Prepends an element before the oldest one.
    ///
    /// # Panics
    ///
    /// Panics if the segment is full.
    #[inline]
    pub(crate) fn push_front(&mut self, value: T) {
        assert!(!self.is_full(), "push_front on a full segment");
        self.front = self.wrap_sub(self.front, 1);
        // Safety: the slot just before the old front is vacant because len < capacity
        unsafe { self.buf.slot(self.front).write(value) };
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        // Safety: front holds the oldest initialized element
        let value = unsafe { self.buf.slot(self.front).read() };
        self.front = self.wrap_add(self.front, 1);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let index = self.wrap_add(self.front, self.len);
        // Safety: index held the newest initialized element, now vacated
        Some(unsafe { self.buf.slot(index).read() })
    }

    #[inline]
    pub(crate) fn front(&self) -> Option<&T> {
        self.get(0)
    }

    #[inline]
    pub(crate) fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    #[inline]
    pub(crate) fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    #[inline]
    pub(crate) fn back_mut(&mut self) -> Option<&mut T> {
        match self.len.checked_sub(1) {
            Some(last) => self.get_mut(last),
            None => None,
        }
    }

    /// Returns the element `index` positions after the oldest one.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            let slot = self.wrap_add(self.front, index);
            Some(unsafe { &*self.buf.slot(slot) })
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let slot = self.wrap_add(self.front, index);
            Some(unsafe { &mut *self.buf.slot(slot) })
        } else {
            None
        }
    }

    /// Returns the live elements as two slices in logical order.
    ///
    /// The second slice is empty unless the live run wraps around the end
    /// of the buffer.
    pub(crate) fn as_slices(&self) -> (&[T], &[T]) {
        let first_len = self.len.min(self.capacity() - self.front);
        // Safety: both runs lie within the buffer and hold initialized elements
        unsafe {
            (
                slice::from_raw_parts(self.buf.slot(self.front), first_len),
                slice::from_raw_parts(self.buf.slot(0), self.len - first_len),
            )
        }
    }

    fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let first_len = self.len.min(self.capacity() - self.front);
        // Safety: the two runs are disjoint, within the buffer and initialized
        unsafe {
            (
                slice::from_raw_parts_mut(self.buf.slot(self.front), first_len),
                slice::from_raw_parts_mut(self.buf.slot(0), self.len - first_len),
            )
        }
    }

    pub(crate) fn iter(&self) -> SegmentIter<'_, T> {
        let (first, second) = self.as_slices();
        first.iter().chain(second.iter())
    }

    /// Drops every live element and rewinds the cursors.
    pub(crate) fn clear(&mut self) {
        let (first, second) = self.as_mut_slices();
        let first: *mut [T] = first;
        let second: *mut [T] = second;

        // Reset BEFORE dropping to prevent double-free if drop panics
        self.front = 0;
        self.len = 0;

        if std::mem::needs_drop::<T>() {
            unsafe {
                std::ptr::drop_in_place(first);
                std::ptr::drop_in_place(second);
            }
        }
    }

    /// Rewinds the cursors of an empty segment so it can be reused.
    pub(crate) fn reset(&mut self) {
        debug_assert!(self.is_empty());
        self.front = 0;
    }
}

impl<T, A: Allocator> Drop for Segment<T, A> {
    fn drop(&mut self) {
        self.clear();
        // RawSegment will be dropped automatically and free the memory
    }
}
