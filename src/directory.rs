//! Directory of filed segments.
//!
//! Segments that are neither the active head nor the active tail but still
//! hold elements are filed here in queue order. The directory is itself a
//! circular segment whose slots are segments, so it shares the same cursor
//! arithmetic and grows by doubling, copying entries (never elements) into a
//! larger ring starting at offset 0.
//!
//! Filed segments are always full when they enter the directory. Their
//! `start` offset is kept by the segment itself, which is never mutated
//! while filed. The directory also keeps one drained segment per end so that
//! traffic bouncing across a segment boundary reuses memory instead of
//! reallocating it.

use allocator_api2::alloc::{Allocator, Global};

use crate::raw_segment::capacity_overflow;
use crate::segment::{Segment, SegmentIter};

/// Minimum number of entry slots once the directory allocates.
pub(crate) const MIN_DIRECTORY_CAPACITY: usize = 8;

pub(crate) struct Directory<T, A: Allocator + Clone = Global> {
    /// Filed segments, front of the queue first
    entries: Segment<Segment<T, A>, A>,
    /// Total elements in filed segments, maintained on file/promote
    cached_len: usize,
    /// Drained segment kept for the next head
    spare_front: Option<Segment<T, A>>,
    /// Drained segment kept for the next tail
    spare_back: Option<Segment<T, A>>,
}

impl<T, A: Allocator + Clone> Directory<T, A> {
    /// Creates an empty directory. Does not allocate.
    pub(crate) fn new_in(alloc: A) -> Self {
        Self {
            entries: Segment::with_capacity_in(0, alloc),
            cached_len: 0,
            spare_front: None,
            spare_back: None,
        }
    }

    /// Number of filed segments.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entry slots.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Total number of elements held by filed segments.
    #[inline]
    pub(crate) fn cached_len(&self) -> usize {
        self.cached_len
    }

    /// Number of segments owned by the directory, spares included.
    pub(crate) fn segment_count(&self) -> usize {
        self.entries.len()
            + usize::from(self.spare_front.is_some())
            + usize::from(self.spare_back.is_some())
    }

    /// Files a full segment behind every other entry.
    pub(crate) fn file_back(&mut self, segment: Segment<T, A>) {
        debug_assert!(segment.is_full());
        if self.entries.is_full() {
            self.grow();
        }
        self.cached_len += segment.len();
        self.entries.push_back(segment);
    }

    /// Files a full segment ahead of every other entry.
    pub(crate) fn file_front(&mut self, segment: Segment<T, A>) {
        debug_assert!(segment.is_full());
        if self.entries.is_full() {
            self.grow();
        }
        self.cached_len += segment.len();
        self.entries.push_front(segment);
    }

    /// Removes the frontmost filed segment.
    pub(crate) fn promote_front(&mut self) -> Option<Segment<T, A>> {
        let segment = self.entries.pop_front()?;
        self.cached_len -= segment.len();
        Some(segment)
    }

    /// Removes the backmost filed segment.
    pub(crate) fn promote_back(&mut self) -> Option<Segment<T, A>> {
        let segment = self.entries.pop_back()?;
        self.cached_len -= segment.len();
        Some(segment)
    }

    /// Keeps a drained segment for the next head, replacing any previous spare.
    pub(crate) fn retire_front(&mut self, mut segment: Segment<T, A>) {
        segment.reset();
        self.spare_front = Some(segment);
    }

    /// Keeps a drained segment for the next tail, replacing any previous spare.
    pub(crate) fn retire_back(&mut self, mut segment: Segment<T, A>) {
        segment.reset();
        self.spare_back = Some(segment);
    }

    #[inline]
    pub(crate) fn recycle_front(&mut self) -> Option<Segment<T, A>> {
        self.spare_front.take()
    }

    #[inline]
    pub(crate) fn recycle_back(&mut self) -> Option<Segment<T, A>> {
        self.spare_back.take()
    }

    /// Filed segments in queue order.
    pub(crate) fn iter(&self) -> SegmentIter<'_, Segment<T, A>> {
        self.entries.iter()
    }

    /// Drops every filed segment. Spares are kept.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.cached_len = 0;
    }

    /// Frees the spares and any entry slots beyond what is in use.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.spare_front = None;
        self.spare_back = None;
        if self.capacity() > self.len() {
            self.reallocate(self.len());
        }
    }

    #[cold]
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .unwrap_or_else(|| capacity_overflow())
            .max(MIN_DIRECTORY_CAPACITY);
        trace_event!(
            old_capacity,
            new_capacity,
            filed = self.len(),
            "growing segment directory"
        );
        self.reallocate(new_capacity);
    }

    /// Moves every entry, in queue order, into a ring of `capacity` slots.
    fn reallocate(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len());
        let alloc = self.entries.allocator().clone();
        let mut moved = Segment::with_capacity_in(capacity, alloc);
        while let Some(segment) = self.entries.pop_front() {
            moved.push_back(segment);
        }
        self.entries = moved;
    }
}
