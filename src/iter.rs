//! Borrowing iterator for `SegmentedDeque`.

use allocator_api2::alloc::{Allocator, Global};

use crate::segment::{self, Segment, SegmentIter};
use crate::SegmentedDeque;

/// An iterator over references to the elements of a `SegmentedDeque`,
/// front to back.
///
/// Walks the head segment, then every filed segment from its start offset,
/// then the tail segment. Created by [`SegmentedDeque::iter`].
pub struct Iter<'a, T, A: Allocator + Clone = Global> {
    /// Segment currently being walked
    current: SegmentIter<'a, T>,
    /// Filed segments not yet walked
    filed: SegmentIter<'a, Segment<T, A>>,
    /// Tail segment, walked last
    tail: Option<&'a Segment<T, A>>,
    /// Elements left to yield
    remaining: usize,
}

impl<'a, T, A: Allocator + Clone> Iter<'a, T, A> {
    pub(crate) fn new(deque: &'a SegmentedDeque<T, A>) -> Self {
        Self {
            current: deque
                .head
                .as_ref()
                .map_or_else(segment::empty_iter, |head| head.iter()),
            filed: deque.directory.iter(),
            tail: deque.tail.as_ref(),
            remaining: deque.len(),
        }
    }

    #[cold]
    fn next_segment(&mut self) -> Option<&'a T> {
        loop {
            if let Some(segment) = self.filed.next() {
                self.current = segment.iter();
            } else if let Some(tail) = self.tail.take() {
                self.current = tail.iter();
            } else {
                return None;
            }

            if let Some(value) = self.current.next() {
                self.remaining -= 1;
                return Some(value);
            }
        }
    }
}

impl<'a, T, A: Allocator + Clone> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.current.next() {
            self.remaining -= 1;
            return Some(value);
        }
        self.next_segment()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    #[inline]
    fn count(self) -> usize {
        self.remaining
    }
}

impl<T, A: Allocator + Clone> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: Allocator + Clone> std::iter::FusedIterator for Iter<'_, T, A> {}

impl<T, A: Allocator + Clone> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
            filed: self.filed.clone(),
            tail: self.tail,
            remaining: self.remaining,
        }
    }
}

impl<T: std::fmt::Debug, A: Allocator + Clone> std::fmt::Debug for Iter<'_, T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{SegmentConfig, SegmentedDeque};

    fn small() -> SegmentedDeque<i32> {
        SegmentedDeque::with_config(
            SegmentConfig::new()
                .with_initial_capacity(4)
                .with_max_segment_capacity(4),
        )
    }

    #[test]
    fn test_empty() {
        let deque: SegmentedDeque<i32> = SegmentedDeque::new();
        let mut iter = deque.iter();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_walks_head_directory_tail() {
        let mut deque = small();
        for i in 0..10 {
            deque.push_back(i);
        }
        for i in 1..=10 {
            deque.push_front(-i);
        }
        assert!(!deque.directory.is_empty());

        let collected: Vec<i32> = deque.iter().copied().collect();
        let expected: Vec<i32> = (-10..10).collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_exact_size() {
        let mut deque = small();
        deque.extend(0..23);
        let mut iter = deque.iter();
        assert_eq!(iter.len(), 23);
        iter.next();
        iter.next();
        assert_eq!(iter.size_hint(), (21, Some(21)));
        assert_eq!(iter.count(), 21);
    }

    #[test]
    fn test_clone_resumes_independently() {
        let mut deque = small();
        deque.extend(0..9);
        let mut iter = deque.iter();
        iter.next();
        let copy = iter.clone();
        assert_eq!(iter.copied().collect::<Vec<_>>(), (1..9).collect::<Vec<_>>());
        assert_eq!(copy.copied().collect::<Vec<_>>(), (1..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_debug() {
        let deque: SegmentedDeque<i32> = [1, 2, 3].into();
        assert_eq!(format!("{:?}", deque.iter()), "[1, 2, 3]");
    }
}
