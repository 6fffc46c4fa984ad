//! Owning iterator for `SegmentedDeque`.

use allocator_api2::alloc::{Allocator, Global};

use crate::SegmentedDeque;

/// An owning iterator over the elements of a `SegmentedDeque`.
///
/// This struct is created by the `into_iter` method on `SegmentedDeque`
/// (provided by the [`IntoIterator`] trait). Elements are removed from the
/// front by `next` and from the back by `next_back`.
pub struct IntoIter<T, A: Allocator + Clone = Global> {
    pub(crate) deque: SegmentedDeque<T, A>,
}

impl<T, A: Allocator + Clone> IntoIter<T, A> {
    /// Creates a new owning iterator from a `SegmentedDeque`.
    #[inline]
    pub fn new(deque: SegmentedDeque<T, A>) -> Self {
        Self { deque }
    }

    /// Returns the elements not yet yielded as a deque.
    pub fn into_inner(self) -> SegmentedDeque<T, A> {
        self.deque
    }
}

impl<T, A: Allocator + Clone> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.deque.len();
        (remaining, Some(remaining))
    }

    #[inline]
    fn count(self) -> usize {
        self.deque.len()
    }
}

impl<T, A: Allocator + Clone> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back().ok()
    }
}

impl<T, A: Allocator + Clone> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator + Clone> std::iter::FusedIterator for IntoIter<T, A> {}

impl<T: Clone, A: Allocator + Clone> Clone for IntoIter<T, A> {
    fn clone(&self) -> Self {
        Self {
            deque: self.deque.clone(),
        }
    }
}

impl<T: std::fmt::Debug, A: Allocator + Clone> std::fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.deque).finish()
    }
}
