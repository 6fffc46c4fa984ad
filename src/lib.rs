//! A double-ended queue built from circular array segments.
//!
//! Unlike a linked list, elements live in contiguous fixed-capacity segments.
//! Unlike `VecDeque`, growing never moves existing elements: when the active
//! segment at one end fills up it is filed into a directory and a new segment
//! of double the size (up to a cap) takes its place. When an active segment
//! drains, the next filed segment is promoted. All end operations are
//! amortized O(1), and so is `len`.
//!
//! # Example
//!
//! ```
//! use segmented_deque::{EmptyQueue, SegmentedDeque};
//!
//! let mut deque: SegmentedDeque<i32> = SegmentedDeque::new();
//! deque.push_back(1);
//! deque.push_back(2);
//! deque.push_front(0);
//! assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
//!
//! assert_eq!(deque.pop_front(), Ok(0));
//! assert_eq!(deque.pop_back(), Ok(2));
//! assert_eq!(deque.len(), 1);
//!
//! assert_eq!(deque.pop_back(), Ok(1));
//! assert_eq!(deque.pop_back(), Err(EmptyQueue));
//! assert_eq!(deque.peek_front(), Err(EmptyQueue));
//! ```
//!
//! # Memory Layout
//!
//! The deque owns a head segment, an optional tail segment, and a directory
//! of full segments in between:
//!
//! ```text
//!  head          directory (filed, full)          tail
//! [.. 3 4]  ->  [5 6 7 8] [9 10 11 12 13 14 15 16]  ->  [17 18 ..]
//! ```
//!
//! Segment capacities start at [`SegmentConfig::initial_capacity`] and double
//! up to [`SegmentConfig::max_segment_capacity`]. One drained segment per end
//! is kept for reuse.

/// Emits a `tracing` event when the `tracing` feature is enabled.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "segmented_deque", $($arg)*);
    };
}

mod config;
mod directory;
mod error;
mod into_iter;
mod iter;
mod raw_segment;
mod segment;

pub use config::SegmentConfig;
pub use error::EmptyQueue;
pub use into_iter::IntoIter;
pub use iter::Iter;

use allocator_api2::alloc::{Allocator, Global};
use std::cmp::Ordering;

use directory::Directory;
use raw_segment::RawSegment;
use segment::Segment;

/// A double-ended queue stored in circular segments.
///
/// Front operations act on the head segment and back operations on the tail
/// segment, or on the head when only one segment is in play. Segments in
/// between are filed in a directory and never touched until promoted.
///
/// The deque keeps these invariants after every operation:
/// - an empty head means the whole deque is empty;
/// - a present tail is never empty;
/// - filed segments exist only while a tail exists.
pub struct SegmentedDeque<T, A: Allocator + Clone = Global> {
    /// Segment receiving front operations, allocated on first insertion
    head: Option<Segment<T, A>>,
    /// Segment receiving back operations when more than one segment is active
    tail: Option<Segment<T, A>>,
    /// Full segments between head and tail, plus spares
    directory: Directory<T, A>,
    config: SegmentConfig,
    alloc: A,
}

impl<T> SegmentedDeque<T> {
    /// Creates an empty deque with the default [`SegmentConfig`].
    ///
    /// Does not allocate until elements are pushed.
    ///
    /// # Example
    ///
    /// ```
    /// use segmented_deque::SegmentedDeque;
    /// let deque: SegmentedDeque<i32> = SegmentedDeque::new();
    /// assert!(deque.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_config_in(SegmentConfig::new(), Global)
    }

    /// Creates an empty deque whose first segment holds `capacity` elements.
    ///
    /// # Example
    ///
    /// ```
    /// use segmented_deque::SegmentedDeque;
    /// let deque: SegmentedDeque<i32> = SegmentedDeque::with_capacity(100);
    /// assert_eq!(deque.config().initial_capacity(), 100);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(SegmentConfig::new().with_initial_capacity(capacity))
    }

    /// Creates an empty deque with explicit segment sizing.
    #[inline]
    pub fn with_config(config: SegmentConfig) -> Self {
        Self::with_config_in(config, Global)
    }
}

impl<T, A: Allocator + Clone> SegmentedDeque<T, A> {
    /// Creates an empty deque that allocates its segments in `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self::with_config_in(SegmentConfig::new(), alloc)
    }

    /// Creates an empty deque with explicit segment sizing that allocates
    /// its segments in `alloc`.
    pub fn with_config_in(config: SegmentConfig, alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            directory: Directory::new_in(alloc.clone()),
            config,
            alloc,
        }
    }

    /// Returns the segment sizing this deque was built with.
    #[inline]
    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of elements in the deque.
    ///
    /// Filed segments are counted when they are filed, so this never walks
    /// the directory.
    #[inline]
    pub fn len(&self) -> usize {
        self.directory.cached_len()
            + self.head.as_ref().map_or(0, Segment::len)
            + self.tail.as_ref().map_or(0, Segment::len)
    }

    /// Returns `true` if the deque contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.as_ref().map_or(true, Segment::is_empty)
    }

    /// Returns the number of segments currently allocated, including the
    /// spares kept for reuse.
    pub fn segment_count(&self) -> usize {
        usize::from(self.head.is_some())
            + usize::from(self.tail.is_some())
            + self.directory.segment_count()
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Example
    ///
    /// ```
    /// use segmented_deque::SegmentedDeque;
    /// let mut deque: SegmentedDeque<i32> = SegmentedDeque::new();
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// assert_eq!(deque.peek_back(), Ok(&2));
    /// ```
    #[inline]
    pub fn push_back(&mut self, value: T) {
        // Fast path: the back segment has room
        match self.tail.as_mut() {
            Some(tail) => {
                if !tail.is_full() {
                    tail.push_back(value);
                    return;
                }
            }
            None => {
                let head = self.head_or_allocate();
                if !head.is_full() {
                    head.push_back(value);
                    return;
                }
            }
        }

        self.push_back_slow(value);
    }

    #[cold]
    #[inline(never)]
    fn push_back_slow(&mut self, value: T) {
        let mut segment = self.back_segment();
        segment.push_back(value);
        // A full tail is filed; a full head stays where it is.
        if let Some(full) = self.tail.replace(segment) {
            self.directory.file_back(full);
        }
    }

    /// Prepends an element to the front of the deque.
    ///
    /// # Example
    ///
    /// ```
    /// use segmented_deque::SegmentedDeque;
    /// let mut deque: SegmentedDeque<i32> = SegmentedDeque::new();
    /// deque.push_back(1);
    /// deque.push_front(0);
    /// assert_eq!(deque.peek_front(), Ok(&0));
    /// ```
    #[inline]
    pub fn push_front(&mut self, value: T) {
        let head = self.head_or_allocate();
        if !head.is_full() {
            head.push_front(value);
            return;
        }

        self.push_front_slow(value);
    }

    #[cold]
    #[inline(never)]
    fn push_front_slow(&mut self, value: T) {
        let mut segment = self.front_segment();
        segment.push_front(value);
        if let Some(full) = self.head.replace(segment) {
            if self.tail.is_none() {
                self.tail = Some(full);
            } else {
                self.directory.file_front(full);
            }
        }
    }

    /// Removes the first element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueue`] if the deque is empty; the deque is unchanged.
    #[inline]
    pub fn pop_front(&mut self) -> Result<T, EmptyQueue> {
        let head = self.head.as_mut().ok_or(EmptyQueue)?;
        let value = head.pop_front().ok_or(EmptyQueue)?;
        if head.is_empty() {
            self.refill_head();
        }
        Ok(value)
    }

    /// Removes the last element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueue`] if the deque is empty; the deque is unchanged.
    #[inline]
    pub fn pop_back(&mut self) -> Result<T, EmptyQueue> {
        if let Some(tail) = self.tail.as_mut() {
            let value = tail.pop_back().ok_or(EmptyQueue)?;
            if tail.is_empty() {
                self.refill_tail();
            }
            return Ok(value);
        }

        let head = self.head.as_mut().ok_or(EmptyQueue)?;
        head.pop_back().ok_or(EmptyQueue)
    }

    /// Returns a reference to the first element without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueue`] if the deque is empty.
    #[inline]
    pub fn peek_front(&self) -> Result<&T, EmptyQueue> {
        self.head
            .as_ref()
            .and_then(Segment::front)
            .ok_or(EmptyQueue)
    }

    /// Returns a reference to the last element without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueue`] if the deque is empty.
    #[inline]
    pub fn peek_back(&self) -> Result<&T, EmptyQueue> {
        self.tail
            .as_ref()
            .or(self.head.as_ref())
            .and_then(Segment::back)
            .ok_or(EmptyQueue)
    }

    /// Returns a mutable reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueue`] if the deque is empty.
    #[inline]
    pub fn peek_front_mut(&mut self) -> Result<&mut T, EmptyQueue> {
        self.head
            .as_mut()
            .and_then(Segment::front_mut)
            .ok_or(EmptyQueue)
    }

    /// Returns a mutable reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueue`] if the deque is empty.
    #[inline]
    pub fn peek_back_mut(&mut self) -> Result<&mut T, EmptyQueue> {
        self.tail
            .as_mut()
            .or(self.head.as_mut())
            .and_then(Segment::back_mut)
            .ok_or(EmptyQueue)
    }

    /// Returns a front-to-back iterator over the elements.
    ///
    /// # Example
    ///
    /// ```
    /// use segmented_deque::SegmentedDeque;
    /// let deque: SegmentedDeque<i32> = (0..5).collect();
    /// let doubled: Vec<i32> = deque.iter().map(|x| x * 2).collect();
    /// assert_eq!(doubled, vec![0, 2, 4, 6, 8]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(self)
    }

    /// Copies the elements, front to back, into a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.iter().cloned());
        out
    }

    /// Returns `true` if the deque contains an element equal to `x`.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|e| e == x)
    }

    /// Removes all elements.
    ///
    /// The head segment and the spares are kept for reuse.
    pub fn clear(&mut self) {
        self.tail = None;
        self.directory.clear();
        if let Some(head) = self.head.as_mut() {
            head.clear();
        }
    }

    /// Frees the spare segments and unused directory slots.
    pub fn shrink_to_fit(&mut self) {
        self.directory.shrink_to_fit();
    }

    fn head_or_allocate(&mut self) -> &mut Segment<T, A> {
        let capacity = self.config.initial_capacity();
        let alloc = &self.alloc;
        self.head.get_or_insert_with(|| {
            trace_event!(capacity, "allocated head segment");
            Segment::with_capacity_in(capacity, alloc.clone())
        })
    }

    /// Takes the front spare, or allocates a grown segment.
    fn front_segment(&mut self) -> Segment<T, A> {
        match self.directory.recycle_front() {
            Some(segment) => {
                trace_event!(capacity = segment.capacity(), "recycled front segment");
                segment
            }
            None => self.allocate_segment(),
        }
    }

    /// Takes the back spare, or allocates a grown segment.
    fn back_segment(&mut self) -> Segment<T, A> {
        match self.directory.recycle_back() {
            Some(segment) => {
                trace_event!(capacity = segment.capacity(), "recycled back segment");
                segment
            }
            None => self.allocate_segment(),
        }
    }

    fn allocate_segment(&self) -> Segment<T, A> {
        let largest = self
            .head
            .as_ref()
            .map_or(0, Segment::capacity)
            .max(self.tail.as_ref().map_or(0, Segment::capacity));
        let capacity = self
            .config
            .grown_capacity(largest, RawSegment::<T, A>::MIN_SEGMENT_CAP);
        trace_event!(capacity, filed = self.directory.len(), "allocated segment");
        Segment::with_capacity_in(capacity, self.alloc.clone())
    }

    /// Replaces a drained head with the next filed segment, or with the
    /// tail when nothing is filed.
    fn refill_head(&mut self) {
        let next = match self.directory.promote_front() {
            Some(segment) => segment,
            None => match self.tail.take() {
                Some(tail) => tail,
                None => return,
            },
        };
        if let Some(drained) = self.head.replace(next) {
            self.directory.retire_front(drained);
        }
    }

    /// Replaces a drained tail with the last filed segment, or drops the
    /// tail role when nothing is filed.
    fn refill_tail(&mut self) {
        let next = self.directory.promote_back();
        if let Some(drained) = std::mem::replace(&mut self.tail, next) {
            self.directory.retire_back(drained);
        }
    }

    /// Asserts the structural invariants.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let head_empty = self.head.as_ref().map_or(true, Segment::is_empty);
        if head_empty {
            assert!(self.tail.is_none(), "empty head with a tail");
            assert!(self.directory.is_empty(), "empty head with filed segments");
        }
        if let Some(tail) = &self.tail {
            assert!(!tail.is_empty(), "empty tail");
        }
        if !self.directory.is_empty() {
            assert!(self.tail.is_some(), "filed segments without a tail");
        }
        let filed: usize = self.directory.iter().map(Segment::len).sum();
        assert_eq!(filed, self.directory.cached_len(), "cached length drifted");
        assert_eq!(self.iter().fold(0, |n, _| n + 1), self.len(), "iteration length drifted");
    }
}

// Trait implementations
impl<T: Clone, A: Allocator + Clone> Clone for SegmentedDeque<T, A> {
    fn clone(&self) -> Self {
        let mut deque = Self::with_config_in(self.config, self.alloc.clone());
        deque.extend(self.iter().cloned());
        deque
    }
}

impl<T: PartialEq, A: Allocator + Clone> PartialEq for SegmentedDeque<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator + Clone> Eq for SegmentedDeque<T, A> {}

impl<T: PartialOrd, A: Allocator + Clone> PartialOrd for SegmentedDeque<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, A: Allocator + Clone> Ord for SegmentedDeque<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: std::hash::Hash, A: Allocator + Clone> std::hash::Hash for SegmentedDeque<T, A> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: std::fmt::Debug, A: Allocator + Clone> std::fmt::Debug for SegmentedDeque<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders the elements front to back as `[a b c]`.
impl<T: std::fmt::Display, A: Allocator + Clone> std::fmt::Display for SegmentedDeque<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            std::fmt::Display::fmt(item, f)?;
        }
        f.write_str("]")
    }
}

impl<T> Default for SegmentedDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator + Clone> Extend<T> for SegmentedDeque<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Clone + 'a, A: Allocator + Clone> Extend<&'a T> for SegmentedDeque<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item.clone());
        }
    }
}

impl<T> FromIterator<T> for SegmentedDeque<T> {
    /// Enqueues the elements in iteration order, sizing the first segment
    /// from the iterator's lower size bound.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut deque = Self::with_capacity(lower.max(SegmentConfig::DEFAULT_INITIAL_CAPACITY));
        deque.extend(iter);
        deque
    }
}

impl<T> From<Vec<T>> for SegmentedDeque<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for SegmentedDeque<T> {
    fn from(array: [T; N]) -> Self {
        array.into_iter().collect()
    }
}

impl<T, A: Allocator + Clone> IntoIterator for SegmentedDeque<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator + Clone> IntoIterator for &'a SegmentedDeque<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
