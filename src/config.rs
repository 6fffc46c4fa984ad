//! Segment sizing configuration.

/// Sizing parameters for the segments of a [`SegmentedDeque`].
///
/// Segments start at `initial_capacity` slots and each newly allocated
/// segment doubles the larger of the current head and tail capacities, up to
/// `max_segment_capacity`. Values are clamped rather than rejected: both are
/// at least 1. The maximum bounds grown segments only, so an oversized first
/// segment never lifts it.
///
/// # Example
///
/// ```
/// use segmented_deque::{SegmentConfig, SegmentedDeque};
///
/// let config = SegmentConfig::new()
///     .with_initial_capacity(64)
///     .with_max_segment_capacity(4096);
/// let mut deque: SegmentedDeque<u32> = SegmentedDeque::with_config(config);
/// deque.push_back(1);
/// assert_eq!(deque.config().initial_capacity(), 64);
/// ```
///
/// [`SegmentedDeque`]: crate::SegmentedDeque
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct SegmentConfig {
    initial_capacity: usize,
    max_segment_capacity: usize,
}

impl SegmentConfig {
    /// Capacity of the first segment unless configured otherwise.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Upper bound on a single segment's capacity unless configured otherwise.
    pub const DEFAULT_MAX_SEGMENT_CAPACITY: usize = 1 << 16;

    /// Creates the default configuration.
    #[inline]
    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_segment_capacity: Self::DEFAULT_MAX_SEGMENT_CAPACITY,
        }
    }

    /// Sets the capacity of the first segment.
    #[inline]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the upper bound on geometric segment growth.
    #[inline]
    pub const fn with_max_segment_capacity(mut self, capacity: usize) -> Self {
        self.max_segment_capacity = capacity;
        self
    }

    /// Effective capacity of the first segment.
    #[inline]
    pub const fn initial_capacity(&self) -> usize {
        if self.initial_capacity == 0 {
            1
        } else {
            self.initial_capacity
        }
    }

    /// Effective upper bound on the capacity of a grown segment.
    #[inline]
    pub const fn max_segment_capacity(&self) -> usize {
        if self.max_segment_capacity == 0 {
            1
        } else {
            self.max_segment_capacity
        }
    }

    /// Capacity for a new segment when the largest active one has `largest`
    /// slots: double it, stay within the maximum, and never go below `floor`.
    #[inline]
    pub(crate) fn grown_capacity(&self, largest: usize, floor: usize) -> usize {
        largest
            .saturating_mul(2)
            .min(self.max_segment_capacity())
            .max(floor)
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self::new()
    }
}
