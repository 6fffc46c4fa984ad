/// The error returned when removing or peeking at an element of an empty
/// [`SegmentedDeque`](crate::SegmentedDeque).
///
/// A failed operation leaves the deque unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct EmptyQueue;

impl std::fmt::Display for EmptyQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no elements remaining in queue")
    }
}

impl std::error::Error for EmptyQueue {}
