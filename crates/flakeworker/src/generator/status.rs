use crate::SnowflakeId;

/// The outcome of a non-blocking generation attempt.
///
/// Returned by `poll_id()`. [`Poll::Ready`] carries a fresh ID;
/// [`Poll::Pending`] means the attempt did not produce one and the caller
/// decides how to back off, instead of the generator spinning on its behalf.
///
/// # Example
///
/// ```
/// use flakeworker::{LockSnowflakeGenerator, Poll, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_000
///     }
/// }
///
/// let generator = LockSnowflakeGenerator::new(1, 2, 0, FixedTime).unwrap();
/// match generator.poll_id().unwrap() {
///     Poll::Ready { id } => assert_eq!(id.timestamp(), 1_000),
///     Poll::Pending { yield_for } => panic!("back off for {yield_for} ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID was generated and the generator state is unchanged.
    ///
    /// Either the 4096 sequence values of the current millisecond are used up
    /// (`yield_for` is `1`), or a lock-free generator lost a race to another
    /// thread (`yield_for` is `0`, retry immediately).
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}
