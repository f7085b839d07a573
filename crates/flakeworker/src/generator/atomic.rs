use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ConfigError, Node, Poll, Result, SnowflakeGenerator, SnowflakeId, SystemClock, TimeSource,
    generator::tick::{self, Step},
};

/// State word meaning "no ID issued yet". Sets the reserved top bit, which no
/// valid [`SnowflakeId`] has.
const UNSET: u64 = u64::MAX;

/// A lock-free Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is the whole generator state, and it fits in one
/// [`AtomicU64`]. Each attempt loads it, reads the clock, computes the
/// successor and publishes it with a compare-and-swap; a failed swap means
/// another thread issued an ID in between, and the attempt starts over from
/// the fresh state. Every issued ID is therefore the unique successor of the
/// previous one.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Throughput matters more than fair access across threads
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct AtomicSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    node: Node,
    time: T,
}

impl AtomicSnowflakeGenerator<SystemClock> {
    /// Creates a generator backed by the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `datacenter_id` or `worker_id` is larger
    /// than 31.
    pub fn with_system_clock(
        datacenter_id: u64,
        worker_id: u64,
        epoch: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(datacenter_id, worker_id, epoch, SystemClock)
    }
}

impl<T> AtomicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`AtomicSnowflakeGenerator`] for the given node identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either ID is larger than 31.
    ///
    /// # Example
    /// ```
    /// use flakeworker::{AtomicSnowflakeGenerator, SystemClock, DISCORD_EPOCH};
    ///
    /// let generator = AtomicSnowflakeGenerator::new(3, 7, DISCORD_EPOCH, SystemClock).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.worker_id(), 7);
    /// ```
    pub fn new(datacenter_id: u64, worker_id: u64, epoch: u64, time: T) -> Result<Self, ConfigError> {
        Ok(Self::from_node(Node::new(datacenter_id, worker_id, epoch)?, time))
    }

    /// Creates a generator for an already validated [`Node`].
    pub fn from_node(node: Node, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(UNSET)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(UNSET),
            node,
            time,
        }
    }

    /// The identity encoded into every ID.
    pub const fn node(&self) -> Node {
        self.node
    }

    /// The 5-bit datacenter ID.
    pub const fn datacenter_id(&self) -> u64 {
        self.node.datacenter_id()
    }

    /// The 5-bit worker ID.
    pub const fn worker_id(&self) -> u64 {
        self.node.worker_id()
    }

    /// The epoch in Unix milliseconds.
    pub const fn epoch(&self) -> u64 {
        self.node.epoch()
    }

    /// Generates the next ID.
    ///
    /// Retries internally when another thread wins the swap. When the current
    /// millisecond is exhausted this **blocks**, spinning on the clock until
    /// it moves on; the wait has no timeout and cannot be cancelled.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRollback`] if the clock reads earlier than the last
    ///   timestamp used.
    /// - [`Error::TimestampOverflow`] once the epoch offset outgrows 41 bits.
    ///
    /// [`Error::ClockRollback`]: crate::Error::ClockRollback
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        loop {
            let current = self.state.load(Ordering::Acquire);
            let now = self.time.current_millis();

            let next = match tick::advance(&self.node, now, decode(current))? {
                Step::Ready(id) => id,
                Step::Exhausted(last) => {
                    // Other threads may roll the state over while we wait;
                    // re-run against whatever is current afterwards.
                    tick::wait_past(&self.node, &self.time, last)?;
                    continue;
                }
            };

            if self.publish(current, next) {
                return Ok(next);
            }
            core::hint::spin_loop();
        }
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Returns [`Poll::Pending`] with `yield_for: 1` when the millisecond is
    /// exhausted, or `yield_for: 0` when another thread won the swap.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<Poll> {
        let current = self.state.load(Ordering::Acquire);
        let now = self.time.current_millis();

        match tick::advance(&self.node, now, decode(current))? {
            Step::Ready(id) if self.publish(current, id) => Ok(Poll::Ready { id }),
            Step::Ready(_) => Ok(Poll::Pending { yield_for: 0 }),
            step @ Step::Exhausted(_) => Ok(step.into()),
        }
    }

    // Acquire/Release so a thread that observes a published ID also observes
    // the clock reading it was derived from, and never reads an older one.
    fn publish(&self, current: u64, next: SnowflakeId) -> bool {
        self.state
            .compare_exchange(current, next.to_raw(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

fn decode(raw: u64) -> Option<SnowflakeId> {
    (raw != UNSET).then(|| SnowflakeId::from_raw(raw))
}

impl<T> SnowflakeGenerator<T> for AtomicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn from_node(node: Node, time: T) -> Self {
        Self::from_node(node, time)
    }

    fn node(&self) -> Node {
        self.node()
    }

    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn poll_id(&self) -> Result<Poll> {
        self.poll_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_is_never_a_valid_id() {
        assert!(!SnowflakeId::from_raw(UNSET).is_valid());
        assert_eq!(decode(UNSET), None);
        assert_eq!(decode(0), Some(SnowflakeId::from_raw(0)));
    }
}
