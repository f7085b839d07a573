use crate::{ConfigError, Node, Poll, Result, SnowflakeId, TimeSource};

/// A minimal interface for generating Snowflake IDs.
///
/// Implemented by [`LockSnowflakeGenerator`] and [`AtomicSnowflakeGenerator`]
/// so callers can stay generic over the concurrency strategy.
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub trait SnowflakeGenerator<T>: Sized
where
    T: TimeSource,
{
    /// Creates a generator for an already validated node.
    fn from_node(node: Node, time: T) -> Self;

    /// Validates the node identity and creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `datacenter_id` or `worker_id` is larger
    /// than 31.
    fn new(datacenter_id: u64, worker_id: u64, epoch: u64, time: T) -> Result<Self, ConfigError> {
        Ok(Self::from_node(Node::new(datacenter_id, worker_id, epoch)?, time))
    }

    /// The identity encoded into every ID.
    fn node(&self) -> Node;

    /// Generates the next ID, spinning through sequence exhaustion.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRollback`] if the clock reads earlier than the last
    ///   timestamp used.
    /// - [`Error::TimestampOverflow`] once the epoch offset outgrows 41 bits.
    ///
    /// [`Error::ClockRollback`]: crate::Error::ClockRollback
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    fn next_id(&self) -> Result<SnowflakeId>;

    /// Attempts to generate the next ID without blocking.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::next_id`].
    fn poll_id(&self) -> Result<Poll>;
}
