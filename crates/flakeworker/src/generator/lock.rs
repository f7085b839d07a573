#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ConfigError, Node, Poll, Result, SnowflakeGenerator, SnowflakeId, SystemClock, TimeSource,
    generator::{
        mutex::{Mutex, MutexGuard},
        tick::{self, Step},
    },
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID (which carries both the last timestamp and the current
/// sequence) sits behind a [`Mutex`]. Each call holds the lock across the
/// clock read, the rollback check, the sequence update and, when the
/// millisecond is exhausted, the busy-wait for the next one. Concurrent
/// callers are therefore strictly serialized.
///
/// The mutex is `std::sync::Mutex`, or `parking_lot::Mutex` with the
/// `parking-lot` feature. A poisoned std mutex is recovered rather than
/// reported: state is only written after every check has passed, so a panic
/// inside the section cannot leave it half-updated.
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
///
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct LockSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<Option<SnowflakeId>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<Option<SnowflakeId>>,
    node: Node,
    time: T,
}

impl LockSnowflakeGenerator<SystemClock> {
    /// Creates a generator backed by the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `datacenter_id` or `worker_id` is larger
    /// than 31.
    ///
    /// # Example
    /// ```
    /// use flakeworker::{DEFAULT_EPOCH, LockSnowflakeGenerator};
    ///
    /// let generator = LockSnowflakeGenerator::with_system_clock(10, 20, DEFAULT_EPOCH).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!((id.datacenter_id(), id.worker_id()), (10, 20));
    /// ```
    pub fn with_system_clock(
        datacenter_id: u64,
        worker_id: u64,
        epoch: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(datacenter_id, worker_id, epoch, SystemClock)
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockSnowflakeGenerator`] for the given node identity.
    ///
    /// # Parameters
    ///
    /// - `datacenter_id`, `worker_id`: the node identity, each 0-31. The pair
    ///   must be unique among generators sharing `epoch`.
    /// - `epoch`: Unix milliseconds that timestamp `0` refers to.
    /// - `time`: the [`TimeSource`] read on every call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either ID is larger than 31.
    pub fn new(datacenter_id: u64, worker_id: u64, epoch: u64, time: T) -> Result<Self, ConfigError> {
        Ok(Self::from_node(Node::new(datacenter_id, worker_id, epoch)?, time))
    }

    /// Creates a generator for an already validated [`Node`].
    ///
    /// The generator starts with no previous call recorded, so the first ID
    /// always has sequence `0`.
    pub fn from_node(node: Node, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(None)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(None),
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
    /// When 4096 IDs have already been issued in the current millisecond,
    /// this **blocks**: it spins, re-reading the clock, until the clock moves
    /// past that millisecond, then returns sequence `0` at the new timestamp.
    /// The wait has no timeout and cannot be cancelled; with a correct clock
    /// it lasts at most a little over one millisecond.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRollback`] if the clock reads earlier than the last
    ///   timestamp used. No ID is issued and the state is unchanged.
    /// - [`Error::TimestampOverflow`] once the epoch offset outgrows 41 bits.
    ///
    /// # Example
    /// ```
    /// use flakeworker::{Error, LockSnowflakeGenerator, SystemClock, TWITTER_EPOCH};
    ///
    /// let generator = LockSnowflakeGenerator::new(0, 1, TWITTER_EPOCH, SystemClock).unwrap();
    ///
    /// match generator.next_id() {
    ///     Ok(id) => println!("{id}"),
    ///     Err(Error::ClockRollback(e)) => eprintln!("clock behind by {} ms", e.backwards_by()),
    ///     Err(e) => panic!("{e}"),
    /// }
    /// ```
    ///
    /// [`Error::ClockRollback`]: crate::Error::ClockRollback
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock();
        let now = self.time.current_millis();

        let id = match tick::advance(&self.node, now, *state)? {
            Step::Ready(id) => id,
            Step::Exhausted(last) => {
                let timestamp = tick::wait_past(&self.node, &self.time, last)?;
                last.rollover_to_timestamp(timestamp)
            }
        };

        *state = Some(id);
        Ok(id)
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Identical to [`Self::next_id`] except that an exhausted millisecond
    /// returns [`Poll::Pending`] and leaves the state untouched, so the
    /// caller chooses how to wait.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`].
    ///
    /// # Example
    /// ```
    /// use flakeworker::{LockSnowflakeGenerator, Poll, DEFAULT_EPOCH};
    ///
    /// let generator = LockSnowflakeGenerator::with_system_clock(0, 0, DEFAULT_EPOCH).unwrap();
    ///
    /// let id = loop {
    ///     match generator.poll_id().unwrap() {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(id.sequence(), 0);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<Poll> {
        let mut state = self.lock();
        let now = self.time.current_millis();

        let step = tick::advance(&self.node, now, *state)?;
        if let Step::Ready(id) = step {
            *state = Some(id);
        }
        Ok(step.into())
    }

    fn lock(&self) -> MutexGuard<'_, Option<SnowflakeId>> {
        #[cfg(feature = "parking-lot")]
        {
            self.state.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.state
                .lock()
                .unwrap_or_else(crate::generator::mutex::PoisonError::into_inner)
        }
    }
}

impl<T> SnowflakeGenerator<T> for LockSnowflakeGenerator<T>
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
