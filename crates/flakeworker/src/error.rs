/// A result type defaulting to the crate-wide [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The node identity handed to a generator was rejected.
///
/// Only produced at construction time. Retrying with the same values will
/// fail again; the caller has to supply an identity within range.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `datacenter_id` does not fit in its 5-bit field.
    #[error("datacenter_id {datacenter_id} is out of range (0..={max})")]
    DatacenterIdOutOfRange {
        /// The rejected value.
        datacenter_id: u64,
        /// The largest accepted value.
        max: u64,
    },

    /// `worker_id` does not fit in its 5-bit field.
    #[error("worker_id {worker_id} is out of range (0..={max})")]
    WorkerIdOutOfRange {
        /// The rejected value.
        worker_id: u64,
        /// The largest accepted value.
        max: u64,
    },
}

/// The clock read earlier than a timestamp this generator already used.
///
/// Returned immediately and never retried internally. Issuing an ID now could
/// repeat or undercut one that was already handed out, so the call fails and
/// the generator state is left untouched. Once the clock has caught up with
/// `last_timestamp` the same generator produces IDs again.
///
/// Both timestamps are Unix milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("clock moved backwards: now {now} ms is behind last timestamp {last_timestamp} ms")]
pub struct ClockRollbackError {
    /// The clock reading that triggered the failure.
    pub now: u64,
    /// The most recent timestamp used by the generator, or the epoch if the
    /// generator has not issued anything yet.
    pub last_timestamp: u64,
}

impl ClockRollbackError {
    /// How far the clock is behind, in milliseconds.
    pub const fn backwards_by(&self) -> u64 {
        self.last_timestamp.saturating_sub(self.now)
    }
}

/// All errors a generator can report.
///
/// Callers are expected to branch on the variant: a [`ConfigError`] is fatal
/// to the construction attempt, a [`ClockRollbackError`] is transient and the
/// recovery policy (wait and retry, alert on skew) is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid node identity.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The clock went backwards relative to the generator state.
    #[error(transparent)]
    ClockRollback(#[from] ClockRollbackError),

    /// The offset from the epoch no longer fits in the 41-bit timestamp field.
    ///
    /// Masking would wrap the timestamp and break ordering, so generation
    /// stops instead.
    #[error("timestamp {timestamp} ms past the epoch exceeds the 41-bit field")]
    TimestampOverflow {
        /// The offending offset from the epoch, in milliseconds.
        timestamp: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_reports_gap() {
        let err = ClockRollbackError {
            now: 95,
            last_timestamp: 100,
        };
        assert_eq!(err.backwards_by(), 5);
        assert_eq!(
            err.to_string(),
            "clock moved backwards: now 95 ms is behind last timestamp 100 ms"
        );
    }

    #[test]
    fn wrapped_errors_keep_their_kind() {
        let err: Error = ConfigError::WorkerIdOutOfRange {
            worker_id: 32,
            max: 31,
        }
        .into();
        assert!(matches!(err, Error::Config(ConfigError::WorkerIdOutOfRange { .. })));
        assert_eq!(err.to_string(), "worker_id 32 is out of range (0..=31)");

        let err: Error = ClockRollbackError {
            now: 1,
            last_timestamp: 2,
        }
        .into();
        assert!(matches!(err, Error::ClockRollback(_)));
    }
}
