use core::cmp::Ordering;

use crate::{ClockRollbackError, Error, Node, Poll, Result, SnowflakeId, TimeSource};

/// What a single clock reading allows the generator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Commit this ID as the new state and hand it out.
    Ready(SnowflakeId),
    /// The sequence of the last ID's millisecond is used up and the clock has
    /// not moved past it yet.
    Exhausted(SnowflakeId),
}

impl From<Step> for Poll {
    fn from(step: Step) -> Self {
        match step {
            Step::Ready(id) => Self::Ready { id },
            Step::Exhausted(_) => Self::Pending { yield_for: 1 },
        }
    }
}

/// Decides the next ID from a clock reading and the last issued ID.
///
/// Pure with respect to generator state: the caller commits the returned ID
/// (under its lock, or by CAS).
pub(crate) fn advance(node: &Node, now: u64, last: Option<SnowflakeId>) -> Result<Step> {
    let timestamp = offset_from_epoch(node, now, last)?;

    let Some(last) = last else {
        return Ok(Step::Ready(node.compose(timestamp, 0)));
    };

    match timestamp.cmp(&last.timestamp()) {
        Ordering::Equal => {
            if last.has_sequence_room() {
                Ok(Step::Ready(last.increment_sequence()))
            } else {
                Ok(Step::Exhausted(last))
            }
        }
        Ordering::Greater => Ok(Step::Ready(last.rollover_to_timestamp(timestamp))),
        Ordering::Less => Err(clock_behind(node, now, Some(last))),
    }
}

/// Spins until the clock reads strictly past `last`'s timestamp and returns
/// the new offset from the epoch.
///
/// Blocks the calling thread with no timeout. Under a correct clock this is
/// at most a little over one millisecond. Readings at or before `last` (a
/// clock that stepped back mid-wait included) keep the loop spinning.
pub(crate) fn wait_past<T>(node: &Node, time: &T, last: SnowflakeId) -> Result<u64>
where
    T: TimeSource,
{
    loop {
        core::hint::spin_loop();
        let now = time.current_millis();
        let Some(timestamp) = now.checked_sub(node.epoch()) else {
            continue;
        };
        if timestamp > last.timestamp() {
            return check_overflow(timestamp);
        }
    }
}

fn offset_from_epoch(node: &Node, now: u64, last: Option<SnowflakeId>) -> Result<u64> {
    match now.checked_sub(node.epoch()) {
        Some(timestamp) => check_overflow(timestamp),
        None => Err(clock_behind(node, now, last)),
    }
}

fn check_overflow(timestamp: u64) -> Result<u64> {
    if timestamp > SnowflakeId::MAX_TIMESTAMP {
        return Err(Error::TimestampOverflow { timestamp });
    }
    Ok(timestamp)
}

#[cold]
#[inline(never)]
fn clock_behind(node: &Node, now: u64, last: Option<SnowflakeId>) -> Error {
    let last_timestamp = last.map_or(node.epoch(), |id| id.unix_millis(node.epoch()));
    debug_assert!(now < last_timestamp);

    #[cfg(feature = "tracing")]
    tracing::warn!(
        now,
        last_timestamp,
        datacenter_id = node.datacenter_id(),
        worker_id = node.worker_id(),
        "clock moved backwards"
    );

    Error::ClockRollback(ClockRollbackError {
        now,
        last_timestamp,
    })
}
