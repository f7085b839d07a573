use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Default epoch: Monday, May 16, 2022 10:30:02.988 UTC
pub const DEFAULT_EPOCH: u64 = 1_652_697_002_988;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: u64 = 1_288_834_974_657;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// A source of wall-clock time.
///
/// Generators read the clock through this trait so tests (or callers with
/// their own notion of time) can substitute it. The unit is **milliseconds
/// since the Unix epoch**; the generator subtracts its own epoch.
///
/// # Example
///
/// ```
/// use flakeworker::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in Unix milliseconds.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// The system wall clock.
///
/// Reads `SystemTime::now()` on every call. Wall time can be stepped
/// backwards (NTP corrections, manual changes); generators detect that and
/// report a [`ClockRollbackError`] instead of hiding it. A clock set before
/// 1970 reads as `0`.
///
/// [`ClockRollbackError`]: crate::ClockRollbackError
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_default_epoch() {
        assert!(SystemClock.current_millis() > DEFAULT_EPOCH);
    }

    #[test]
    fn shared_clocks_delegate() {
        struct FixedTime;
        impl TimeSource for FixedTime {
            fn current_millis(&self) -> u64 {
                42
            }
        }

        let shared = Arc::new(FixedTime);
        assert_eq!(shared.current_millis(), 42);
        assert_eq!((&FixedTime).current_millis(), 42);
    }
}
