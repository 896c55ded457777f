use std::time::{SystemTime, UNIX_EPOCH};

/// A trait for time sources that report Unix time in hundredths of a
/// second.
///
/// This abstraction lets the generator run against the real system clock
/// in production and against fixed or stepping clocks in tests.
///
/// # Example
///
/// ```
/// use dixid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_centis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_centis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current Unix time in hundredths of a second.
    fn current_centis(&self) -> T;
}

/// The default [`TimeSource`]: the system wall clock.
///
/// Backward clock adjustments (NTP steps, manual changes) are tolerated,
/// not detected: the reported value may repeat or regress, in which case
/// emitted ids may regress with it.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource<u64> for WallClock {
    fn current_centis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            // A pre-1970 system clock reads as time zero.
            .map_or(0, |d| (d.as_millis() / 10) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_reports_current_era() {
        // 2020-01-01 in hundredths of a second.
        let lower = 157_766_400_000;
        let now = WallClock.current_centis();
        assert!(now > lower, "clock reported {now}");
    }

    #[test]
    fn wall_clock_is_non_decreasing() {
        let a = WallClock.current_centis();
        let b = WallClock.current_centis();
        assert!(b >= a);
    }
}
