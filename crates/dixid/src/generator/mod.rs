use crate::{DixId, SleepProvider, TimeSource, TokioSleep, WallClock};
use core::time::Duration;
use std::sync::OnceLock;
use tokio::sync::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(test)]
mod tests;

/// Pause applied when the increment counter wraps.
///
/// One hundredth of a second: long enough that the timestamp re-sampled
/// after the pause lands on a fresh 1/100 s tick, so the `(timestamp, 0)`
/// pair emitted by a wrapping call cannot collide with the one that
/// opened the previous counter cycle.
pub const RESET_DELAY: Duration = Duration::from_millis(10);

/// A generator of [`DixId`]s backed by a single shared counter.
///
/// The counter lives behind one async-aware lock
/// ([`tokio::sync::Mutex`]) that both blocking threads and async tasks
/// acquire, so every caller is serialized through the same critical
/// section regardless of calling convention. Callers state their calling
/// convention explicitly: [`generate_blocking`] from plain threads,
/// [`generate_async`] from tasks.
///
/// Ids are strictly increasing across both entry points as long as the
/// wall clock does not step backward. The generator never fails: clock
/// anomalies degrade ordering but do not surface as errors.
///
/// Most applications want the process-wide instance from
/// [`IdGenerator::global`]; separate instances each own an independent
/// counter and only guarantee uniqueness among their own ids.
///
/// [`generate_blocking`]: Self::generate_blocking
/// [`generate_async`]: Self::generate_async
pub struct IdGenerator<T = WallClock>
where
    T: TimeSource<u64>,
{
    increment: Mutex<u64>,
    time: T,
}

static GLOBAL: OnceLock<IdGenerator> = OnceLock::new();

impl IdGenerator {
    /// Returns the process-wide generator over the system wall clock.
    ///
    /// The instance is constructed on first use and every subsequent call
    /// returns the same reference, so all callers in the process share
    /// one counter.
    ///
    /// # Example
    ///
    /// ```
    /// use dixid::IdGenerator;
    ///
    /// let a = IdGenerator::global().generate_blocking();
    /// let b = IdGenerator::global().generate_blocking();
    /// assert_ne!(a, b);
    /// ```
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Self::new(WallClock))
    }
}

impl<T> IdGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a generator with the counter at zero.
    ///
    /// # Parameters
    ///
    /// - `time`: A [`TimeSource`] implementation (e.g., [`WallClock`])
    ///   that determines how timestamps are sampled.
    pub fn new(time: T) -> Self {
        Self::from_parts(0, time)
    }

    /// Creates a generator with an explicit counter value.
    ///
    /// Primarily useful for tests that need to drive the counter to the
    /// wrap boundary without a million warm-up calls.
    pub fn from_parts(increment: u64, time: T) -> Self {
        Self {
            increment: Mutex::new(increment),
            time,
        }
    }

    /// Generates the next id, blocking the calling thread.
    ///
    /// Waits on the shared lock with the thread parked and, on the
    /// counter-wrap branch, sleeps the thread for [`RESET_DELAY`].
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime (the lock acquire
    /// would block a scheduler thread). Use [`Self::generate_async`]
    /// there instead.
    ///
    /// # Example
    ///
    /// ```
    /// use dixid::{IdGenerator, WallClock};
    ///
    /// let generator = IdGenerator::new(WallClock);
    /// let a = generator.generate_blocking();
    /// let b = generator.generate_blocking();
    /// assert!(b > a);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_blocking(&self) -> DixId {
        let mut seq = self.increment.blocking_lock();
        if *seq >= DixId::MAX_INCREMENT {
            std::thread::sleep(RESET_DELAY);
            *seq = 0;
        }
        Self::advance(&self.time, &mut seq)
    }

    /// Generates the next id cooperatively, pausing with [`TokioSleep`]
    /// on the counter-wrap branch.
    ///
    /// Equivalent to
    /// [`generate_async_with::<TokioSleep>`](Self::generate_async_with).
    pub async fn generate_async(&self) -> DixId {
        self.generate_async_with::<TokioSleep>().await
    }

    /// Generates the next id cooperatively using the given
    /// [`SleepProvider`] for the counter-wrap pause.
    ///
    /// Waiting for the shared lock suspends the task without blocking the
    /// underlying thread, and the wrap pause yields the scheduler to
    /// other ready tasks.
    ///
    /// The returned future is cancel safe: dropping it while waiting for
    /// the lock or during the wrap pause releases the lock and leaves the
    /// counter untouched, so the next caller simply redoes the wrap.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub async fn generate_async_with<S>(&self) -> DixId
    where
        S: SleepProvider,
    {
        let mut seq = self.increment.lock().await;
        if *seq >= DixId::MAX_INCREMENT {
            S::sleep_for(RESET_DELAY).await;
            *seq = 0;
        }
        Self::advance(&self.time, &mut seq)
    }

    /// Core computation. Must run with the lock held.
    ///
    /// The timestamp is sampled here, after any wrap pause, so a wrapping
    /// call composes its id from the post-pause tick. Post-increment
    /// semantics: the id carries the counter value read, and the counter
    /// is left one past it.
    fn advance(time: &T, seq: &mut u64) -> DixId {
        let ts = time.current_centis() % DixId::TIMESTAMP_MOD;
        let used = *seq;
        *seq += 1;
        DixId::from_components(ts, used)
    }
}
