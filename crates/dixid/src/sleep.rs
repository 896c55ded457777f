use core::time::Duration;

/// A trait that abstracts over how to pause for a given [`Duration`] in
/// async contexts.
///
/// The generator only pauses on the counter-wrap branch. On the blocking
/// path that pause is a plain `std::thread::sleep`; on the cooperative
/// path it goes through a `SleepProvider` so the task yields the
/// scheduler instead of blocking the thread.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across
    /// threads.
    type Sleep: Future<Output = ()> + Send;

    fn sleep_for(dur: Duration) -> Self::Sleep;
}

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider used by
/// [`IdGenerator::generate_async`](crate::IdGenerator::generate_async).
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}
