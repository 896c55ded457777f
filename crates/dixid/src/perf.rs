use crate::{DixId, IdGenerator, TimeSource};
use core::fmt;
use std::time::{Duration, Instant};

/// Throughput measurement for one run of back-to-back generate calls.
///
/// This is diagnostic tooling, not part of the correctness contract: it
/// reports how fast ids come out of a generator on the current machine,
/// plus the first and last id produced so a caller can sanity-check the
/// range.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PerfReport {
    /// Number of ids generated.
    pub count: u64,
    /// Wall time for the whole run.
    pub elapsed: Duration,
    /// Ids per second over the run.
    pub ids_per_sec: f64,
    /// First id produced.
    pub first: DixId,
    /// Last id produced.
    pub last: DixId,
}

impl fmt::Display for PerfReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ids in {:.4}s ({:.0} ids/sec) first={} last={}",
            self.count,
            self.elapsed.as_secs_f64(),
            self.ids_per_sec,
            self.first,
            self.last
        )
    }
}

/// Combined self-test result: one example id plus a report for each
/// calling convention.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PerfSummary {
    /// A single id generated up front, as a format example.
    pub example_id: DixId,
    /// Report for the blocking path.
    pub blocking: PerfReport,
    /// Report for the cooperative path.
    pub cooperative: PerfReport,
}

/// Runs `count` back-to-back calls on the blocking path.
///
/// `count` is clamped to at least 1 so the report always carries a first
/// and last id.
///
/// # Panics
///
/// Panics if called from within an async runtime, like
/// [`IdGenerator::generate_blocking`] itself.
pub fn run_blocking<T>(generator: &IdGenerator<T>, count: u64) -> PerfReport
where
    T: TimeSource<u64>,
{
    let count = count.max(1);
    let start = Instant::now();
    let first = generator.generate_blocking();
    let mut last = first;
    for _ in 1..count {
        last = generator.generate_blocking();
    }
    report(count, start.elapsed(), first, last)
}

/// Runs `count` back-to-back calls on the cooperative path.
///
/// `count` is clamped to at least 1 so the report always carries a first
/// and last id.
pub async fn run_async<T>(generator: &IdGenerator<T>, count: u64) -> PerfReport
where
    T: TimeSource<u64>,
{
    let count = count.max(1);
    let start = Instant::now();
    let first = generator.generate_async().await;
    let mut last = first;
    for _ in 1..count {
        last = generator.generate_async().await;
    }
    report(count, start.elapsed(), first, last)
}

/// Runs the full self-test: an example id, then [`run_blocking`] and
/// [`run_async`] for `count` iterations each.
///
/// The cooperative run executes on a private current-thread runtime, so
/// this must be called from synchronous code (it cannot nest inside an
/// existing runtime).
pub fn perf_summary<T>(generator: &IdGenerator<T>, count: u64) -> PerfSummary
where
    T: TimeSource<u64>,
{
    let example_id = generator.generate_blocking();
    let blocking = run_blocking(generator, count);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("current-thread runtime for the cooperative self-test");
    let cooperative = runtime.block_on(run_async(generator, count));
    PerfSummary {
        example_id,
        blocking,
        cooperative,
    }
}

fn report(count: u64, elapsed: Duration, first: DixId, last: DixId) -> PerfReport {
    // Sub-nanosecond runs would divide by zero on coarse clocks.
    let secs = elapsed.as_secs_f64().max(f64::MIN_POSITIVE);
    PerfReport {
        count,
        elapsed,
        ids_per_sec: count as f64 / secs,
        first,
        last,
    }
}
