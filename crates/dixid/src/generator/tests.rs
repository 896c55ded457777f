use super::*;
use crate::{DixId, TimeSource};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

struct FixedTime(u64);

impl TimeSource<u64> for FixedTime {
    fn current_centis(&self) -> u64 {
        self.0
    }
}

/// Advances one tick per sample, so every call lands on a fresh
/// timestamp.
struct SteppingTime {
    next: AtomicU64,
}

impl SteppingTime {
    fn starting_at(tick: u64) -> Self {
        Self {
            next: AtomicU64::new(tick),
        }
    }
}

impl TimeSource<u64> for SteppingTime {
    fn current_centis(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[test]
fn same_tick_ids_differ_only_in_increment() {
    let generator = IdGenerator::new(FixedTime(42));

    let a = generator.generate_blocking();
    let b = generator.generate_blocking();

    assert_eq!(a.timestamp_fraction(), 42);
    assert_eq!(b.timestamp_fraction(), 42);
    assert_eq!(a.increment(), 0);
    assert_eq!(b.increment(), 1);
    assert_eq!(b.to_raw() - a.to_raw(), 1);
}

#[test]
fn blocking_sequence_is_strictly_increasing() {
    let generator = IdGenerator::new(WallClock);

    let mut prev = generator.generate_blocking();
    for _ in 0..10_000 {
        let next = generator.generate_blocking();
        assert!(next > prev, "{next} did not advance past {prev}");
        prev = next;
    }
}

#[test]
fn wall_clock_ids_have_18_digits() {
    let generator = IdGenerator::new(WallClock);
    let id = generator.generate_blocking();
    assert_eq!(id.to_string().len(), 18);
}

#[test]
fn timestamp_is_reduced_modulo_twelve_digits() {
    let generator = IdGenerator::new(FixedTime(DixId::TIMESTAMP_MOD + 99));
    let id = generator.generate_blocking();
    assert_eq!(id.timestamp_fraction(), 99);
}

#[test]
fn full_cycle_wraps_and_never_leaves_range() {
    let generator = IdGenerator::new(FixedTime(7));

    for expect in 0..DixId::MAX_INCREMENT {
        let id = generator.generate_blocking();
        assert_eq!(id.increment(), expect);
        assert!(id.increment() <= DixId::MAX_INCREMENT);
    }

    // The counter now sits at 999_999: the millionth call wraps.
    let start = Instant::now();
    let wrapped = generator.generate_blocking();
    assert!(
        start.elapsed() >= RESET_DELAY,
        "wrap did not pause: {:?}",
        start.elapsed()
    );
    assert_eq!(wrapped.increment(), 0);

    let after = generator.generate_blocking();
    assert_eq!(after.increment(), 1);
}

#[test]
fn wrap_pauses_then_restarts_from_zero() {
    let generator = IdGenerator::from_parts(DixId::MAX_INCREMENT, WallClock);

    let start = Instant::now();
    let wrapped = generator.generate_blocking();
    assert!(start.elapsed() >= RESET_DELAY);
    assert_eq!(wrapped.increment(), 0);
    assert!(wrapped.to_padded_string().ends_with("000000"));

    let next = generator.generate_blocking();
    assert_eq!(next.increment(), 1);
    assert!(next > wrapped);
}

#[test]
fn wrap_resamples_time_after_the_pause() {
    // With a stepping clock the wrapping call must compose its id from a
    // later tick than the call before it, keeping ids strictly
    // increasing across the wrap even though the counter falls back to
    // zero.
    let generator = IdGenerator::from_parts(DixId::MAX_INCREMENT - 1, SteppingTime::starting_at(50));

    let before = generator.generate_blocking();
    let wrapped = generator.generate_blocking();

    assert_eq!(before.increment(), DixId::MAX_INCREMENT - 1);
    assert_eq!(wrapped.increment(), 0);
    assert!(wrapped.timestamp_fraction() > before.timestamp_fraction());
    assert!(wrapped > before);
}

#[test]
fn monotonic_across_wrap_with_wall_clock() {
    let generator = IdGenerator::from_parts(DixId::MAX_INCREMENT - 10, WallClock);

    let mut prev = generator.generate_blocking();
    for _ in 0..20 {
        let next = generator.generate_blocking();
        assert!(next > prev);
        prev = next;
    }
}

#[test]
fn global_returns_the_same_instance() {
    let a = IdGenerator::global();
    let b = IdGenerator::global();
    assert!(std::ptr::eq(a, b));
}

#[tokio::test]
async fn async_sequence_is_strictly_increasing() {
    let generator = IdGenerator::new(WallClock);

    let mut prev = generator.generate_async().await;
    for _ in 0..1_000 {
        let next = generator.generate_async().await;
        assert!(next > prev);
        prev = next;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_produce_unique_ids() {
    const TASKS: usize = 8;
    const IDS_PER_TASK: usize = 500;

    let generator = Arc::new(IdGenerator::new(WallClock));

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move {
                let mut ids = Vec::with_capacity(IDS_PER_TASK);
                for _ in 0..IDS_PER_TASK {
                    ids.push(generator.generate_async().await);
                }
                ids
            })
        })
        .collect();

    let results = futures::future::try_join_all(handles).await.unwrap();
    let all: HashSet<DixId> = results.into_iter().flatten().collect();
    assert_eq!(all.len(), TASKS * IDS_PER_TASK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn blocking_and_async_callers_share_one_counter() {
    const IDS_PER_SIDE: usize = 2_000;

    let generator = Arc::new(IdGenerator::new(WallClock));

    // Plain threads take the blocking path while this task takes the
    // cooperative path; both funnel through the same lock.
    let worker = {
        let generator = Arc::clone(&generator);
        thread::spawn(move || {
            (0..IDS_PER_SIDE)
                .map(|_| generator.generate_blocking())
                .collect::<Vec<_>>()
        })
    };

    let mut cooperative = Vec::with_capacity(IDS_PER_SIDE);
    for _ in 0..IDS_PER_SIDE {
        cooperative.push(generator.generate_async().await);
    }

    let blocking = worker.join().unwrap();

    let all: HashSet<DixId> = blocking.into_iter().chain(cooperative).collect();
    assert_eq!(all.len(), IDS_PER_SIDE * 2);
}

#[tokio::test]
async fn cancelled_wrap_pause_does_not_leak_the_lock() {
    let generator = Arc::new(IdGenerator::from_parts(DixId::MAX_INCREMENT, WallClock));

    // Cancel the first call mid-pause. The guard is dropped with the
    // counter still at the wrap boundary.
    let cancelled =
        tokio::time::timeout(Duration::from_millis(1), generator.generate_async()).await;
    assert!(cancelled.is_err());

    // The lock is free again and the next caller redoes the wrap.
    let id = generator.generate_async().await;
    assert_eq!(id.increment(), 0);
}
