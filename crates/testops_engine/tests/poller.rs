use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use testops_engine::{Poller, Tick};

#[derive(Debug)]
struct NeverError;

impl std::fmt::Display for NeverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("never")
    }
}

#[tokio::test]
async fn first_tick_runs_immediately_then_on_cadence() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let _poller = Poller::spawn(Duration::from_millis(50), move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, NeverError>(Tick::Continue)
        }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1, "first tick is immediate");

    tokio::time::sleep(Duration::from_millis(140)).await;
    assert!(ticks.load(Ordering::SeqCst) >= 3, "cadence keeps ticking");
}

#[tokio::test]
async fn failing_tick_never_stops_the_schedule() {
    client_logging::initialize_for_tests();
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let _poller = Poller::spawn(Duration::from_millis(20), move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<Tick, _>(NeverError)
        }
    });

    tokio::time::sleep(Duration::from_millis(110)).await;
    assert!(ticks.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn stop_ends_the_schedule_exactly_once() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let poller = Poller::spawn(Duration::from_millis(10), move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, NeverError>(Tick::Stop)
        }
    });

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
    assert!(poller.is_finished());
}

#[tokio::test]
async fn cancel_prevents_further_ticks() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let poller = Poller::spawn(Duration::from_millis(30), move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, NeverError>(Tick::Continue)
        }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    poller.cancel();
    let after_cancel = ticks.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), after_cancel);
}

#[tokio::test]
async fn dropping_mid_tick_discards_in_flight_side_effects() {
    // The action takes longer than the poller lives. The side effect sits
    // after its suspension point and must never land once the poller is
    // dropped.
    let landed = Arc::new(AtomicUsize::new(0));
    let flag = landed.clone();

    let poller = Poller::spawn(Duration::from_millis(10), move || {
        let flag = flag.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            flag.fetch_add(1, Ordering::SeqCst);
            Ok::<_, NeverError>(Tick::Continue)
        }
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    drop(poller);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(landed.load(Ordering::SeqCst), 0);
}
