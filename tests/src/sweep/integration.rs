use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::SweepConfig;
use sweepr_common::network::range::HostRange;
use sweepr_core::error::SweepError;
use sweepr_core::event::NoopSink;
use sweepr_core::sweep::SweepEngine;
use tokio::sync::Semaphore;

use super::util::{v4, Event, GatedProber, RecordingSink, ScriptedProber};

fn config(workers: usize) -> SweepConfig {
    SweepConfig {
        workers,
        probe_timeout: Duration::from_millis(50),
    }
}

fn range(expr: &str) -> HostRange {
    expr.parse().expect("test range must parse")
}

async fn wait_for_results(sink: &RecordingSink, want: usize) {
    for _ in 0..400 {
        if sink.result_count() >= want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {want} results, saw {}", sink.result_count());
}

#[tokio::test]
async fn sweep_with_no_live_hosts() {
    // 10.0.0.0/30 has two usable hosts and nothing answers.
    let engine = SweepEngine::new(Arc::new(ScriptedProber::new([])));
    let sink = Arc::new(RecordingSink::default());

    let handle = engine
        .start(&range("10.0.0.0/30"), config(2), sink.clone())
        .expect("start");
    let outcome = handle.wait().await.expect("wait");

    assert!(outcome.live.is_empty());
    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.completed, 2);
}

#[tokio::test]
async fn serial_sweep_reports_live_hosts_in_dispatch_order() {
    let alive = [v4("10.0.0.3"), v4("10.0.0.5")];
    let engine = SweepEngine::new(Arc::new(ScriptedProber::new(alive)));
    let sink = Arc::new(RecordingSink::default());

    let handle = engine
        .start(&range("10.0.0.0/29"), config(1), sink.clone())
        .expect("start");
    let outcome = handle.wait().await.expect("wait");

    // one worker means completion order is address order
    assert_eq!(outcome.live, vec![v4("10.0.0.3"), v4("10.0.0.5")]);
    assert_eq!(outcome.completed, 6);
    assert_eq!(outcome.total, 6);
}

#[tokio::test]
async fn every_host_yields_exactly_one_result() {
    let alive = [v4("10.1.0.2"), v4("10.1.0.9")];
    let engine = SweepEngine::new(Arc::new(ScriptedProber::new(alive)));
    let sink = Arc::new(RecordingSink::default());
    let swept = range("10.1.0.0/28");

    let handle = engine
        .start(&swept, config(5), sink.clone())
        .expect("start");
    let outcome = handle.wait().await.expect("wait");

    let events = sink.events();
    let expected: HashSet<IpAddr> = swept.hosts().map(IpAddr::V4).collect();

    let result_addrs: Vec<IpAddr> = events
        .iter()
        .filter_map(|ev| match ev {
            Event::Result { addr, .. } => Some(*addr),
            _ => None,
        })
        .collect();

    assert_eq!(result_addrs.len(), 14);
    let unique: HashSet<IpAddr> = result_addrs.iter().copied().collect();
    assert_eq!(unique, expected, "every address exactly once");

    let counts: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|ev| match ev {
            Event::Progress { processed, total } => Some((*processed, *total)),
            _ => None,
        })
        .collect();

    assert_eq!(counts.len(), 14);
    for (i, (processed, total)) in counts.iter().enumerate() {
        assert_eq!(*processed, i + 1, "progress is monotone");
        assert_eq!(*total, 14);
    }

    let completions = events
        .iter()
        .filter(|ev| matches!(ev, Event::Complete { .. }))
        .count();
    assert_eq!(completions, 1);
    assert!(matches!(events.last(), Some(Event::Complete { .. })));

    for addr in &outcome.live {
        assert!(expected.contains(addr), "live host must come from range");
    }
}

#[tokio::test]
async fn cancellation_stops_dispatch_but_drains_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let engine = SweepEngine::new(Arc::new(GatedProber::new([], gate.clone())));
    let sink = Arc::new(RecordingSink::default());

    let handle = engine
        .start(&range("10.0.0.0/29"), config(1), sink.clone())
        .expect("start");

    gate.add_permits(3);
    wait_for_results(&sink, 3).await;

    handle.cancel();
    handle.cancel(); // idempotent
    gate.add_permits(16);

    let outcome = handle.wait().await.expect("wait");

    // three probes finished before the cancel; at most one more was in
    // flight and is allowed to drain
    assert!(
        (3..=4).contains(&outcome.completed),
        "completed = {}",
        outcome.completed
    );
    assert_eq!(outcome.total, 6);

    let events = sink.events();
    assert_eq!(sink.result_count(), outcome.completed);
    assert_eq!(
        events
            .iter()
            .filter(|ev| matches!(ev, Event::Complete { .. }))
            .count(),
        1
    );
    assert!(matches!(events.last(), Some(Event::Complete { .. })));
}

#[tokio::test]
async fn second_start_fails_while_sweep_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let engine = SweepEngine::new(Arc::new(GatedProber::new([], gate.clone())));

    let handle = engine
        .start(&range("10.0.0.0/30"), config(2), Arc::new(NoopSink))
        .expect("first start");

    let err = engine
        .start(&range("10.0.0.0/30"), config(2), Arc::new(NoopSink))
        .expect_err("second start must fail");
    assert!(matches!(err, SweepError::AlreadyRunning));

    // the rejected start must not disturb the sweep in flight
    gate.add_permits(8);
    let outcome = handle.wait().await.expect("wait");
    assert_eq!(outcome.completed, 2);
}

#[tokio::test]
async fn engine_is_reusable_after_completion() {
    let engine = SweepEngine::new(Arc::new(ScriptedProber::new([v4("10.0.0.1")])));

    let first = engine
        .start(&range("10.0.0.0/30"), config(2), Arc::new(NoopSink))
        .expect("first start")
        .wait()
        .await
        .expect("first wait");
    assert_eq!(first.live, vec![v4("10.0.0.1")]);

    let second = engine
        .start(&range("10.0.0.0/30"), config(2), Arc::new(NoopSink))
        .expect("second start")
        .wait()
        .await
        .expect("second wait");
    assert_eq!(second.completed, 2);
}

#[tokio::test]
async fn worker_count_outside_bounds_is_rejected() {
    let engine = SweepEngine::new(Arc::new(ScriptedProber::new([])));

    for workers in [0, 201] {
        let err = engine
            .start(&range("10.0.0.0/30"), config(workers), Arc::new(NoopSink))
            .expect_err("out-of-bounds worker count must fail");
        assert!(matches!(err, SweepError::InvalidConcurrency { .. }));
    }

    // a rejected start leaves the engine available
    let outcome = engine
        .start(&range("10.0.0.0/30"), config(1), Arc::new(NoopSink))
        .expect("start")
        .wait()
        .await
        .expect("wait");
    assert_eq!(outcome.completed, 2);
}

#[tokio::test]
async fn pool_larger_than_range_completes() {
    let engine = SweepEngine::new(Arc::new(ScriptedProber::new([])));

    let outcome = engine
        .start(&range("10.0.0.0/30"), config(50), Arc::new(NoopSink))
        .expect("start")
        .wait()
        .await
        .expect("wait");

    assert_eq!(outcome.completed, 2);
    assert_eq!(outcome.total, 2);
}

#[tokio::test]
async fn stalled_prober_is_recorded_as_dead() {
    let prober =
        ScriptedProber::new([v4("10.0.0.1"), v4("10.0.0.2")]).with_delay(Duration::from_secs(30));
    let engine = SweepEngine::new(Arc::new(prober));
    let sink = Arc::new(RecordingSink::default());

    let handle = engine
        .start(&range("10.0.0.0/30"), config(2), sink.clone())
        .expect("start");
    let outcome = handle.wait().await.expect("wait");

    assert!(outcome.live.is_empty(), "stalled probes count as dead");
    assert_eq!(outcome.completed, 2);
    // elapsed must reflect the wait for the stalled probes
    assert!(outcome.elapsed >= Duration::from_millis(500));
}
