use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use soulbrowser_coord::{
    action_fn, interval_run, wait_until, Action, ActionError, ExecScope, IntervalRun, Outcome,
    WaitConfig, WaitUntil,
};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn continue_c_times_means_c_plus_one_probes() {
    for continues in [0usize, 1, 5, 20] {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let started = Instant::now();

        wait_until(&ExecScope::new(), Duration::from_millis(50), move |_scope| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < continues {
                    Outcome::Continue
                } else {
                    Outcome::Done
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), continues + 1);
        let expected = Duration::from_millis(50 * (continues as u64 + 1));
        let slack = Duration::from_millis(5 * (continues as u64 + 1));
        let elapsed = started.elapsed();
        assert!(elapsed >= expected && elapsed < expected + slack);
    }
}

#[tokio::test(start_paused = true)]
async fn configured_tick_is_used() {
    let config = WaitConfig {
        poll_interval_ms: 10,
        ..WaitConfig::default()
    };
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let action = WaitUntil::new(move |_scope| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 2 {
                Outcome::Continue
            } else {
                Outcome::Done
            }
        }
    })
    .with_config(&config);

    let started = Instant::now();
    action.run(&ExecScope::new()).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() < Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn perpetual_continue_ends_within_one_tick_of_cancel() {
    let scope = ExecScope::new();
    let canceller = scope.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(333)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = wait_until(&scope, Duration::from_millis(50), |_| async {
        Outcome::Continue
    })
    .await
    .unwrap_err();

    assert_eq!(err, ActionError::Cancelled);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(333));
    assert!(elapsed <= Duration::from_millis(383));
}

#[tokio::test(start_paused = true)]
async fn not_matched_is_treated_as_not_yet() {
    let calls = AtomicUsize::new(0);
    wait_until(&ExecScope::new(), Duration::from_millis(5), |_| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if n == 0 {
                Outcome::NotMatched
            } else {
                Outcome::Done
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn third_invocation_failure_stops_the_periodic_loop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let heartbeat = action_fn(move |_scope: ExecScope| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if n == 3 {
                Err(ActionError::CdpIo("socket closed".into()))
            } else {
                Ok(())
            }
        }
    });

    let err = IntervalRun::new(Duration::from_secs(1), heartbeat)
        .run(&ExecScope::new())
        .await
        .unwrap_err();
    assert_eq!(err, ActionError::CdpIo("socket closed".into()));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn periodic_runs_never_overlap() {
    let running = Arc::new(AtomicUsize::new(0));
    let runs = Arc::new(AtomicUsize::new(0));
    let (running_in, runs_in) = (Arc::clone(&running), Arc::clone(&runs));
    let slow = action_fn(move |_scope: ExecScope| {
        let running = Arc::clone(&running_in);
        let runs = Arc::clone(&runs_in);
        async move {
            assert_eq!(running.fetch_add(1, Ordering::SeqCst), 0);
            tokio::time::sleep(Duration::from_millis(70)).await;
            running.fetch_sub(1, Ordering::SeqCst);
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    let scope = ExecScope::with_timeout(Duration::from_millis(400));
    let err = interval_run(&scope, Duration::from_millis(30), &slow)
        .await
        .unwrap_err();
    assert_eq!(err, ActionError::DeadlineExceeded);
    // Each cycle is 30ms idle plus 70ms of work.
    assert_eq!(runs.load(Ordering::SeqCst), 4);
}
