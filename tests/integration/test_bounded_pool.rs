// ワーカー数上限とキャンセルの統合テスト
use anyhow::{anyhow, Result};
use parmap::{
    run_with_cancellation, Blocking, CancellationToken, DefaultMapConfig, ItemError, MapConfig,
    NoOpProgressReporter, ParallelMapper,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[derive(Default)]
struct Concurrency {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_pool_respects_limit_and_order() -> Result<()> {
    let config = DefaultMapConfig::new().with_max_workers(4).with_buffer_size(2);
    let mapper = ParallelMapper::new(config, NoOpProgressReporter::new())?;
    let tracker = Arc::new(Concurrency::default());

    let operation = {
        let tracker = Arc::clone(&tracker);
        move |x: u64| {
            let tracker = Arc::clone(&tracker);
            async move {
                tracker.enter();
                sleep(Duration::from_millis(3)).await;
                tracker.exit();
                if x % 10 == 7 {
                    Err(anyhow!("unlucky {x}"))
                } else {
                    Ok(x * x)
                }
            }
        }
    };

    let (results, errors) = mapper.execute((0..100u64).collect::<Vec<u64>>(), operation).await;

    assert!(tracker.peak() <= 4);
    assert_eq!(results.len(), 100);
    let errors = errors.expect("indices ending in 7 fail");
    assert_eq!(errors.len(), 10);
    for (index, value) in results.iter().enumerate() {
        let x = index as u64;
        if errors.contains(index) {
            assert_eq!(x % 10, 7);
            assert_eq!(*value, 0);
        } else {
            assert_eq!(*value, x * x);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_unbounded_pool_runs_every_item_concurrently() -> Result<()> {
    let config = DefaultMapConfig::default();
    assert_eq!(config.max_workers(), None);
    let mapper = ParallelMapper::new(config, NoOpProgressReporter::new())?;
    let tracker = Arc::new(Concurrency::default());

    let operation = {
        let tracker = Arc::clone(&tracker);
        move |x: u64| {
            let tracker = Arc::clone(&tracker);
            async move {
                tracker.enter();
                sleep(Duration::from_millis(50)).await;
                tracker.exit();
                Ok::<u64, anyhow::Error>(x)
            }
        }
    };

    let (results, errors) = mapper.execute((0..16u64).collect::<Vec<u64>>(), operation).await;

    assert!(errors.is_none());
    assert_eq!(results, (0..16).collect::<Vec<u64>>());
    // アイテム毎に1ワーカーなので全件が同時に実行中になる
    assert_eq!(tracker.peak(), 16);
    Ok(())
}

#[tokio::test]
async fn test_cancellation_stops_hanging_operations() -> Result<()> {
    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_millis(20));

    let (results, errors) = timeout(
        Duration::from_secs(5),
        run_with_cancellation(
            (0..8u64).collect::<Vec<u64>>(),
            |x: u64| async move {
                if x % 2 == 0 {
                    return Ok::<u64, anyhow::Error>(x);
                }
                // 完了しない操作
                std::future::pending::<()>().await;
                Ok(x)
            },
            cancel,
        ),
    )
    .await?;

    let errors = errors.expect("odd items are cancelled");
    assert_eq!(errors.indices().collect::<Vec<_>>(), vec![1, 3, 5, 7]);
    assert!(errors.iter().all(|(_, error)| error.is_cancelled()));
    assert_eq!(results, vec![0, 0, 2, 0, 4, 0, 6, 0]);
    Ok(())
}

fn cancel_after(cancel: &CancellationToken, delay: Duration) {
    let trigger = cancel.clone();
    tokio::spawn(async move {
        sleep(delay).await;
        trigger.cancel();
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_blocking_run_waits_for_started_calls() -> Result<()> {
    let finished = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&finished);
    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_millis(20));

    let (results, errors) = run_with_cancellation(
        vec![1u64, 2, 3],
        Blocking::new(move |x: u64| {
            std::thread::sleep(Duration::from_millis(200));
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<u64, anyhow::Error>(x)
        }),
        cancel,
    )
    .await;

    // 全件が開始済みなので、戻った時点で副作用は全て完了している
    assert_eq!(finished.load(Ordering::SeqCst), 3);
    assert_eq!(results, vec![1, 2, 3]);
    assert!(errors.is_none());

    sleep(Duration::from_millis(300)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_blocking_run_skips_pending_items() -> Result<()> {
    let config = DefaultMapConfig::new().with_max_workers(1);
    let mapper = ParallelMapper::new(config, NoOpProgressReporter::new())?;
    let finished = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&finished);
    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_millis(20));

    let (results, errors) = mapper
        .execute_with_cancellation(
            vec![10u64, 20, 30],
            Blocking::new(move |x: u64| {
                std::thread::sleep(Duration::from_millis(100));
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<u64, anyhow::Error>(x + 1)
            }),
            cancel,
        )
        .await;

    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(results, vec![11, 0, 0]);
    let errors = errors.expect("pending items are cancelled");
    assert_eq!(errors.indices().collect::<Vec<_>>(), vec![1, 2]);
    assert!(errors
        .iter()
        .all(|(_, error)| matches!(error, ItemError::Cancelled)));

    // 戻った後に実行される処理はない
    sleep(Duration::from_millis(250)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    Ok(())
}
