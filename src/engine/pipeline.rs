// Pipeline - Producer-Worker-Collector パイプライン
// 配信・並列実行・収集のオーケストレーションと完了バリア

use super::{consumer::spawn_workers, producer::spawn_producer};
use crate::core::{
    ErrorMap, MapConfig, MapError, MapOutput, MapResult, MapSummary, Operation, ProgressReporter,
};
use crate::services::collection::{spawn_error_collector, spawn_result_collector};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// 入力数と設定からワーカー数を決定
///
/// 上限なしの場合はアイテム毎に1ワーカー。
pub(crate) fn worker_count(max_workers: Option<usize>, total: usize) -> usize {
    max_workers.map_or(total, |max| max.min(total)).max(1)
}

/// 並列マップを1回実行する
pub(crate) async fn execute<IN, OUT, O, C, R>(
    inputs: Vec<IN>,
    operation: Arc<O>,
    config: &C,
    reporter: Arc<R>,
    cancel: CancellationToken,
) -> MapOutput<OUT, O::Error>
where
    IN: Send + 'static,
    OUT: Default + Send + 'static,
    O: Operation<IN, OUT>,
    O::Error: Display,
    C: MapConfig + ?Sized,
    R: ProgressReporter + ?Sized + 'static,
{
    let start_time = Instant::now();
    let total = inputs.len();
    reporter.report_started(total).await;

    if total == 0 {
        reporter
            .report_completed(&MapSummary {
                total: 0,
                succeeded: 0,
                failed: 0,
                elapsed_ms: elapsed_ms(start_time),
            })
            .await;
        return (Vec::new(), None);
    }

    let buffer_size = config.channel_buffer_size().max(1);
    let workers = worker_count(config.max_workers(), total);
    debug!(total, workers, buffer_size, "Dispatching parallel map");

    // チャンネル構築
    let (input_tx, input_rx) = mpsc::channel(buffer_size);
    let (result_tx, result_rx) = mpsc::channel(buffer_size);
    let (error_tx, error_rx) = mpsc::channel(buffer_size);
    let (done_tx, mut done_rx) = mpsc::channel::<()>(buffer_size);

    // Collector起動
    let result_handle = spawn_result_collector(result_rx, total, done_tx.clone());
    let error_handle = spawn_error_collector(error_rx, done_tx, Arc::clone(&reporter));

    // Worker起動（送信側はワーカーだけが保持する）
    let worker_handles = spawn_workers(workers, operation, input_rx, result_tx, error_tx, cancel);

    // Producer起動
    let producer_handle = spawn_producer(inputs, input_tx);

    // 完了バリア: 成功・失敗を問わず1アイテムにつき1シグナル
    let mut completed = 0;
    while completed < total {
        if done_rx.recv().await.is_none() {
            error!(completed, total, "Completion channel closed before every item finished");
            break;
        }
        completed += 1;

        if config.enable_progress_reporting() {
            reporter.report_progress(completed, total).await;
        }
    }

    log_task_result("producer", join_task(producer_handle).await);
    for handle in worker_handles {
        log_task_result("worker", join_task(handle).await);
    }

    // Collector停止
    let results = join_collector(result_handle).await;
    let errors = join_collector(error_handle).await;

    let summary = MapSummary {
        total,
        succeeded: completed.saturating_sub(errors.len()),
        failed: errors.len(),
        elapsed_ms: elapsed_ms(start_time),
    };
    reporter.report_completed(&summary).await;

    (results, non_empty(errors))
}

fn non_empty<E>(errors: ErrorMap<E>) -> Option<ErrorMap<E>> {
    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}

fn elapsed_ms(start_time: Instant) -> u64 {
    u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn join_task(handle: JoinHandle<MapResult<()>>) -> MapResult<()> {
    handle.await.map_err(MapError::task)?
}

fn log_task_result(task: &'static str, result: MapResult<()>) {
    if let Err(error) = result {
        error!(task, %error, "Pipeline task failed");
    }
}

// Collectorのパニックは呼び出し元へ伝播させる
async fn join_collector<T>(handle: JoinHandle<T>) -> T {
    match handle.await {
        Ok(state) => state,
        Err(join_error) => match join_error.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            Err(join_error) => panic!("collector task did not complete: {join_error}"),
        },
    }
}
