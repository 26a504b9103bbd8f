// Consumer - 並列ワーカー機能

use crate::core::{ItemError, ItemOutcome, MapError, MapResult, Operation, Tagged};
use crate::services::processing::process_single_item;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// 共有入力チャンネル
pub type SharedInput<IN> = Arc<Mutex<mpsc::Receiver<Tagged<IN>>>>;

/// 単一ワーカー
///
/// 入力チャンネルが閉じるまでアイテムを取り出し、結果を成功・失敗の
/// どちらか一方のコレクターへ送る。
pub fn spawn_worker<IN, OUT, O>(
    worker_id: usize,
    operation: Arc<O>,
    input_rx: SharedInput<IN>,
    result_tx: mpsc::Sender<Tagged<OUT>>,
    error_tx: mpsc::Sender<Tagged<ItemError<O::Error>>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<MapResult<()>>
where
    IN: Send + 'static,
    OUT: Send + 'static,
    O: Operation<IN, OUT>,
{
    tokio::spawn(async move {
        let mut processed = 0usize;

        loop {
            // 次の作業を取得
            let input = {
                let mut rx = input_rx.lock().await;
                match rx.recv().await {
                    Some(input) => input,
                    None => break, // チャンネル終了
                }
            };

            let index = input.index;
            let delivered = match process_single_item(operation.as_ref(), input, &cancel).await {
                ItemOutcome::Success(result) => result_tx.send(result).await.is_ok(),
                ItemOutcome::Failure(error) => error_tx.send(error).await.is_ok(),
            };

            if !delivered {
                return Err(MapError::channel(format!(
                    "コレクターチャンネルが閉じられました (worker: {worker_id}, index: {index})"
                )));
            }
            processed += 1;
        }

        debug!(worker_id, processed, "Worker finished");
        Ok(())
    })
}

/// ワーカープール起動
///
/// 全ワーカーが1つの入力チャンネルを共有する。
pub fn spawn_workers<IN, OUT, O>(
    worker_count: usize,
    operation: Arc<O>,
    input_rx: mpsc::Receiver<Tagged<IN>>,
    result_tx: mpsc::Sender<Tagged<OUT>>,
    error_tx: mpsc::Sender<Tagged<ItemError<O::Error>>>,
    cancel: CancellationToken,
) -> Vec<tokio::task::JoinHandle<MapResult<()>>>
where
    IN: Send + 'static,
    OUT: Send + 'static,
    O: Operation<IN, OUT>,
{
    let input_rx = Arc::new(Mutex::new(input_rx));

    (0..worker_count)
        .map(|worker_id| {
            spawn_worker(
                worker_id,
                Arc::clone(&operation),
                Arc::clone(&input_rx),
                result_tx.clone(),
                error_tx.clone(),
                cancel.clone(),
            )
        })
        .collect()
}
