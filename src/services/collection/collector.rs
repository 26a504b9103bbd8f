// Collector - 結果とエラーの収集機能
// 各コレクターは自分の状態を単独で所有し、メッセージ経由でのみ書き込む

use crate::core::{ErrorMap, ProgressReporter, Tagged};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Result Collector: 出力コンテナへの唯一の書き込み手
///
/// 受信した結果をインデックス位置に書き込み、1件毎に完了シグナルを送る。
/// 受信チャンネルが閉じると出力コンテナを返して終了する。
pub fn spawn_result_collector<OUT>(
    mut result_rx: mpsc::Receiver<Tagged<OUT>>,
    length: usize,
    done_tx: mpsc::Sender<()>,
) -> tokio::task::JoinHandle<Vec<OUT>>
where
    OUT: Default + Send + 'static,
{
    tokio::spawn(async move {
        let mut results: Vec<OUT> = std::iter::repeat_with(OUT::default).take(length).collect();

        while let Some(Tagged { index, value }) = result_rx.recv().await {
            match results.get_mut(index) {
                Some(slot) => *slot = value,
                None => warn!(index, length, "Result index out of range"),
            }

            signal_done(&done_tx).await;
        }

        debug!(length, "Result collector finished");
        results
    })
}

/// Error Collector: ErrorMapへの唯一の書き込み手
///
/// 受信したエラーを登録し、レポーターへ通知してから完了シグナルを送る。
/// レポーターが失敗報告を受け取らない場合、エラーは文字列化しない。
pub fn spawn_error_collector<E, R>(
    mut error_rx: mpsc::Receiver<Tagged<E>>,
    done_tx: mpsc::Sender<()>,
    reporter: Arc<R>,
) -> tokio::task::JoinHandle<ErrorMap<E>>
where
    E: Display + Send + 'static,
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut errors = ErrorMap::new();
        let report_failures = reporter.reports_item_failures();

        while let Some(Tagged { index, value }) = error_rx.recv().await {
            if report_failures {
                reporter.report_item_failed(index, &value.to_string()).await;
            }

            if errors.insert(index, value).is_some() {
                warn!(index, "Duplicate error for index");
            }

            signal_done(&done_tx).await;
        }

        debug!(failed = errors.len(), "Error collector finished");
        errors
    })
}

async fn signal_done(done_tx: &mpsc::Sender<()>) {
    // ディスパッチャーが既に待機をやめている場合は受信側が閉じている
    if done_tx.send(()).await.is_err() {
        debug!("Completion channel closed");
    }
}
