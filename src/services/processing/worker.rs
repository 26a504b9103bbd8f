// Worker - 単一アイテム処理機能

use crate::core::{ItemError, ItemOutcome, Operation, Tagged};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio_util::sync::CancellationToken;

/// 単一アイテムの処理
///
/// 結果は成功・失敗のどちらか一方のみになる。操作内のパニックは捕捉して
/// `ItemError::Panicked` に変換し、キャンセル済みなら操作を呼ばずに
/// `ItemError::Cancelled` を返す。実行中のキャンセルは
/// `Operation::interruptible` が `true` の操作だけを中断する。
pub async fn process_single_item<IN, OUT, O>(
    operation: &O,
    input: Tagged<IN>,
    cancel: &CancellationToken,
) -> ItemOutcome<OUT, O::Error>
where
    IN: Send + 'static,
    OUT: Send + 'static,
    O: Operation<IN, OUT> + ?Sized,
{
    let Tagged { index, value } = input;

    if cancel.is_cancelled() {
        return ItemOutcome::failure(index, ItemError::Cancelled);
    }

    let guarded = AssertUnwindSafe(operation.apply(value)).catch_unwind();

    let outcome = if operation.interruptible() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return ItemOutcome::failure(index, ItemError::Cancelled),
            outcome = guarded => outcome,
        }
    } else {
        // 開始済みの処理は中断できないので結果まで待つ
        guarded.await
    };

    match outcome {
        Ok(Ok(result)) => ItemOutcome::success(index, result),
        Ok(Err(error)) => ItemOutcome::failure(index, ItemError::Operation(error)),
        Err(payload) => {
            ItemOutcome::failure(index, ItemError::Panicked(panic_message(payload.as_ref())))
        }
    }
}

/// パニックペイロードからメッセージを取り出す
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
