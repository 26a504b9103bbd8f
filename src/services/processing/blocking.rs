// Blocking - 同期関数をOperationとして扱うアダプター

use crate::core::Operation;
use async_trait::async_trait;
use std::sync::Arc;

/// 同期関数 `Fn(IN) -> Result<OUT, E>` をtokioのブロッキングプールで実行する
///
/// 関数内のパニックはワーカー側で捕捉できるよう、そのまま再送出される。
/// ブロッキングプールのスレッドは中断できないため、キャンセルは開始前の
/// アイテムにのみ効き、開始済みの呼び出しは完了を待って結果を記録する。
pub struct Blocking<F> {
    func: Arc<F>,
}

impl<F> Blocking<F> {
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

impl<F> Clone for Blocking<F> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

#[async_trait]
impl<IN, OUT, E, F> Operation<IN, OUT> for Blocking<F>
where
    IN: Send + 'static,
    OUT: Send + 'static,
    E: Send + 'static,
    F: Fn(IN) -> Result<OUT, E> + Send + Sync + 'static,
{
    type Error = E;

    async fn apply(&self, input: IN) -> Result<OUT, E> {
        let func = Arc::clone(&self.func);

        match tokio::task::spawn_blocking(move || func(input)).await {
            Ok(result) => result,
            Err(join_error) => match join_error.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(join_error) => panic!("blocking operation did not complete: {join_error}"),
            },
        }
    }

    fn interruptible(&self) -> bool {
        false
    }
}
