// Producer - 入力配信機能

use crate::core::{MapError, MapResult, Tagged};
use tokio::sync::mpsc;

/// Producer: 入力に位置インデックスを付けて配信
///
/// 全件送信後に送信側をドロップし、入力ストリームを閉じる。
pub fn spawn_producer<IN>(
    inputs: Vec<IN>,
    input_tx: mpsc::Sender<Tagged<IN>>,
) -> tokio::task::JoinHandle<MapResult<()>>
where
    IN: Send + 'static,
{
    tokio::spawn(async move {
        for (index, value) in inputs.into_iter().enumerate() {
            if input_tx.send(Tagged::new(index, value)).await.is_err() {
                return Err(MapError::channel(format!(
                    "入力チャンネルが閉じられました (index: {index})"
                )));
            }
        }
        // input_txをドロップしてチャンネル終了シグナル
        Ok(())
    })
}
