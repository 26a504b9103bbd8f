// 並列マップのトレイト定義
// 全ての抽象化インターフェースを定義

use super::types::MapSummary;
use async_trait::async_trait;
use mockall::automock;
use std::future::Future;

/// 並列マップの設定を抽象化するトレイト
#[automock]
pub trait MapConfig: Send + Sync {
    /// 最大ワーカー数を取得（`None` はアイテム毎に1ワーカー）
    fn max_workers(&self) -> Option<usize>;

    /// チャンネルバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// アイテム毎の進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// MapConfig for Box<dyn MapConfig>
impl MapConfig for Box<dyn MapConfig> {
    fn max_workers(&self) -> Option<usize> {
        self.as_ref().max_workers()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_items: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// アイテム失敗の報告を受け取るかどうか
    ///
    /// `false` の場合、エラーの文字列化と `report_item_failed` の呼び出しを省略する。
    fn reports_item_failures(&self) -> bool {
        true
    }

    /// アイテム失敗時の報告
    async fn report_item_failed(&self, index: usize, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, summary: &MapSummary);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    fn reports_item_failures(&self) -> bool {
        self.as_ref().reports_item_failures()
    }

    async fn report_item_failed(&self, index: usize, error: &str) {
        self.as_ref().report_item_failed(index, error).await
    }

    async fn report_completed(&self, summary: &MapSummary) {
        self.as_ref().report_completed(summary).await
    }
}

/// アイテム毎に実行されるユーザー操作
///
/// `Fn(IN) -> impl Future<Output = Result<OUT, E>>` のクロージャは自動的に実装する。
/// 同期関数は `Blocking` でラップして渡す。
#[async_trait]
pub trait Operation<IN, OUT>: Send + Sync + 'static {
    type Error: Send + 'static;

    async fn apply(&self, input: IN) -> Result<OUT, Self::Error>;

    /// 実行中の `apply` をキャンセル時に中断できるかどうか
    ///
    /// `false` の場合、キャンセルは開始前のアイテムにのみ適用され、
    /// 開始済みの呼び出しは完了まで待って実際の結果を記録する。
    fn interruptible(&self) -> bool {
        true
    }
}

#[async_trait]
impl<IN, OUT, E, F, Fut> Operation<IN, OUT> for F
where
    IN: Send + 'static,
    OUT: Send + 'static,
    E: Send + 'static,
    F: Fn(IN) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<OUT, E>> + Send + 'static,
{
    type Error = E;

    async fn apply(&self, input: IN) -> Result<OUT, E> {
        (self)(input).await
    }
}
