// 高レベル公開API
// ParallelMapperを簡単に使用できるようにするための便利な関数

use super::ParallelMapper;
use crate::core::{MapOutput, Operation};
use crate::services::{Blocking, DefaultMapConfig, NoOpProgressReporter, TracingProgressReporter};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

/// tracingで進捗を報告するデフォルトエンジン
pub fn create_default_mapper() -> ParallelMapper<DefaultMapConfig, TracingProgressReporter> {
    ParallelMapper::new_unchecked(DefaultMapConfig::default(), TracingProgressReporter::new())
}

/// 進捗を報告しない静音エンジン
pub fn create_quiet_mapper() -> ParallelMapper<DefaultMapConfig, NoOpProgressReporter> {
    ParallelMapper::new_unchecked(DefaultMapConfig::default(), NoOpProgressReporter::new())
}

/// 全入力に非同期操作を並列適用する
///
/// アイテム毎に1ワーカーを起動し、入力順を保った出力と、失敗があれば
/// インデックス付きの `ErrorMap` を返す。失敗位置の出力は `OUT::default()`。
///
/// タイムアウトは設けていない。完了しない操作があるとこの関数も戻らない。
/// 中断が必要な場合は [`run_with_cancellation`] を使う。
pub async fn run<IN, OUT, O>(inputs: Vec<IN>, operation: O) -> MapOutput<OUT, O::Error>
where
    IN: Send + 'static,
    OUT: Default + Send + 'static,
    O: Operation<IN, OUT>,
    O::Error: Display,
{
    create_quiet_mapper().execute(inputs, operation).await
}

/// 同期関数版の [`run`]（tokioのブロッキングプールで実行）
///
/// キャンセルと組み合わせる場合、開始済みの呼び出しは中断されず完了まで待つ。
pub async fn run_blocking<IN, OUT, E, F>(inputs: Vec<IN>, func: F) -> MapOutput<OUT, E>
where
    IN: Send + 'static,
    OUT: Default + Send + 'static,
    E: Display + Send + 'static,
    F: Fn(IN) -> Result<OUT, E> + Send + Sync + 'static,
{
    create_quiet_mapper()
        .execute(inputs, Blocking::new(func))
        .await
}

/// キャンセル可能な [`run`]
pub async fn run_with_cancellation<IN, OUT, O>(
    inputs: Vec<IN>,
    operation: O,
    cancel: CancellationToken,
) -> MapOutput<OUT, O::Error>
where
    IN: Send + 'static,
    OUT: Default + Send + 'static,
    O: Operation<IN, OUT>,
    O::Error: Display,
{
    create_quiet_mapper()
        .execute_with_cancellation(inputs, operation, cancel)
        .await
}
