// ParallelMapper - 依存性注入による並列マップエンジン
// 設定とレポーターをコンストラクタで受け取り、実行毎にパイプラインを組み立てる

use super::pipeline;
use crate::core::{MapConfig, MapOutput, MapResult, Operation, ProgressReporter};
use crate::services::validate_config;
use std::fmt::Display;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 並列マップエンジン
///
/// 実行間で状態は共有しない。出力・ErrorMap・チャンネルは全て
/// `execute` 呼び出し毎に作成され、戻る時点で破棄される。
pub struct ParallelMapper<C, R> {
    config: C,
    reporter: Arc<R>,
}

impl<C, R> ParallelMapper<C, R>
where
    C: MapConfig,
    R: ProgressReporter + 'static,
{
    /// 新しいエンジンを作成（設定は検証される）
    pub fn new(config: C, reporter: R) -> MapResult<Self> {
        validate_config(&config)?;
        Ok(Self::new_unchecked(config, reporter))
    }

    // 既定値のように検証不要な設定専用
    pub(crate) fn new_unchecked(config: C, reporter: R) -> Self {
        Self {
            config,
            reporter: Arc::new(reporter),
        }
    }

    /// 全入力に操作を並列適用する
    ///
    /// 出力は入力と同じ順序・同じ長さで、失敗位置には `OUT::default()` が入る。
    /// 失敗が1件でもあれば `ErrorMap` を返す。タイムアウトは持たないため、
    /// 完了しない操作があると戻らない。
    pub async fn execute<IN, OUT, O>(&self, inputs: Vec<IN>, operation: O) -> MapOutput<OUT, O::Error>
    where
        IN: Send + 'static,
        OUT: Default + Send + 'static,
        O: Operation<IN, OUT>,
        O::Error: Display,
    {
        self.execute_with_cancellation(inputs, operation, CancellationToken::new())
            .await
    }

    /// キャンセル可能な並列適用
    ///
    /// トークンが発火すると、未着手のアイテムと実行中のアイテムは
    /// `ItemError::Cancelled` として記録される。
    pub async fn execute_with_cancellation<IN, OUT, O>(
        &self,
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
        pipeline::execute(
            inputs,
            Arc::new(operation),
            &self.config,
            Arc::clone(&self.reporter),
            cancel,
        )
        .await
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
