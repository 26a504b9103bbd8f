// 並列マップ処理に関連するデータ型定義

use super::error::ItemError;
use super::error_map::ErrorMap;

/// 元の位置インデックスと値の組
///
/// 全チャンネルを流れる単位。インデックスが唯一の順序キーとなる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    pub index: usize,
    pub value: T,
}

impl<T> Tagged<T> {
    pub fn new(index: usize, value: T) -> Self {
        Self { index, value }
    }
}

/// 個別アイテムの処理結果（成功か失敗のどちらか一方）
#[derive(Debug)]
pub enum ItemOutcome<OUT, E> {
    Success(Tagged<OUT>),
    Failure(Tagged<ItemError<E>>),
}

impl<OUT, E> ItemOutcome<OUT, E> {
    pub fn success(index: usize, value: OUT) -> Self {
        Self::Success(Tagged::new(index, value))
    }

    pub fn failure(index: usize, error: ItemError<E>) -> Self {
        Self::Failure(Tagged::new(index, error))
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Success(tagged) => tagged.index,
            Self::Failure(tagged) => tagged.index,
        }
    }
}

/// 処理全体のサマリー
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MapSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

impl MapSummary {
    /// 全アイテムが成功したかどうか
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }
}

/// 並列マップの戻り値
///
/// 出力は常に入力と同じ長さで、失敗位置には `OUT::default()` が入る。
/// エラーが1件もなければ `None`。
pub type MapOutput<OUT, E> = (Vec<OUT>, Option<ErrorMap<ItemError<E>>>);
