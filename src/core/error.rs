// Custom error types for parallel map
// 並列マップ専用のカスタムエラー型定義

use thiserror::Error;

/// 並列マップ基盤そのもののエラー型
///
/// 個々のアイテムの失敗は [`ItemError`] として `ErrorMap` に集約されるため、
/// ここには設定やタスク管理の失敗のみが入る。
#[derive(Error, Debug)]
pub enum MapError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("設定解析エラー: {source}")]
    ConfigParseError {
        #[source]
        source: serde_json::Error,
    },

    #[error("チャンネルエラー: {message}")]
    ChannelError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl MapError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 設定解析エラーの作成
    pub fn config_parse(source: serde_json::Error) -> Self {
        Self::ConfigParseError { source }
    }

    /// チャンネルエラーの作成
    pub fn channel(message: impl Into<String>) -> Self {
        Self::ChannelError {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }
}

/// 並列マップ処理の結果型
pub type MapResult<T> = std::result::Result<T, MapError>;

/// 単一アイテムの失敗理由
///
/// `Operation` はユーザー操作が返したエラーそのもので、表示はそのまま透過する。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemError<E> {
    #[error("{0}")]
    Operation(E),

    #[error("ワーカーがパニックしました: {0}")]
    Panicked(String),

    #[error("キャンセルされました")]
    Cancelled,
}

impl<E> ItemError<E> {
    /// ユーザー操作のエラーを取得
    pub fn as_operation(&self) -> Option<&E> {
        match self {
            Self::Operation(error) => Some(error),
            _ => None,
        }
    }

    /// ユーザー操作のエラーを取り出す
    pub fn into_operation(self) -> Option<E> {
        match self {
            Self::Operation(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_panicked(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
