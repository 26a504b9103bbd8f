//! 並列マップ実行基盤
//!
//! 入力列の全要素にユーザー操作を並列適用し、入力順を保った出力と、
//! 失敗したアイテムをインデックス付きで集約した `ErrorMap` を返す。
//!
//! ```no_run
//! # async fn example() {
//! let (lengths, errors) = parmap::run(vec!["a", "bb"], |s: &'static str| async move {
//!     Ok::<usize, std::io::Error>(s.len())
//! })
//! .await;
//!
//! assert_eq!(lengths, vec![1, 2]);
//! assert!(errors.is_none());
//! # }
//! ```

pub mod core;
pub mod engine;
pub mod services;
pub mod telemetry;

pub use crate::core::{
    ErrorMap, IndexedError, ItemError, ItemOutcome, JoinedError, MapConfig, MapError, MapOutput,
    MapResult, MapSummary, Operation, ProgressReporter, Tagged,
};
pub use crate::engine::{
    create_default_mapper, create_quiet_mapper, run, run_blocking, run_with_cancellation,
    ParallelMapper,
};
pub use crate::services::{Blocking, DefaultMapConfig, NoOpProgressReporter, TracingProgressReporter};

// キャンセル用トークンを利用側が追加依存なしで使えるように再エクスポート
pub use tokio_util::sync::CancellationToken;
