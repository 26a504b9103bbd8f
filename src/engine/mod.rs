// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod consumer;
pub mod mapper;
mod pipeline; // ParallelMapper内部でのみ使用
pub mod producer;

// 公開API - 主要エンジンクラス
pub use api::{
    create_default_mapper, create_quiet_mapper, run, run_blocking, run_with_cancellation,
};
pub use mapper::ParallelMapper;
