// 結果収集機能
// 出力コンテナとErrorMapをそれぞれ単一タスクで所有するアクター

pub mod collector;

// 公開API
pub use collector::{spawn_error_collector, spawn_result_collector};
