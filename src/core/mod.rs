// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod error_map;
pub mod traits;
pub mod types;

// 公開API - 明示的にエクスポートして曖昧性を回避
pub use error::{ItemError, MapError, MapResult};
pub use error_map::{ErrorMap, IndexedError, JoinedError};
pub use traits::{MapConfig, Operation, ProgressReporter};
pub use types::{ItemOutcome, MapOutput, MapSummary, Tagged};
