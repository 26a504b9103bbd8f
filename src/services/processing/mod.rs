// アイテム処理機能
// 単一アイテムの実行と同期関数のアダプター

pub mod blocking;
pub mod worker;

// 公開API
pub use blocking::Blocking;
pub use worker::process_single_item;
