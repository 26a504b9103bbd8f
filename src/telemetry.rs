//! tracingの初期化
//!
//! ライブラリ自体はtracingのイベントを出すだけで、購読者の設定は
//! 利用側（バイナリ・ベンチマーク・テスト）が [`init_tracing`] で行う。

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// グローバルな購読者を設定する
///
/// * `json`: `true` なら1行1JSONで出力
/// * `level`: `RUST_LOG` 未設定時の既定レベル
///
/// 2回目以降の呼び出しは無視される。
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}
