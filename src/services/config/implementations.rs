// 設定管理の具象実装

use crate::core::{MapConfig, MapError, MapResult};
use serde::Deserialize;

const DEFAULT_BUFFER_SIZE: usize = 100;

/// デフォルト設定実装
///
/// 既定ではワーカー数に上限を設けず、アイテム毎に1ワーカーを起動する。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultMapConfig {
    max_workers: Option<usize>,
    buffer_size: usize,
    enable_progress: bool,
}

impl DefaultMapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU数x2を上限とするワーカープール設定
    pub fn cpu_bounded() -> Self {
        Self::default().with_max_workers(num_cpus::get().max(1) * 2)
    }

    /// JSON文字列から設定を読み込み、検証する
    pub fn from_json_str(json: &str) -> MapResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(MapError::config_parse)?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// ワーカー数の上限を外す
    pub fn unbounded(mut self) -> Self {
        self.max_workers = None;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultMapConfig {
    fn default() -> Self {
        Self {
            max_workers: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            enable_progress: true,
        }
    }
}

impl MapConfig for DefaultMapConfig {
    fn max_workers(&self) -> Option<usize> {
        self.max_workers
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

/// 設定値の検証
pub fn validate_config<C: MapConfig + ?Sized>(config: &C) -> MapResult<()> {
    if config.max_workers() == Some(0) {
        return Err(MapError::configuration(
            "ワーカー数は1以上である必要があります",
        ));
    }

    if config.channel_buffer_size() == 0 {
        return Err(MapError::configuration(
            "バッファサイズは1以上である必要があります",
        ));
    }

    Ok(())
}
