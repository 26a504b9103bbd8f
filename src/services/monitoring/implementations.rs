// 進捗監視の具象実装

use crate::core::{MapSummary, ProgressReporter};
use async_trait::async_trait;
use tracing::{debug, info, warn};

const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// tracingによる進捗報告実装
#[derive(Debug, Clone)]
pub struct TracingProgressReporter {
    progress_interval: usize,
}

impl TracingProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 進捗ログを出すアイテム間隔を指定（0は1として扱う）
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    fn should_report(&self, completed: usize, total: usize) -> bool {
        completed % self.progress_interval == 0 || completed == total
    }
}

impl Default for TracingProgressReporter {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[async_trait]
impl ProgressReporter for TracingProgressReporter {
    async fn report_started(&self, total_items: usize) {
        info!(total_items, "Starting parallel map");
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if self.should_report(completed, total) {
            let percentage = if total == 0 {
                100.0
            } else {
                (completed as f64 / total as f64) * 100.0
            };
            debug!(completed, total, "Progress: {percentage:.1}%");
        }
    }

    async fn report_item_failed(&self, index: usize, error: &str) {
        warn!(index, error, "Item failed");
    }

    async fn report_completed(&self, summary: &MapSummary) {
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = summary.elapsed_ms,
            "Parallel map completed"
        );
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize) {
        // 何もしない
    }

    async fn report_progress(&self, _completed: usize, _total: usize) {
        // 何もしない
    }

    fn reports_item_failures(&self) -> bool {
        false
    }

    async fn report_item_failed(&self, _index: usize, _error: &str) {
        // 何もしない
    }

    async fn report_completed(&self, _summary: &MapSummary) {
        // 何もしない
    }
}
