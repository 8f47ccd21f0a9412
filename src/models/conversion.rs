use std::path::{Path, PathBuf};
use chrono::{DateTime, Local};
use crate::config::config::OverwritePolicy;

/// 單一檔案的轉換結果
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success { output: PathBuf },
    /// 目的檔已存在且策略為 skip
    Skipped { output: PathBuf },
    Failure { reason: String },
}

#[derive(Clone, Debug)]
pub struct BatchInput {
    pub files: Vec<PathBuf>,
    pub overwrite: OverwritePolicy,
}

/// 批次轉換完成後的彙總
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
    pub cancelled: bool,
    pub failures: Vec<(PathBuf, String)>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl BatchOutcome {
    pub fn new(started_at: DateTime<Local>) -> Self {
        BatchOutcome {
            success_count: 0,
            error_count: 0,
            skipped_count: 0,
            cancelled: false,
            failures: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    pub fn processed(&self) -> usize {
        self.success_count + self.error_count + self.skipped_count
    }

    pub fn record(&mut self, path: &Path, result: &ConversionResult) {
        match result {
            ConversionResult::Success { .. } => self.success_count += 1,
            ConversionResult::Skipped { .. } => self.skipped_count += 1,
            ConversionResult::Failure { reason } => {
                self.error_count += 1;
                self.failures.push((path.to_path_buf(), reason.clone()));
            }
        }
    }

    /// 完成後顯示給使用者的狀態文字
    pub fn summary(&self) -> String {
        let mut msg = format!("完成！成功：{}，失敗：{}", self.success_count, self.error_count);
        if self.skipped_count > 0 {
            msg.push_str(&format!("，略過：{}", self.skipped_count));
        }
        if self.cancelled {
            msg.push_str("（已取消）");
        }
        msg
    }
}

/// 背景執行緒送往控制端的訊息
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started { total: usize },
    ItemStarted { index: usize, total: usize, path: PathBuf, status: String },
    Progress(ProgressUpdate),
    Finished(BatchOutcome),
}

#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub processed: usize,
    pub total: usize,
    pub path: PathBuf,
    pub result: ConversionResult,
    pub status: String,
}

impl ProgressUpdate {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 / self.total as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
}

/// 控制端持有的進度與狀態顯示
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    pub fraction: f64,
    pub status: String,
}
