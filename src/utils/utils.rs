use std::io;
use std::path::Path;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌初始化失敗: {}", e)))
}

/// 顯示用的檔名
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string()
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} ({percent}%) ETA: {eta_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            pb.set_style(style);
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    pub fn set_status(&self, status: &str) {
        if self.no_progress {
            return;
        }
        self.pb.set_message(status.to_string());
    }

    pub fn update(&self, processed: u64, status: &str) {
        if self.no_progress {
            return;
        }
        self.pb.set_message(status.to_string());
        self.pb.set_position(processed);
    }

    pub fn finish(&self, summary: &str) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        self.pb.finish_with_message(format!("{}，耗時 {:.1} 秒", summary, elapsed));
    }
}

/// 0.0–1.0 的進度換算為百分比
pub fn to_percent(fraction: f64) -> f64 {
    (fraction.clamp(0.0, 1.0) * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/a/b/IMG_0001.HEIC")), "IMG_0001.HEIC");
        assert_eq!(display_name(Path::new("plain.heic")), "plain.heic");
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(to_percent(0.4), 40.0);
        assert_eq!(to_percent(1.5), 100.0);
        assert_eq!(to_percent(-1.0), 0.0);
    }

    #[test]
    fn hidden_progress_ignores_updates() {
        let pm = ProgressManager::new(3, true);
        pm.update(1, "轉換中");
        pm.finish("完成");
    }
}
