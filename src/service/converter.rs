use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Output};
use log::{debug, warn};
use crate::service::traits::i_service::ImageConverterTrait;

/// 呼叫 `<tool> -s format jpeg <source> --out <dest>` 的轉換器（macOS sips 介面）
pub struct SipsConverter {
    tool: String,
}

impl SipsConverter {
    pub fn new(tool: impl Into<String>) -> Self {
        SipsConverter { tool: tool.into() }
    }

    pub fn command_args(source: &Path, dest: &Path) -> Vec<OsString> {
        vec![
            "-s".into(),
            "format".into(),
            "jpeg".into(),
            source.as_os_str().to_os_string(),
            "--out".into(),
            dest.as_os_str().to_os_string(),
        ]
    }

    /// 確認指令存在於 PATH，找不到時僅記錄警告
    pub fn preflight(&self) -> bool {
        match which::which(&self.tool) {
            Ok(path) => {
                debug!("使用轉換指令：{}", path.display());
                true
            }
            Err(_) => {
                warn!("找不到轉換指令 '{}'，所有檔案都可能轉換失敗", self.tool);
                false
            }
        }
    }
}

impl ImageConverterTrait for SipsConverter {
    fn convert(&self, source: &Path, dest: &Path) -> io::Result<()> {
        let args = Self::command_args(source, dest);
        debug!("執行：{} {:?}", self.tool, args);
        let output = Command::new(&self.tool).args(&args).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(io::Error::other(failure_reason(&output)))
        }
    }
}

// 優先使用 stderr，其次 stdout，最後才是結束碼
fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("轉換指令失敗：{}", output.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sips_argument_order() {
        let args = SipsConverter::command_args(Path::new("/p/IMG.HEIC"), Path::new("/p/IMG.jpg"));
        let expected: Vec<OsString> = ["-s", "format", "jpeg", "/p/IMG.HEIC", "--out", "/p/IMG.jpg"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn missing_tool_is_an_error() {
        let converter = SipsConverter::new("heic-to-jpg-tool-that-does-not-exist");
        assert!(!converter.preflight());
        let result = converter.convert(Path::new("a.heic"), Path::new("a.jpg"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_outcome() {
        let src = Path::new("a.heic");
        let dest = Path::new("a.jpg");
        assert!(SipsConverter::new("true").convert(src, dest).is_ok());

        let err = SipsConverter::new("false").convert(src, dest).unwrap_err();
        assert!(err.to_string().contains("轉換指令失敗"));
    }
}
