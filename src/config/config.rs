use clap::{Parser, ValueEnum};
use std::fmt;
use std::io;
use std::path::Path;

#[derive(Parser, Clone, Debug)]
#[command(
    name = "heic_to_jpg",
    about = "將 HEIC/HEIF 圖片批次轉換為 JPG",
    long_about = "一個呼叫系統影像轉換指令（預設為 macOS 內建的 sips）將 HEIC/HEIF 圖片批次轉換為 JPG 的工具。\n可同時指定多個檔案或資料夾，資料夾會遞迴搜尋 .heic/.heif 檔案。JPG 會輸出在原檔旁，原檔不會被修改。\n不帶任何參數執行即進入互動模式。使用 `--help` 查看詳細用法。",
    arg_required_else_help = true
)]
pub struct Cli {
    /// 要轉換的檔案或資料夾
    #[arg(required = true)]
    pub inputs: Vec<String>,
    #[arg(long, default_value = "sips")]
    pub tool: String,
    #[arg(long, value_enum, default_value_t = OverwritePolicy::Overwrite)]
    pub overwrite: OverwritePolicy,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

/// 目的 JPG 已存在時的處理方式
#[derive(Clone, Copy, ValueEnum, PartialEq, Eq, Debug, Default)]
pub enum OverwritePolicy {
    /// 直接覆寫（交由外部指令處理）
    #[default]
    Overwrite,
    /// 略過不轉換
    Skip,
    /// 另取 `name (1).jpg` 形式的新檔名
    Rename,
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverwritePolicy::Overwrite => "overwrite",
            OverwritePolicy::Skip => "skip",
            OverwritePolicy::Rename => "rename",
        };
        f.write_str(name)
    }
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

pub fn validate_tool(tool: &str) -> io::Result<()> {
    if tool.trim().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "轉換指令不可為空"));
    }
    Ok(())
}
