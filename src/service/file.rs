use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use log::{debug, warn};
use walkdir::WalkDir;
use crate::config::config::OverwritePolicy;
use crate::models::file::{FolderScanInput, FolderScanOutput};
use crate::service::traits::i_service::FileServiceTrait;

pub const HEIC_EXTENSIONS: &[&str] = &["heic", "heif"];

/// File 服務，負責搜尋 HEIC 檔案並實現 FileServiceTrait
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        FileService
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}

impl FileServiceTrait for FileService {
    fn scan_folder(&self, input: FolderScanInput) -> io::Result<FolderScanOutput> {
        if !input.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("資料夾 '{}' 不存在或不是目錄", input.root.display()),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&input.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("無法讀取項目，跳過：{}", e);
                    continue;
                }
            };
            // 指向檔案的符號連結也要收錄，因此以目標判斷
            if entry.path().is_file() && is_heic_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        debug!("資料夾 {} 中找到 {} 個 HEIC 檔案", input.root.display(), files.len());
        Ok(FolderScanOutput { files })
    }
}

/// 檔名（不分大小寫）以 `.heic` 或 `.heif` 結尾，包含檔名本身就是 `.heic` 的情況
pub fn is_heic_file(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .map(|name| {
            let name = name.to_ascii_lowercase();
            HEIC_EXTENSIONS.iter().any(|ext| name.ends_with(&format!(".{}", ext)))
        })
        .unwrap_or(false)
}

/// 同目錄、同檔名，僅將最後一段副檔名換成 `.jpg`
pub fn jpg_output_path(source: &Path) -> PathBuf {
    source.with_extension("jpg")
}

/// 依覆寫策略決定實際輸出路徑；None 代表應略過
pub fn resolve_output_path(dest: PathBuf, policy: OverwritePolicy) -> Option<PathBuf> {
    if !dest.exists() {
        return Some(dest);
    }
    match policy {
        OverwritePolicy::Overwrite => Some(dest),
        OverwritePolicy::Skip => None,
        OverwritePolicy::Rename => Some(next_free_name(&dest)),
    }
}

fn next_free_name(dest: &Path) -> PathBuf {
    let stem = dest.file_stem().unwrap_or_default().to_string_lossy().to_string();
    let parent = dest.parent().unwrap_or_else(|| Path::new(""));
    let mut n = 1;
    loop {
        let candidate = parent.join(format!("{} ({}).jpg", stem, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
