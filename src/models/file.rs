use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct FolderScanInput {
    pub root: PathBuf,
}

#[derive(Debug)]
pub struct FolderScanOutput {
    pub files: Vec<PathBuf>,
}

/// 資料夾選擇的結果；Empty 為提示訊息，不是錯誤
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderSelection {
    Empty,
    Added { found: usize, added: usize },
}
