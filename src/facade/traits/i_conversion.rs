use std::path::{Path, PathBuf};
use crate::models::conversion::{BatchEvent, BatchOutcome, BatchState, ProgressState};
use crate::models::error::SelectionError;
use crate::models::file::FolderSelection;

// Facade 接口，負責協調檔案選擇與批次轉換流程
pub trait ConversionFacadeTrait: Send {
    /// 加入使用者選擇的檔案
    /// # 回傳
    /// - 成功時返回新增的檔案數（重複者不計）；批次執行中返回 BatchRunning
    fn add_files(&mut self, files: Vec<PathBuf>) -> Result<usize, SelectionError>;

    /// 遞迴搜尋資料夾並加入找到的 HEIC 檔案
    /// # 回傳
    /// - 找不到 HEIC 時返回 FolderSelection::Empty，待轉換清單不變
    fn select_folder(&mut self, root: &Path) -> Result<FolderSelection, SelectionError>;

    /// 在背景執行緒啟動批次轉換
    /// # 回傳
    /// - 成功時返回本批次的檔案數；清單為空時返回 NoFilesSelected
    fn start_conversion(&mut self) -> Result<usize, SelectionError>;

    /// 取出並套用目前已到達的所有訊息，不會阻塞
    fn poll_events(&mut self) -> Vec<BatchEvent>;

    /// 阻塞等待並套用下一則訊息；沒有執行中的批次時返回 None
    fn wait_event(&mut self) -> Option<BatchEvent>;

    /// 要求目前批次在下一個檔案前停止
    fn cancel(&self);

    fn pending(&self) -> &[PathBuf];
    fn state(&self) -> BatchState;
    fn progress(&self) -> &ProgressState;
    fn last_outcome(&self) -> Option<&BatchOutcome>;
}
