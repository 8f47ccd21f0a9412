use std::io;
use std::path::Path;
use crate::models::file::{FolderScanInput, FolderScanOutput};

// File 服務接口，負責搜尋資料夾
pub trait FileServiceTrait: Send + Sync {
    /// 遞迴搜尋資料夾中的 HEIC/HEIF 檔案
    /// # 參數
    /// - input: 搜尋的根目錄
    /// # 回傳
    /// - 成功時返回符合副檔名的檔案列表（可能為空），根目錄無法讀取時返回 IO 錯誤
    fn scan_folder(&self, input: FolderScanInput) -> io::Result<FolderScanOutput>;
}

// 影像轉換接口，包裝外部轉換指令
pub trait ImageConverterTrait: Send + Sync {
    /// 將 source 轉換為 JPG 並寫入 dest
    /// # 回傳
    /// - 外部指令結束碼為 0 時返回 Ok，否則返回帶有錯誤訊息的 IO 錯誤
    fn convert(&self, source: &Path, dest: &Path) -> io::Result<()>;
}
