use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("請先選擇要轉換的檔案")]
    NoFilesSelected,
    #[error("已有批次轉換正在執行")]
    BatchRunning,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<SelectionError> for io::Error {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::Io(e) => e,
            SelectionError::NoFilesSelected => io::Error::new(io::ErrorKind::InvalidInput, err.to_string()),
            SelectionError::BatchRunning => io::Error::new(io::ErrorKind::WouldBlock, err.to_string()),
        }
    }
}
