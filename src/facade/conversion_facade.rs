use std::path::{Path, PathBuf};
use std::sync::Arc;
use crossbeam_channel::TryRecvError;
use log::{error, info};
use crate::config::config::OverwritePolicy;
use crate::config::ports::AppConfig;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{BatchEvent, BatchInput, BatchOutcome, BatchState, ProgressState};
use crate::models::error::SelectionError;
use crate::models::file::{FolderScanInput, FolderSelection};
use crate::service::batch::{BatchConverter, BatchHandle, CancelToken};
use crate::service::selection::PendingSet;
use crate::service::traits::i_service::{FileServiceTrait, ImageConverterTrait};

/// 控制端狀態的唯一持有者；背景批次只透過訊息更新它
pub struct ConversionFacade {
    file_service: Box<dyn FileServiceTrait>,
    batch_converter: BatchConverter,
    overwrite: OverwritePolicy,
    pending: PendingSet,
    state: BatchState,
    progress: ProgressState,
    batch: Option<BatchHandle>,
    cancel: CancelToken,
    last_outcome: Option<BatchOutcome>,
}

impl ConversionFacade {
    pub fn new(
        config: &AppConfig,
        file_service: Box<dyn FileServiceTrait>,
        converter: Arc<dyn ImageConverterTrait>,
    ) -> Self {
        ConversionFacade {
            file_service,
            batch_converter: BatchConverter::new(converter),
            overwrite: config.overwrite,
            pending: PendingSet::new(),
            state: BatchState::Idle,
            progress: ProgressState { fraction: 0.0, status: "準備".to_string() },
            batch: None,
            cancel: CancelToken::new(),
            last_outcome: None,
        }
    }

    fn ensure_not_running(&self) -> Result<(), SelectionError> {
        if self.state == BatchState::Running {
            return Err(SelectionError::BatchRunning);
        }
        Ok(())
    }

    fn apply(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Started { total } => {
                self.progress.fraction = 0.0;
                self.progress.status = format!("開始轉換 {} 個檔案", total);
            }
            BatchEvent::ItemStarted { status, .. } => {
                self.progress.status = status.clone();
            }
            BatchEvent::Progress(update) => {
                self.progress.fraction = update.fraction();
                self.progress.status = update.status.clone();
            }
            BatchEvent::Finished(outcome) => {
                if let Some(mut handle) = self.batch.take() {
                    if let Err(e) = handle.join() {
                        error!("回收批次執行緒失敗：{}", e);
                    }
                }
                self.progress.status = outcome.summary();
                self.last_outcome = Some(outcome.clone());
                self.reset_after_batch();
            }
        }
    }

    // 背景執行緒未送出 Finished 就結束
    fn abandon_batch(&mut self) {
        if let Some(mut handle) = self.batch.take() {
            match handle.join() {
                Ok(outcome) => {
                    self.progress.status = outcome.summary();
                    self.last_outcome = Some(outcome);
                }
                Err(e) => {
                    error!("批次異常結束：{}", e);
                    self.progress.status = format!("批次異常結束：{}", e);
                }
            }
        }
        self.reset_after_batch();
    }

    fn reset_after_batch(&mut self) {
        self.pending.clear();
        self.progress.fraction = 0.0;
        self.state = BatchState::Completed;
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn add_files(&mut self, files: Vec<PathBuf>) -> Result<usize, SelectionError> {
        self.ensure_not_running()?;
        let added = self.pending.add_files(files);
        if added > 0 {
            self.progress.status = format!("共 {} 個檔案等待中", self.pending.len());
            info!("新增 {} 個檔案，{}", added, self.progress.status);
        }
        Ok(added)
    }

    fn select_folder(&mut self, root: &Path) -> Result<FolderSelection, SelectionError> {
        self.ensure_not_running()?;
        let output = self.file_service.scan_folder(FolderScanInput { root: root.to_path_buf() })?;
        if output.files.is_empty() {
            info!("資料夾 {} 中沒有 HEIC 檔案", root.display());
            return Ok(FolderSelection::Empty);
        }
        let found = output.files.len();
        let added = self.add_files(output.files)?;
        Ok(FolderSelection::Added { found, added })
    }

    fn start_conversion(&mut self) -> Result<usize, SelectionError> {
        self.ensure_not_running()?;
        if self.pending.is_empty() {
            return Err(SelectionError::NoFilesSelected);
        }
        let input = BatchInput {
            files: self.pending.snapshot(),
            overwrite: self.overwrite,
        };
        let total = input.files.len();
        self.cancel = CancelToken::new();
        self.last_outcome = None;
        let handle = self.batch_converter.spawn(input, self.cancel.clone())?;
        self.batch = Some(handle);
        self.state = BatchState::Running;
        Ok(total)
    }

    fn poll_events(&mut self) -> Vec<BatchEvent> {
        let mut applied = Vec::new();
        loop {
            let next = match &self.batch {
                Some(handle) => handle.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => {
                    self.apply(&event);
                    applied.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.abandon_batch();
                    break;
                }
            }
        }
        applied
    }

    fn wait_event(&mut self) -> Option<BatchEvent> {
        let next = self.batch.as_ref()?.recv();
        match next {
            Some(event) => {
                self.apply(&event);
                Some(event)
            }
            None => {
                self.abandon_batch();
                None
            }
        }
    }

    fn cancel(&self) {
        if self.state == BatchState::Running {
            info!("要求取消目前批次");
            self.cancel.cancel();
        }
    }

    fn pending(&self) -> &[PathBuf] {
        self.pending.files()
    }

    fn state(&self) -> BatchState {
        self.state
    }

    fn progress(&self) -> &ProgressState {
        &self.progress
    }

    fn last_outcome(&self) -> Option<&BatchOutcome> {
        self.last_outcome.as_ref()
    }
}
