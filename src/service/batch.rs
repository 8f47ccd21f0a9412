use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{info, warn};
use crate::models::conversion::{BatchEvent, BatchInput, BatchOutcome, ConversionResult, ProgressUpdate};
use crate::service::file::{jpg_output_path, resolve_output_path};
use crate::service::traits::i_service::ImageConverterTrait;
use crate::utils::utils::display_name;

/// 批次取消旗標，於每個檔案開始前檢查
#[derive(Clone, Default, Debug)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 依序轉換檔案；單一檔案失敗不會中斷批次
pub struct BatchConverter {
    converter: Arc<dyn ImageConverterTrait>,
}

impl BatchConverter {
    pub fn new(converter: Arc<dyn ImageConverterTrait>) -> Self {
        BatchConverter { converter }
    }

    /// 在目前執行緒上跑完整個批次，進度透過 events 送出
    pub fn convert(&self, input: &BatchInput, events: &Sender<BatchEvent>, cancel: &CancelToken) -> BatchOutcome {
        let total = input.files.len();
        let mut outcome = BatchOutcome::new(Local::now());
        info!("開始批次轉換，共 {} 個檔案，覆寫策略：{}", total, input.overwrite);
        // 控制端可能已離開，送出失敗時忽略
        let _ = events.send(BatchEvent::Started { total });

        for (idx, source) in input.files.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("批次已取消，剩餘 {} 個檔案未處理", total - idx);
                outcome.cancelled = true;
                break;
            }

            let status = format!("轉換中 ({}/{})：{}", idx + 1, total, display_name(source));
            let _ = events.send(BatchEvent::ItemStarted {
                index: idx,
                total,
                path: source.clone(),
                status: status.clone(),
            });

            let result = self.convert_one(source, input);
            if let ConversionResult::Failure { reason } = &result {
                warn!("轉換失敗 {}：{}", source.display(), reason);
            }
            outcome.record(source, &result);

            let _ = events.send(BatchEvent::Progress(ProgressUpdate {
                processed: idx + 1,
                total,
                path: source.clone(),
                result,
                status,
            }));
        }

        outcome.finished_at = Local::now();
        let elapsed = outcome.finished_at - outcome.started_at;
        info!("{}，耗時 {} 毫秒", outcome.summary(), elapsed.num_milliseconds());
        let _ = events.send(BatchEvent::Finished(outcome.clone()));
        outcome
    }

    fn convert_one(&self, source: &Path, input: &BatchInput) -> ConversionResult {
        let dest = jpg_output_path(source);
        let Some(dest) = resolve_output_path(dest.clone(), input.overwrite) else {
            warn!("輸出檔已存在，略過：{}", dest.display());
            return ConversionResult::Skipped { output: dest };
        };
        match self.converter.convert(source, &dest) {
            Ok(()) => ConversionResult::Success { output: dest },
            Err(e) => ConversionResult::Failure { reason: e.to_string() },
        }
    }

    /// 在獨立的背景執行緒啟動批次
    pub fn spawn(&self, input: BatchInput, cancel: CancelToken) -> io::Result<BatchHandle> {
        let (event_tx, event_rx) = unbounded::<BatchEvent>();
        let batch = BatchConverter { converter: Arc::clone(&self.converter) };
        let worker = thread::Builder::new()
            .name("heic-batch".to_string())
            .spawn(move || batch.convert(&input, &event_tx, &cancel))?;
        Ok(BatchHandle { events: event_rx, worker: Some(worker) })
    }
}

/// 控制端持有的背景批次把手
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    worker: Option<JoinHandle<BatchOutcome>>,
}

impl BatchHandle {
    /// 非阻塞取得下一則訊息；Disconnected 代表背景執行緒已結束
    pub fn try_recv(&self) -> Result<BatchEvent, TryRecvError> {
        self.events.try_recv()
    }

    /// 阻塞等待下一則訊息，背景執行緒結束後返回 None
    pub fn recv(&self) -> Option<BatchEvent> {
        self.events.recv().ok()
    }

    pub fn join(&mut self) -> io::Result<BatchOutcome> {
        let worker = self.worker.take()
            .ok_or_else(|| io::Error::other("批次執行緒已被回收"))?;
        worker.join().map_err(|_| io::Error::other("批次執行緒異常終止"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use crate::config::config::OverwritePolicy;

    /// 檔名含有 "bad" 時失敗，並記錄呼叫順序
    #[derive(Default)]
    struct FakeConverter {
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl ImageConverterTrait for FakeConverter {
        fn convert(&self, source: &Path, dest: &Path) -> io::Result<()> {
            self.calls.lock().unwrap().push((source.to_path_buf(), dest.to_path_buf()));
            if source.to_string_lossy().contains("bad") {
                Err(io::Error::other("cannot decode"))
            } else {
                Ok(())
            }
        }
    }

    fn input(names: &[&str]) -> BatchInput {
        BatchInput {
            files: names.iter().map(PathBuf::from).collect(),
            overwrite: OverwritePolicy::Overwrite,
        }
    }

    fn progress_of(events: &[BatchEvent]) -> Vec<(usize, f64)> {
        events.iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(p) => Some((p.processed, p.fraction())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn counts_failures_without_stopping() {
        let fake = Arc::new(FakeConverter::default());
        let batch = BatchConverter::new(fake.clone());
        let (tx, rx) = unbounded();
        let files = ["/p/1.heic", "/p/bad2.heic", "/p/3.HEIC", "/p/bad4.heif", "/p/5.heic"];

        let outcome = batch.convert(&input(&files), &tx, &CancelToken::new());

        assert_eq!(outcome.success_count, 3);
        assert_eq!(outcome.error_count, 2);
        assert!(!outcome.cancelled);
        assert_eq!(outcome.failures[0], (PathBuf::from("/p/bad2.heic"), "cannot decode".to_string()));

        let calls = fake.calls.lock().unwrap();
        let sources: Vec<_> = calls.iter().map(|(s, _)| s.clone()).collect();
        assert_eq!(sources, input(&files).files);
        assert_eq!(calls[2].1, PathBuf::from("/p/3.jpg"));

        let events: Vec<_> = rx.try_iter().collect();
        let progress = progress_of(&events);
        assert_eq!(progress.iter().map(|p| p.0).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(progress.last().unwrap().1, 1.0);
        assert!(matches!(events.first(), Some(BatchEvent::Started { total: 5 })));
        assert!(matches!(events.last(), Some(BatchEvent::Finished(o)) if o.error_count == 2));
    }

    #[test]
    fn status_names_current_item() {
        let batch = BatchConverter::new(Arc::new(FakeConverter::default()));
        let (tx, rx) = unbounded();
        batch.convert(&input(&["/p/a.heic", "/p/b.heic"]), &tx, &CancelToken::new());

        let statuses: Vec<_> = rx.try_iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(p) => Some(p.status),
                _ => None,
            })
            .collect();
        assert_eq!(statuses, vec!["轉換中 (1/2)：a.heic", "轉換中 (2/2)：b.heic"]);
    }

    #[test]
    fn cancelled_token_stops_before_next_item() {
        let fake = Arc::new(FakeConverter::default());
        let batch = BatchConverter::new(fake.clone());
        let (tx, _rx) = unbounded();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = batch.convert(&input(&["/p/a.heic", "/p/b.heic"]), &tx, &cancel);

        assert!(outcome.cancelled);
        assert_eq!(outcome.processed(), 0);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn skip_policy_leaves_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG.heic");
        std::fs::write(&source, b"heic").unwrap();
        std::fs::write(dir.path().join("IMG.jpg"), b"old").unwrap();

        let fake = Arc::new(FakeConverter::default());
        let batch = BatchConverter::new(fake.clone());
        let (tx, _rx) = unbounded();
        let outcome = batch.convert(
            &BatchInput { files: vec![source], overwrite: OverwritePolicy::Skip },
            &tx,
            &CancelToken::new(),
        );

        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.success_count, 0);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn spawned_batch_reports_through_channel() {
        let batch = BatchConverter::new(Arc::new(FakeConverter::default()));
        let mut handle = batch.spawn(input(&["/p/a.heic", "/p/bad.heic"]), CancelToken::new()).unwrap();

        let mut finished = None;
        while let Some(event) = handle.recv() {
            if let BatchEvent::Finished(outcome) = event {
                finished = Some(outcome);
            }
        }
        let joined = handle.join().unwrap();
        let finished = finished.unwrap();
        assert_eq!((finished.success_count, finished.error_count), (1, 1));
        assert_eq!((joined.success_count, joined.error_count), (1, 1));
    }
}
