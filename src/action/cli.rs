use std::io;
use std::path::Path;
use std::sync::Arc;
use clap::Parser;
use log::info;
use crate::action::interactive::process_interactive_mode;
use crate::config::config::{Cli, validate_input_path, validate_tool};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{BatchEvent, BatchOutcome};
use crate::models::file::FolderSelection;
use crate::service::config_service::ConfigService;
use crate::service::converter::SipsConverter;
use crate::service::file::FileService;
use crate::utils::utils::{setup_logging, ProgressManager};

pub fn process_args(args: Vec<String>) -> io::Result<String> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<String> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config_port: Box<dyn ConfigPort> = Box::new(CliConfigAdapter::new(cli.clone()));
    let config_service = ConfigService::new(config_port);
    let config = config_service.get_config()?;

    let conversion_port: Box<dyn ConversionPort> = Box::new(BatchConversionAdapter);
    let output = conversion_port.execute(config.clone())?;

    // 若啟用 --show-config，在轉換後顯示配置
    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    Ok(output)
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        for input in &self.cli.inputs {
            validate_input_path(input)?;
        }
        validate_tool(&self.cli.tool)?;

        Ok(AppConfig {
            inputs: self.cli.inputs.clone(),
            tool: self.cli.tool.clone(),
            overwrite: self.cli.overwrite,
            no_progress: self.cli.no_progress,
            log_level: self.cli.log_level.clone(),
        })
    }
}

// 以 sips 介面執行一次批次轉換
pub struct BatchConversionAdapter;

impl ConversionPort for BatchConversionAdapter {
    fn execute(&self, config: AppConfig) -> io::Result<String> {
        let converter = SipsConverter::new(config.tool.clone());
        converter.preflight();
        let mut facade = ConversionFacade::new(&config, Box::new(FileService::new()), Arc::new(converter));

        let pending = queue_inputs(&mut facade, &config.inputs)?;
        info!("開始轉換，共 {} 個檔案", pending);
        let outcome = run_batch(&mut facade, config.no_progress)?;
        Ok(outcome.summary())
    }
}

/// 資料夾遞迴搜尋，其餘路徑視為直接選擇的檔案
pub fn queue_inputs(facade: &mut dyn ConversionFacadeTrait, inputs: &[String]) -> io::Result<usize> {
    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            match facade.select_folder(path)? {
                FolderSelection::Empty => println!("提示：資料夾 {} 中沒有 HEIC 檔案", path.display()),
                FolderSelection::Added { found, added } => {
                    info!("資料夾 {}：找到 {} 個，新增 {} 個", path.display(), found, added)
                }
            }
        } else {
            facade.add_files(vec![path.to_path_buf()])?;
        }
    }
    Ok(facade.pending().len())
}

/// 啟動背景批次，並在目前執行緒依序套用進度訊息直到完成
pub fn run_batch(facade: &mut dyn ConversionFacadeTrait, no_progress: bool) -> io::Result<BatchOutcome> {
    let total = facade.start_conversion()?;
    let pm = ProgressManager::new(total as u64, no_progress);
    while let Some(event) = facade.wait_event() {
        match &event {
            BatchEvent::Started { .. } => {}
            BatchEvent::ItemStarted { status, .. } => pm.set_status(status),
            BatchEvent::Progress(update) => pm.update(update.processed as u64, &update.status),
            BatchEvent::Finished(outcome) => pm.finish(&outcome.summary()),
        }
    }
    facade.last_outcome()
        .cloned()
        .ok_or_else(|| io::Error::other("批次未回報結果"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use crate::config::config::OverwritePolicy;

    fn config_for(inputs: Vec<String>, tool: &str) -> AppConfig {
        AppConfig {
            inputs,
            tool: tool.to_string(),
            overwrite: OverwritePolicy::Overwrite,
            no_progress: true,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn cli_adapter_rejects_missing_input() {
        let cli = Cli::parse_from(["heic_to_jpg", "/no/such/dir/IMG.heic"]);
        let err = CliConfigAdapter::new(cli).get_config().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn queue_inputs_mixes_files_and_folders() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("album");
        fs::create_dir_all(&sub).unwrap();
        let single = dir.path().join("single.heic");
        fs::write(&single, b"x").unwrap();
        fs::write(sub.join("a.heic"), b"x").unwrap();
        fs::write(sub.join("b.txt"), b"x").unwrap();

        let config = config_for(Vec::new(), "true");
        let mut facade = ConversionFacade::new(&config, Box::new(FileService::new()), Arc::new(SipsConverter::new("true")));
        let inputs = vec![
            single.to_string_lossy().to_string(),
            sub.to_string_lossy().to_string(),
            single.to_string_lossy().to_string(),
        ];
        assert_eq!(queue_inputs(&mut facade, &inputs).unwrap(), 2);
        assert_eq!(facade.pending(), [single, sub.join("a.heic")].as_slice());
    }

    #[test]
    fn run_batch_with_nothing_selected_is_invalid_input() {
        let config = config_for(Vec::new(), "true");
        let mut facade = ConversionFacade::new(&config, Box::new(FileService::new()), Arc::new(SipsConverter::new("true")));
        let err = run_batch(&mut facade, true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn adapter_runs_external_tool_per_file() {
        let dir = tempdir().unwrap();
        for name in ["a.heic", "b.HEIF"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let inputs = vec![dir.path().to_string_lossy().to_string()];

        let ok = BatchConversionAdapter.execute(config_for(inputs.clone(), "true")).unwrap();
        assert_eq!(ok, "完成！成功：2，失敗：0");

        let failed = BatchConversionAdapter.execute(config_for(inputs, "false")).unwrap();
        assert_eq!(failed, "完成！成功：0，失敗：2");
    }
}
