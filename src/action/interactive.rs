use dialoguer::{Confirm, Input, Select};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::action::cli::run_batch;
use crate::config::config::OverwritePolicy;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::error::SelectionError;
use crate::models::file::FolderSelection;
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::service::converter::SipsConverter;
use crate::service::file::FileService;
use crate::utils::utils::{setup_logging, to_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SelectFiles,
    SelectFolder,
    ListPending,
    Convert,
    Quit,
}

pub fn process_interactive_mode() -> io::Result<String> {
    println!("=== HEIC 轉 JPG 轉換器 ===");
    let use_default_config = get_default_config_option()?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        println!("使用預設配置：sips 指令，目的檔已存在時覆寫");
        Box::new(DefaultConfigAdapter::new(Vec::new()))
    } else {
        Box::new(InteractiveConfigAdapter)
    };
    let config = ConfigService::new(config_port).get_config()?;
    setup_logging(&config.log_level)?;

    let converter = SipsConverter::new(config.tool.clone());
    converter.preflight();
    let mut facade = ConversionFacade::new(&config, Box::new(FileService::new()), Arc::new(converter));

    let mut last_summary = "未執行任何轉換".to_string();
    loop {
        match get_menu_choice(facade.pending().len())? {
            MenuChoice::SelectFiles => {
                let files = get_file_paths()?;
                facade.add_files(files).map_err(io::Error::from)?;
                println!("{}", facade.progress().status);
            }
            MenuChoice::SelectFolder => {
                let folder = get_folder_path()?;
                match facade.select_folder(Path::new(&folder)) {
                    Ok(FolderSelection::Empty) => println!("提示：選擇的資料夾中沒有 HEIC 檔案。"),
                    Ok(FolderSelection::Added { .. }) => println!("{}", facade.progress().status),
                    Err(SelectionError::Io(e)) => println!("錯誤：無法讀取資料夾：{}", e),
                    Err(e) => return Err(e.into()),
                }
            }
            MenuChoice::ListPending => {
                for (idx, file) in facade.pending().iter().enumerate() {
                    println!("{:>4}. {}", idx + 1, file.display());
                }
                println!(
                    "狀態：{}（進度 {}%）",
                    facade.progress().status,
                    to_percent(facade.progress().fraction)
                );
            }
            MenuChoice::Convert => match run_batch(&mut facade, config.no_progress) {
                Ok(outcome) => {
                    println!(
                        "轉換已完成。\n成功：{}\n失敗：{}",
                        outcome.success_count, outcome.error_count
                    );
                    last_summary = outcome.summary();
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidInput => println!("警告：{}", e),
                Err(e) => return Err(e),
            },
            MenuChoice::Quit => break,
        }
    }
    Ok(last_summary)
}

pub fn get_default_config_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否使用預設配置？（sips 指令、目的檔已存在時覆寫）")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("預設配置選擇失敗: {}", e)))
}

pub fn get_menu_choice(pending: usize) -> io::Result<MenuChoice> {
    let convert_label = format!("開始轉換（{} 個檔案）", pending);
    let items = [
        "選擇檔案（可多個）",
        "選擇資料夾（HEIC 批次轉換）",
        "檢視待轉換清單",
        convert_label.as_str(),
        "離開",
    ];
    let choice = Select::new()
        .with_prompt("請選擇操作（使用方向鍵選擇，按 Enter 確認）")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("選單選擇失敗: {}", e)))?;

    Ok(match choice {
        0 => MenuChoice::SelectFiles,
        1 => MenuChoice::SelectFolder,
        2 => MenuChoice::ListPending,
        3 => MenuChoice::Convert,
        _ => MenuChoice::Quit,
    })
}

pub fn get_file_paths() -> io::Result<Vec<PathBuf>> {
    let input: String = Input::new()
        .with_prompt("請輸入 HEIC 檔案路徑（多個請以逗號分隔）")
        .validate_with(|input: &String| -> Result<(), String> {
            let missing: Vec<_> = parse_path_list(input).into_iter().filter(|p| !p.is_file()).collect();
            match missing.first() {
                None => Ok(()),
                Some(p) => Err(format!("檔案 '{}' 不存在", p.display())),
            }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(parse_path_list(&input))
}

pub fn get_folder_path() -> io::Result<String> {
    Input::new()
        .with_prompt("請輸入含有 HEIC 檔案的資料夾")
        .validate_with(|input: &String| -> Result<(), String> {
            if Path::new(input).is_dir() { Ok(()) } else { Err(format!("資料夾 '{}' 不存在", input)) }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn get_tool_option() -> io::Result<String> {
    Input::new()
        .with_prompt("輸入轉換指令（預設為 sips）")
        .default("sips".to_string())
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("轉換指令輸入失敗: {}", e)))
}

pub fn get_overwrite_option() -> io::Result<OverwritePolicy> {
    let modes = ["覆寫（預設）", "略過已存在的 JPG", "另存新檔名，例如 IMG (1).jpg"];
    let mode = Select::new()
        .with_prompt("目的 JPG 已存在時（使用方向鍵選擇，按 Enter 確認）")
        .items(&modes)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("覆寫策略選擇失敗: {}", e)))?;

    Ok(match mode {
        0 => OverwritePolicy::Overwrite,
        1 => OverwritePolicy::Skip,
        _ => OverwritePolicy::Rename,
    })
}

pub fn get_no_progress_option() -> io::Result<bool> {
    Ok(false)
}

pub fn get_log_level_option() -> io::Result<String> {
    Ok("info".to_string())
}

/// 以逗號分隔的路徑清單，忽略空白項目
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

// 交互配置適配器
pub struct InteractiveConfigAdapter;

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let tool = get_tool_option()?;
        crate::config::config::validate_tool(&tool)?;
        let overwrite = get_overwrite_option()?;

        Ok(AppConfig {
            inputs: Vec::new(),
            tool,
            overwrite,
            no_progress: get_no_progress_option()?,
            log_level: get_log_level_option()?,
        })
    }
}
