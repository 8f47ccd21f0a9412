use std::io;
use crate::config::config::OverwritePolicy;
use crate::config::ports::{AppConfig, ConfigPort};

pub const DEFAULT_TOOL: &str = "sips";

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器（互動模式使用）
pub struct DefaultConfigAdapter {
    inputs: Vec<String>,
}

impl DefaultConfigAdapter {
    pub fn new(inputs: Vec<String>) -> Self {
        DefaultConfigAdapter { inputs }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        Ok(AppConfig {
            inputs: self.inputs.clone(),
            tool: DEFAULT_TOOL.to_string(),
            overwrite: OverwritePolicy::Overwrite, // 與外部指令預設行為一致
            no_progress: false,
            log_level: "info".to_string(),
        })
    }
}
