use crate::core::sync::DEFAULT_BATCH_SIZE;
use crate::core::ConfigProvider;
use crate::domain::model::TicketSortType;
use crate::utils::error::{LottoError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TIMEOUT_SECONDS: u64 = 180;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub sync: Option<SyncConfig>,
    pub report: Option<ReportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_path: String,
    /// 執行前要匯入的彩券檔
    pub import_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub enabled: Option<bool>,
    pub batch_size: Option<usize>,
    pub current_round: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub sort: Option<TicketSortType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// "compact" 或 "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LottoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LottoError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LOTTO_DATA_DIR})，沒設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LottoError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("source.endpoint", &self.source.endpoint)?;
        crate::utils::validation::validate_path("storage.data_path", &self.storage.data_path)?;

        if let Some(import_file) = &self.storage.import_file {
            crate::utils::validation::validate_path("storage.import_file", import_file)?;
        }

        if let Some(timeout) = self.source.timeout_seconds {
            crate::utils::validation::validate_positive_number(
                "source.timeout_seconds",
                timeout as usize,
                1,
            )?;
        }

        if let Some(sync) = &self.sync {
            if let Some(batch_size) = sync.batch_size {
                crate::utils::validation::validate_positive_number("sync.batch_size", batch_size, 1)?;
            }
            if let Some(round) = sync.current_round {
                crate::utils::validation::validate_draw_round("sync.current_round", round)?;
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_ref()) {
            if !crate::utils::logger::LOG_LEVELS.contains(&level.as_str()) {
                return Err(LottoError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!(
                        "Unsupported level. Valid levels: {}",
                        crate::utils::logger::LOG_LEVELS.join(", ")
                    ),
                });
            }
        }

        let valid_formats = ["compact", "json"];
        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_ref()) {
            if !valid_formats.contains(&format.as_str()) {
                return Err(LottoError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.clone(),
                    reason: format!("Unsupported format. Valid formats: {}", valid_formats.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn import_file(&self) -> Option<&str> {
        self.storage.import_file.as_deref()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn data_path(&self) -> &str {
        &self.storage.data_path
    }

    fn current_round(&self) -> Option<i32> {
        self.sync.as_ref().and_then(|s| s.current_round)
    }

    fn sync_enabled(&self) -> bool {
        self.sync.as_ref().and_then(|s| s.enabled).unwrap_or(true)
    }

    fn batch_size(&self) -> usize {
        self.sync
            .as_ref()
            .and_then(|s| s.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn sort_type(&self) -> TicketSortType {
        self.report
            .as_ref()
            .and_then(|r| r.sort)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
