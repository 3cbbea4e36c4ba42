use crate::core::portfolio::PORTFOLIO_KEY;
use crate::core::upload::{UploadSettings, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_UPLOAD_BYTES};
use crate::utils::error::{ReelError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            key: PORTFOLIO_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub media_dir: String,
    pub max_bytes: u64,
    pub chunk_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            media_dir: "./media".to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ReelError::ConfigError {
                message: format!(
                    "Cannot read config file {}: {}",
                    path.as_ref().display(),
                    e
                ),
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReelError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MEDIA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReelError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(&self.export.output_dir)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            media_dir: PathBuf::from(&self.upload.media_dir),
            max_bytes: self.upload.max_bytes,
            chunk_size: self.upload.chunk_size,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_non_empty_string("storage.key", &self.storage.key)?;
        validation::validate_path("upload.media_dir", &self.upload.media_dir)?;
        validation::validate_positive_number("upload.max_bytes", self.upload.max_bytes, 1)?;
        validation::validate_positive_number(
            "upload.chunk_size",
            self.upload.chunk_size as u64,
            1,
        )?;
        validation::validate_path("export.output_dir", &self.export.output_dir)?;
        Ok(())
    }
}
