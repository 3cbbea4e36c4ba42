use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Import rejected: {reason}")]
    ImportRejected { reason: String },

    #[error("Upload rejected: {reason}")]
    UploadRejected { reason: String },

    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Upload cancelled")]
    UploadCancelled,

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Config,
    Import,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReelError {
    pub fn import_rejected(reason: impl Into<String>) -> Self {
        Self::ImportRejected {
            reason: reason.into(),
        }
    }

    pub fn upload_rejected(reason: impl Into<String>) -> Self {
        Self::UploadRejected {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::SerializationError(_) | Self::ValidationError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Config,
            Self::ImportRejected { .. } => ErrorCategory::Import,
            Self::UploadRejected { .. } | Self::UploadFailed { .. } | Self::UploadCancelled => {
                ErrorCategory::Upload
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者取消不算失敗
            Self::UploadCancelled => ErrorSeverity::Low,
            Self::ImportRejected { .. } | Self::UploadRejected { .. } => ErrorSeverity::Medium,
            Self::UploadFailed { .. }
            | Self::SerializationError(_)
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the data directory exists and is writable",
            ErrorCategory::Data => "Inspect the stored portfolio file for manual edits",
            ErrorCategory::Config => "Fix the configuration file or command-line flags and retry",
            ErrorCategory::Import => {
                "Provide a JSON array where every entry has a non-empty title and videoUrl"
            }
            ErrorCategory::Upload => "Choose a video file below the size limit and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ImportRejected { reason } => format!("Import failed: {}", reason),
            Self::UploadRejected { reason } => format!("Cannot upload this file: {}", reason),
            Self::UploadFailed { reason } => format!("Upload did not complete: {}", reason),
            Self::UploadCancelled => "Upload was cancelled".to_string(),
            Self::IoError(e) => format!("Could not access portfolio files: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReelError>;
