use crate::utils::error::{ReelError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ReelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ReelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ReelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 只接受 `video/*` 類型的媒體
pub fn validate_media_type(mime_type: &str) -> Result<()> {
    if !mime_type.to_ascii_lowercase().starts_with("video/") {
        return Err(ReelError::upload_rejected(format!(
            "'{}' is not a video file type",
            mime_type
        )));
    }
    Ok(())
}

/// 檔案大小必須嚴格小於上限
pub fn validate_file_size(size: u64, max_bytes: u64) -> Result<()> {
    if size >= max_bytes {
        return Err(ReelError::upload_rejected(format!(
            "file is {} bytes, limit is {} bytes",
            size, max_bytes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.data_dir", "./data").is_ok());
        assert!(validate_path("storage.data_dir", "").is_err());
        assert!(validate_path("storage.data_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("upload.chunk_size", 5, 1).is_ok());
        assert!(validate_positive_number("upload.chunk_size", 0, 1).is_err());
    }

    #[test]
    fn test_validate_media_type() {
        assert!(validate_media_type("video/mp4").is_ok());
        assert!(validate_media_type("Video/QuickTime").is_ok());
        assert!(validate_media_type("image/png").is_err());
        assert!(validate_media_type("application/octet-stream").is_err());
    }

    #[test]
    fn test_validate_file_size_boundary() {
        assert!(validate_file_size(99, 100).is_ok());
        assert!(validate_file_size(100, 100).is_err());
        assert!(validate_file_size(101, 100).is_err());
    }
}
