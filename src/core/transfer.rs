//! Import and export documents for the portfolio collection.
//!
//! Imports are all-or-nothing: any malformed record rejects the whole
//! document. Exports are pretty-printed JSON arrays named with the date.

use crate::domain::model::{Category, NewProject, Project};
use crate::utils::error::{ReelError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_PREFIX: &str = "portfolio-videos";

/// 匯入的單筆紀錄，`id` 缺少時由 store 產生
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedProject {
    pub id: Option<u64>,
    pub project: NewProject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImport {
    id: Option<u64>,
    title: String,
    video_url: String,
    #[serde(default)]
    client: Option<String>,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
}

pub fn parse_import_str(text: &str) -> Result<Vec<ImportedProject>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ReelError::import_rejected(format!("document is not valid JSON: {}", e)))?;
    parse_import(value)
}

pub fn parse_import(value: Value) -> Result<Vec<ImportedProject>> {
    let Value::Array(items) = value else {
        return Err(ReelError::import_rejected(
            "expected a JSON array of projects",
        ));
    };

    // 先驗證全部，再轉換；任何一筆失敗都不匯入
    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            return Err(ReelError::import_rejected(format!(
                "entry {} is not an object",
                index
            )));
        };
        for field in ["title", "videoUrl"] {
            let present = obj
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(ReelError::import_rejected(format!(
                    "entry {} is missing a non-empty '{}'",
                    index, field
                )));
            }
        }
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawImport = serde_json::from_value(item).map_err(|e| {
                ReelError::import_rejected(format!("entry {} is malformed: {}", index, e))
            })?;
            Ok(ImportedProject {
                id: raw.id,
                project: NewProject {
                    title: raw.title,
                    client: raw.client.unwrap_or_default(),
                    category: raw.category.unwrap_or(Category::Uploads),
                    thumbnail: raw.thumbnail.unwrap_or_default(),
                    video_url: raw.video_url,
                    featured: raw.featured,
                },
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub contents: String,
}

impl ExportDocument {
    pub fn build(projects: &[Project], date: NaiveDate) -> Result<Self> {
        Ok(Self {
            filename: export_filename(date),
            contents: serde_json::to_string_pretty(projects)?,
        })
    }

    /// Writes the document into `dir` and returns the full path.
    pub async fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.contents).await?;
        Ok(path)
    }
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}
