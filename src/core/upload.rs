//! Media upload: copies a video into the media directory in chunks,
//! reporting progress over a channel until a terminal outcome.
//!
//! Validation happens in [`Uploader::start`] before any task is spawned, so
//! a rejected file never touches the media directory.

use crate::domain::model::{Category, NewProject};
use crate::utils::error::{ReelError, Result};
use crate::utils::validation::{validate_file_size, validate_media_type};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use url::Url;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;
pub const CLIENT_PLACEHOLDER: &str = "Your Client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: PathBuf,
}

impl MediaFile {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ReelError::upload_rejected("file has no usable name"))?
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
            path: path.to_path_buf(),
        })
    }

    /// 檔名去掉副檔名作為標題
    pub fn title(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Progress { transferred: u64, total: u64 },
    Completed(NewProject),
    Failed(String),
    Cancelled,
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Progress { .. })
    }

    pub fn percent(&self) -> Option<u8> {
        match self {
            &UploadEvent::Progress { transferred, total } if total > 0 => {
                Some(((transferred.min(total) * 100) / total) as u8)
            }
            UploadEvent::Progress { .. } => Some(100),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub media_dir: PathBuf,
    pub max_bytes: u64,
    pub chunk_size: usize,
}

impl UploadSettings {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Uploader {
    settings: UploadSettings,
}

impl Uploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Checks type and size without starting a transfer.
    pub fn check(&self, file: &MediaFile) -> Result<()> {
        validate_media_type(&file.mime_type)?;
        validate_file_size(file.size, self.settings.max_bytes)
    }

    /// Validates `file` and spawns the transfer. Must run inside a tokio runtime.
    pub fn start(&self, file: MediaFile) -> Result<UploadHandle> {
        if let Err(e) = self.check(&file) {
            tracing::warn!("🚫 Upload of '{}' rejected: {}", file.name, e);
            return Err(e);
        }

        tracing::info!("⬆️ Uploading '{}' ({} bytes)", file.name, file.size);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let settings = self.settings.clone();
        let task = tokio::spawn(run_upload(file, settings, event_tx, cancel_rx));

        Ok(UploadHandle {
            events: event_rx,
            cancel: cancel_tx,
            task: Some(task),
        })
    }
}

/// Handle to a running upload. Dropping it cancels the transfer.
pub struct UploadHandle {
    events: mpsc::UnboundedReceiver<UploadEvent>,
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<Result<NewProject>>>,
}

impl UploadHandle {
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        self.events.recv().await
    }

    pub async fn finish(mut self) -> Result<NewProject> {
        let Some(task) = self.task.take() else {
            return Err(ReelError::UploadFailed {
                reason: "upload already finished".to_string(),
            });
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ReelError::UploadFailed {
                reason: format!("upload task aborted: {}", e),
            }),
        }
    }
}

impl Drop for UploadHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.send_replace(true);
        }
    }
}

async fn run_upload(
    file: MediaFile,
    settings: UploadSettings,
    events: mpsc::UnboundedSender<UploadEvent>,
    mut cancel: watch::Receiver<bool>,
) -> Result<NewProject> {
    let outcome = transfer(&file, &settings, &events, &mut cancel).await;

    // 接收端可能已關閉，送不出去不算錯
    let terminal = match &outcome {
        Ok(project) => {
            tracing::info!("✅ Upload of '{}' completed", file.name);
            UploadEvent::Completed(project.clone())
        }
        Err(ReelError::UploadCancelled) => {
            tracing::info!("Upload of '{}' cancelled", file.name);
            UploadEvent::Cancelled
        }
        Err(e) => {
            tracing::error!("❌ Upload of '{}' failed: {}", file.name, e);
            UploadEvent::Failed(e.to_string())
        }
    };
    let _ = events.send(terminal);

    outcome
}

async fn transfer(
    file: &MediaFile,
    settings: &UploadSettings,
    events: &mpsc::UnboundedSender<UploadEvent>,
    cancel: &mut watch::Receiver<bool>,
) -> Result<NewProject> {
    tokio::fs::create_dir_all(&settings.media_dir).await?;
    let mut source = File::open(&file.path).await?;
    let (dest_path, mut dest) = create_destination(&settings.media_dir, &file.name).await?;

    let copied = copy_chunks(&mut source, &mut dest, file, settings, events, cancel).await;
    drop(dest);

    if let Err(e) = copied {
        let _ = tokio::fs::remove_file(&dest_path).await;
        return Err(e);
    }

    let stored = tokio::fs::canonicalize(&dest_path).await?;
    let media_ref = Url::from_file_path(&stored)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| stored.display().to_string());

    Ok(NewProject {
        title: file.title(),
        client: CLIENT_PLACEHOLDER.to_string(),
        category: Category::Uploads,
        thumbnail: media_ref.clone(),
        video_url: media_ref,
        featured: None,
    })
}

async fn copy_chunks(
    source: &mut File,
    dest: &mut File,
    file: &MediaFile,
    settings: &UploadSettings,
    events: &mpsc::UnboundedSender<UploadEvent>,
    cancel: &mut watch::Receiver<bool>,
) -> Result<()> {
    let mut buf = vec![0u8; settings.chunk_size.max(1)];
    let mut transferred = 0u64;

    loop {
        if *cancel.borrow_and_update() {
            return Err(ReelError::UploadCancelled);
        }

        let read = tokio::select! {
            biased;
            _ = cancel.changed() => return Err(ReelError::UploadCancelled),
            read = source.read(&mut buf) => read?,
        };
        if read == 0 {
            break;
        }

        transferred += read as u64;
        // 來源檔在驗證後變大
        if transferred >= settings.max_bytes {
            return Err(ReelError::UploadFailed {
                reason: format!("file grew past the {} byte limit", settings.max_bytes),
            });
        }

        dest.write_all(&buf[..read]).await?;
        let _ = events.send(UploadEvent::Progress {
            transferred,
            total: file.size.max(transferred),
        });
    }

    dest.flush().await?;
    dest.sync_all().await?;
    Ok(())
}

/// 在 media_dir 建立不重複的目的檔 (clip.mp4, clip-1.mp4, ...)
async fn create_destination(media_dir: &Path, name: &str) -> Result<(PathBuf, File)> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("upload-{}", Utc::now().timestamp_millis()));
    let stem = Path::new(&file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file_name)
        .to_string();
    let extension = Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    for attempt in 0u32.. {
        let candidate = if attempt == 0 {
            media_dir.join(&file_name)
        } else {
            media_dir.join(format!("{}-{}{}", stem, attempt, extension))
        };
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(handle) => return Ok((candidate, handle)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(ReelError::UploadFailed {
        reason: format!("no free file name for '{}'", name),
    })
}
