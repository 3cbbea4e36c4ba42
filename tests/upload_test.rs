use anyhow::Result;
use reelfolio::core::upload::CLIENT_PLACEHOLDER;
use reelfolio::{
    Category, MediaFile, MemoryStore, PortfolioStore, ReelError, UploadEvent, UploadSettings,
    Uploader,
};
use std::path::Path;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, len: usize) -> std::io::Result<std::path::PathBuf> {
    let path = dir.join(name);
    let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn small_uploader(media_dir: &Path, max_bytes: u64) -> Uploader {
    Uploader::new(UploadSettings {
        media_dir: media_dir.to_path_buf(),
        max_bytes,
        chunk_size: 1024,
    })
}

#[tokio::test]
async fn test_upload_reports_progress_and_completes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_file(temp_dir.path(), "Studio Reel.mp4", 10_000)?;
    let media_dir = temp_dir.path().join("media");

    let file = MediaFile::from_path(&source).await?;
    assert_eq!(file.mime_type, "video/mp4");
    assert_eq!(file.size, 10_000);

    let uploader = small_uploader(&media_dir, 1_000_000);
    let mut handle = uploader.start(file)?;

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        let terminal = event.is_terminal();
        events.push(event);
        if terminal {
            break;
        }
    }

    let progress: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            UploadEvent::Progress { transferred, .. } => Some(*transferred),
            _ => None,
        })
        .collect();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(progress.last(), Some(&10_000));
    assert!(matches!(events.last(), Some(UploadEvent::Completed(_))));

    let project = handle.finish().await?;
    assert_eq!(project.title, "Studio Reel");
    assert_eq!(project.client, CLIENT_PLACEHOLDER);
    assert_eq!(project.category, Category::Uploads);
    assert!(project.video_url.starts_with("file://"));
    assert_eq!(project.thumbnail, project.video_url);

    let stored = std::fs::read(media_dir.join("Studio Reel.mp4"))?;
    assert_eq!(stored, std::fs::read(&source)?);

    let mut store = PortfolioStore::load(MemoryStore::new()).await?;
    let before = store.len();
    store.append(vec![project]).await?;
    assert_eq!(store.len(), before + 1);
    Ok(())
}

#[tokio::test]
async fn test_non_video_upload_is_rejected_and_store_unchanged() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_file(temp_dir.path(), "poster.png", 2_048)?;
    let media_dir = temp_dir.path().join("media");

    let store = PortfolioStore::load(MemoryStore::new()).await?;
    let snapshot = store.projects().to_vec();

    let file = MediaFile::from_path(&source).await?;
    let result = small_uploader(&media_dir, 1_000_000).start(file);

    assert!(matches!(result, Err(ReelError::UploadRejected { .. })));
    assert!(!media_dir.exists(), "rejected uploads never start");
    assert_eq!(store.projects(), snapshot.as_slice());
    Ok(())
}

#[tokio::test]
async fn test_size_limit_boundary() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let media_dir = temp_dir.path().join("media");
    let uploader = small_uploader(&media_dir, 4_096);

    let under = write_file(temp_dir.path(), "under.webm", 4_095)?;
    let handle = uploader.start(MediaFile::from_path(&under).await?)?;
    let project = handle.finish().await?;
    assert_eq!(project.title, "under");

    let at = write_file(temp_dir.path(), "at.webm", 4_096)?;
    let result = uploader.start(MediaFile::from_path(&at).await?);
    assert!(matches!(result, Err(ReelError::UploadRejected { .. })));

    let over = write_file(temp_dir.path(), "over.webm", 5_000)?;
    let result = uploader.start(MediaFile::from_path(&over).await?);
    assert!(matches!(result, Err(ReelError::UploadRejected { .. })));
    Ok(())
}

#[tokio::test]
async fn test_cancelled_upload_leaves_no_partial_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_file(temp_dir.path(), "long-take.mov", 50_000)?;
    let media_dir = temp_dir.path().join("media");

    let mut handle = small_uploader(&media_dir, 1_000_000).start(MediaFile::from_path(&source).await?)?;
    handle.cancel();

    let mut saw_cancelled = false;
    while let Some(event) = handle.next_event().await {
        if event.is_terminal() {
            saw_cancelled = event == UploadEvent::Cancelled;
            break;
        }
    }
    assert!(saw_cancelled);

    let outcome = handle.finish().await;
    assert!(matches!(outcome, Err(ReelError::UploadCancelled)));

    let leftovers = std::fs::read_dir(&media_dir)?.count();
    assert_eq!(leftovers, 0);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_names_get_distinct_destinations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_file(temp_dir.path(), "clip.mp4", 512)?;
    let media_dir = temp_dir.path().join("media");
    let uploader = small_uploader(&media_dir, 1_000_000);

    let first = uploader.start(MediaFile::from_path(&source).await?)?.finish().await?;
    let second = uploader.start(MediaFile::from_path(&source).await?)?.finish().await?;

    assert_ne!(first.video_url, second.video_url);
    assert!(media_dir.join("clip.mp4").exists());
    assert!(media_dir.join("clip-1.mp4").exists());
    Ok(())
}

async fn wait_until_empty(dir: &Path) -> std::io::Result<usize> {
    let mut remaining = usize::MAX;
    for _ in 0..500 {
        remaining = std::fs::read_dir(dir)?.count();
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    Ok(remaining)
}

#[tokio::test]
async fn test_dropping_handle_mid_transfer_cleans_up() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_file(temp_dir.path(), "feature-cut.mp4", 2_000_000)?;
    let media_dir = temp_dir.path().join("media");

    let mut handle =
        small_uploader(&media_dir, 10_000_000).start(MediaFile::from_path(&source).await?)?;

    // 等到第一個 chunk 寫入，目的檔已經存在
    let first = handle.next_event().await;
    assert!(matches!(first, Some(UploadEvent::Progress { .. })));
    assert!(media_dir.join("feature-cut.mp4").exists());

    drop(handle);

    assert_eq!(wait_until_empty(&media_dir).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_file_growing_past_limit_fails_and_cleans_up() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_file(temp_dir.path(), "growing.mp4", 10_000)?;
    let media_dir = temp_dir.path().join("media");

    // 回報的大小在上限內，實際檔案卻超過
    let file = MediaFile {
        name: "growing.mp4".to_string(),
        mime_type: "video/mp4".to_string(),
        size: 100,
        path: source,
    };

    let handle = small_uploader(&media_dir, 4_096).start(file)?;
    let outcome = handle.finish().await;

    assert!(matches!(outcome, Err(ReelError::UploadFailed { .. })));
    assert_eq!(std::fs::read_dir(&media_dir)?.count(), 0);
    Ok(())
}
