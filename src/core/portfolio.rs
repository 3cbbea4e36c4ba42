//! The portfolio store: the authoritative in-memory collection of projects,
//! mirrored to a single slot of a [`KeyValueStore`].
//!
//! Every mutation builds the next collection, writes it to the backend and
//! only then replaces the in-memory copy, so the mirror never lags behind a
//! returned call.

use crate::core::seed::default_projects;
use crate::core::transfer::{self, ExportDocument, ImportedProject};
use crate::domain::model::{CategoryFilter, NewProject, Project};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use chrono::{Local, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const PORTFOLIO_KEY: &str = "portfolioVideos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    pub added: usize,
    pub skipped: usize,
}

pub struct PortfolioStore<S: KeyValueStore> {
    backend: S,
    key: String,
    projects: Vec<Project>,
}

impl<S: KeyValueStore> PortfolioStore<S> {
    pub async fn load(backend: S) -> Result<Self> {
        Self::load_with_key(backend, PORTFOLIO_KEY).await
    }

    pub async fn load_with_key(backend: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();

        let projects = match backend.get(&key).await? {
            None => {
                let seed = default_projects();
                tracing::info!("No saved portfolio under '{}', seeding {} projects", key, seed.len());
                backend.set(&key, &serde_json::to_string(&seed)?).await?;
                seed
            }
            Some(raw) => match serde_json::from_str::<Vec<Project>>(&raw) {
                Ok(projects) => dedupe_by_id(projects),
                Err(e) => {
                    // 資料損毀時以空集合繼續，不中斷使用者
                    tracing::warn!("⚠️ Stored portfolio under '{}' is unreadable, starting empty: {}", key, e);
                    Vec::new()
                }
            },
        };

        tracing::debug!("Loaded {} projects", projects.len());
        Ok(Self {
            backend,
            key,
            projects,
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn featured(&self) -> impl Iterator<Item = &Project> + Clone + '_ {
        self.projects.iter().filter(|p| p.is_featured())
    }

    pub fn filter_by_category(
        &self,
        filter: CategoryFilter,
    ) -> impl Iterator<Item = &Project> + Clone + '_ {
        self.projects.iter().filter(move |p| filter.matches(p))
    }

    /// Appends entries with freshly generated ids. Returns the stored projects.
    pub async fn append(&mut self, entries: Vec<NewProject>) -> Result<Vec<Project>> {
        let mut next = self.projects.clone();
        let mut ids = IdAllocator::new(&next);

        let added: Vec<Project> = entries
            .into_iter()
            .map(|entry| entry.with_id(ids.next_id()))
            .collect();
        next.extend(added.iter().cloned());

        self.commit(next).await?;
        tracing::info!("➕ Appended {} projects", added.len());
        Ok(added)
    }

    /// Merges an untyped import document. Colliding ids are dropped.
    pub async fn merge(&mut self, imported: Value) -> Result<MergeReport> {
        let records = transfer::parse_import(imported)?;
        self.merge_records(records).await
    }

    /// Merges a raw JSON import document.
    pub async fn merge_str(&mut self, text: &str) -> Result<MergeReport> {
        let records = transfer::parse_import_str(text)?;
        self.merge_records(records).await
    }

    async fn merge_records(&mut self, records: Vec<ImportedProject>) -> Result<MergeReport> {
        let mut next = self.projects.clone();
        let mut seen: HashSet<u64> = next.iter().map(|p| p.id).collect();
        let mut ids = IdAllocator::new(&next);
        let mut report = MergeReport::default();

        // 缺少 id 的紀錄在檢查完所有明確 id 之後才分配，避免撞號
        let mut pending = Vec::new();
        for record in records {
            match record.id {
                Some(id) if !seen.insert(id) => {
                    tracing::debug!("Skipping imported project {} (id already present)", id);
                    report.skipped += 1;
                }
                Some(id) => {
                    ids.observe(id);
                    next.push(record.project.with_id(id));
                    report.added += 1;
                }
                None => pending.push((next.len(), record.project)),
            }
        }

        // 保持文件中的原始順序
        for (offset, (position, project)) in pending.into_iter().enumerate() {
            next.insert(position + offset, project.with_id(ids.next_id()));
            report.added += 1;
        }

        self.commit(next).await?;
        tracing::info!(
            "📥 Import merged: {} added, {} skipped",
            report.added,
            report.skipped
        );
        Ok(report)
    }

    pub fn export(&self) -> Result<ExportDocument> {
        self.export_on(Local::now().date_naive())
    }

    pub fn export_on(&self, date: NaiveDate) -> Result<ExportDocument> {
        ExportDocument::build(&self.projects, date)
    }

    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let document = self.export()?;
        let path = document.write_to_dir(dir).await?;
        tracing::info!("📤 Exported {} projects to {}", self.projects.len(), path.display());
        Ok(path)
    }

    /// Flushes the collection one last time and hands the backend back.
    pub async fn close(self) -> Result<S> {
        let encoded = serde_json::to_string(&self.projects)?;
        self.backend.set(&self.key, &encoded).await?;
        Ok(self.backend)
    }

    async fn commit(&mut self, next: Vec<Project>) -> Result<()> {
        let encoded = serde_json::to_string(&next)?;
        self.backend.set(&self.key, &encoded).await?;
        self.projects = next;
        Ok(())
    }
}

fn dedupe_by_id(projects: Vec<Project>) -> Vec<Project> {
    let mut seen = HashSet::new();
    let before = projects.len();
    let kept: Vec<Project> = projects.into_iter().filter(|p| seen.insert(p.id)).collect();
    if kept.len() != before {
        tracing::warn!("Dropped {} stored projects with duplicate ids", before - kept.len());
    }
    kept
}

/// 以毫秒時間戳為基礎產生遞增且不重複的 id
struct IdAllocator {
    last: u64,
    used: HashSet<u64>,
}

impl IdAllocator {
    fn new(existing: &[Project]) -> Self {
        Self {
            last: existing.iter().map(|p| p.id).max().unwrap_or(0),
            used: existing.iter().map(|p| p.id).collect(),
        }
    }

    fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
        self.used.insert(id);
    }

    fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = match self.last.checked_add(1) {
            Some(after_last) => {
                self.last = now.max(after_last);
                self.last
            }
            // 已用到 u64::MAX，改取最小的未使用 id
            None => (1..=u64::MAX)
                .find(|candidate| !self.used.contains(candidate))
                .unwrap_or(0),
        };
        self.used.insert(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::domain::model::Category;
    use serde_json::json;

    fn upload(title: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            client: "Your Client".to_string(),
            category: Category::Uploads,
            thumbnail: format!("/media/{}.mp4", title),
            video_url: format!("/media/{}.mp4", title),
            featured: None,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_unique_ids() {
        let mut store = PortfolioStore::load(MemoryStore::new()).await.unwrap();
        let before = store.len();

        let added = store
            .append(vec![upload("a"), upload("b"), upload("c")])
            .await
            .unwrap();

        assert_eq!(store.len(), before + 3);
        let ids: HashSet<u64> = store.projects().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), store.len());
        assert!(added.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_merge_assigns_ids_in_document_order() {
        let mut store = PortfolioStore::load(MemoryStore::new()).await.unwrap();
        let before = store.len();

        let report = store
            .merge(json!([
                {"title": "no id", "videoUrl": "/a.mp4"},
                {"id": 500, "title": "explicit", "videoUrl": "/b.mp4"},
                {"title": "also no id", "videoUrl": "/c.mp4"}
            ]))
            .await
            .unwrap();

        assert_eq!(report, MergeReport { added: 3, skipped: 0 });
        let titles: Vec<&str> = store.projects()[before..]
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["no id", "explicit", "also no id"]);
        let ids: HashSet<u64> = store.projects().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[tokio::test]
    async fn test_merge_keeps_first_duplicate_within_document() {
        let mut store = PortfolioStore::load(MemoryStore::new()).await.unwrap();

        let report = store
            .merge(json!([
                {"id": 900, "title": "first", "videoUrl": "/a.mp4"},
                {"id": 900, "title": "second", "videoUrl": "/b.mp4"}
            ]))
            .await
            .unwrap();

        assert_eq!(report, MergeReport { added: 1, skipped: 1 });
        assert_eq!(store.get(900).map(|p| p.title.as_str()), Some("first"));
    }

    #[test]
    fn test_allocator_falls_back_after_max_id() {
        let mut ids = IdAllocator::new(&[]);
        ids.observe(1);
        ids.observe(u64::MAX);

        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }

    #[tokio::test]
    async fn test_featured_view() {
        let store = PortfolioStore::load(MemoryStore::new()).await.unwrap();
        assert!(store.featured().count() >= 1);
        assert!(store.featured().all(|p| p.is_featured()));
    }
}
