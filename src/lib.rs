pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{FileStore, MemoryStore};
pub use crate::core::{
    portfolio::{MergeReport, PortfolioStore, PORTFOLIO_KEY},
    transfer::ExportDocument,
    upload::{MediaFile, UploadEvent, UploadHandle, UploadSettings, Uploader},
};
pub use domain::model::{Category, CategoryFilter, NewProject, Project};
pub use domain::ports::KeyValueStore;
pub use utils::error::{ReelError, Result};
