pub mod portfolio;
pub mod seed;
pub mod transfer;
pub mod upload;

pub use crate::domain::model::{Category, CategoryFilter, NewProject, Project};
pub use crate::domain::ports::KeyValueStore;
pub use crate::utils::error::Result;
