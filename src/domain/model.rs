use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ReelError;

/// A single portfolio video entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub client: String,
    pub category: Category,
    pub thumbnail: String,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Project {
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

/// 尚未分配 id 的作品，由 store 在 append 時補上
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub client: String,
    pub category: Category,
    pub thumbnail: String,
    pub video_url: String,
    pub featured: Option<bool>,
}

impl NewProject {
    pub fn with_id(self, id: u64) -> Project {
        Project {
            id,
            title: self.title,
            client: self.client,
            category: self.category,
            thumbnail: self.thumbnail,
            video_url: self.video_url,
            featured: self.featured,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fashion,
    Fitness,
    Events,
    Brand,
    Uploads,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Fashion,
        Category::Fitness,
        Category::Events,
        Category::Brand,
        Category::Uploads,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fashion => "fashion",
            Category::Fitness => "fitness",
            Category::Events => "events",
            Category::Brand => "brand",
            Category::Uploads => "uploads",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ReelError::ValidationError {
                message: format!("Unknown category: {}", s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => project.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}
