use crate::domain::model::{Category, Project};

fn entry(
    id: u64,
    title: &str,
    client: &str,
    category: Category,
    slug: &str,
    featured: Option<bool>,
) -> Project {
    Project {
        id,
        title: title.to_string(),
        client: client.to_string(),
        category,
        thumbnail: format!("/thumbnails/{}.jpg", slug),
        video_url: format!("/videos/{}.mp4", slug),
        featured,
    }
}

/// 首次啟動時寫入的預設作品集
pub fn default_projects() -> Vec<Project> {
    vec![
        entry(
            1,
            "Spring Collection Lookbook",
            "Maison Verre",
            Category::Fashion,
            "spring-lookbook",
            Some(true),
        ),
        entry(
            2,
            "Morning Strength Series",
            "Pulse Athletics",
            Category::Fitness,
            "morning-strength",
            None,
        ),
        entry(
            3,
            "Harbour Gala Highlights",
            "Harbour Foundation",
            Category::Events,
            "harbour-gala",
            Some(true),
        ),
        entry(
            4,
            "Origin Story",
            "Northfield Coffee",
            Category::Brand,
            "origin-story",
            None,
        ),
        entry(
            5,
            "Streetwear Drop Teaser",
            "Concrete Label",
            Category::Fashion,
            "streetwear-drop",
            None,
        ),
        entry(
            6,
            "Marathon Day Recap",
            "City Runners Club",
            Category::Events,
            "marathon-recap",
            None,
        ),
    ]
}
