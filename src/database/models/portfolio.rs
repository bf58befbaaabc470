use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::patch::Patch;
use crate::services::ServiceResult;
use crate::validation::Violations;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioWork {
    pub id: i64,
    pub user_id: String,
    pub author_nickname: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_urls: Vec<String>,
    pub is_highlighted: bool,
    pub kudos_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkSort {
    #[default]
    Latest,
    Kudos,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkFilter {
    pub category: Option<String>,
    #[serde(default)]
    pub sort: WorkSort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWork {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl NewWork {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("title", &self.title, 1, 255);
        v.max_len("description", self.description.as_deref(), 10_000);
        v.optional_text("category", self.category.as_deref(), 1, 100);
        check_images(&mut v, Some(&self.image_urls));
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

impl WorkUpdate {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.optional_text("title", self.title.as_deref(), 1, 255);
        v.max_len("description", self.description.as_deref(), 10_000);
        v.optional_text("category", self.category.as_deref(), 1, 100);
        check_images(&mut v, self.image_urls.as_ref());
        v.finish()
    }

    pub fn into_patch(self) -> Patch {
        Patch::new()
            .set_opt("title", self.title.map(|t| t.trim().to_string()))
            .set_opt("description", self.description)
            .set_opt("category", self.category)
            .set_opt("image_urls", self.image_urls)
    }
}

fn check_images(v: &mut Violations, urls: Option<&Vec<String>>) {
    if let Some(urls) = urls {
        if urls.len() > 20 {
            v.add("image_urls", "must contain at most 20 entries");
        } else if urls.iter().any(|u| !crate::validation::is_http_url(u)) {
            v.add("image_urls", "entries must be valid http(s) URLs");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KudosState {
    pub work_id: i64,
    pub kudos_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightRequest {
    pub highlighted: bool,
}
