use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::patch::Patch;
use crate::services::ServiceResult;
use crate::validation::{is_slug, Violations};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CeramicStory {
    pub id: i64,
    pub dynasty_name: String,
    pub slug: String,
    pub period: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub description: String,
    pub characteristics_craft: Option<String>,
    pub characteristics_art: Option<String>,
    pub image_url: Option<String>,
    pub takeaways: Option<String>,
    pub display_order: i32,
}

pub const STORY_COLUMNS: &str = "id, dynasty_name, slug, period, start_year, end_year, description, \
     characteristics_craft, characteristics_art, image_url, takeaways, display_order";

/// How a story is addressed in a URL: numeric segments are ids, anything
/// else is a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryKey {
    Id(i64),
    Slug(String),
}

impl StoryKey {
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(id) => StoryKey::Id(id),
            Err(_) => StoryKey::Slug(segment.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStory {
    #[serde(default)]
    pub dynasty_name: String,
    #[serde(default)]
    pub slug: String,
    pub period: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    #[serde(default)]
    pub description: String,
    pub characteristics_craft: Option<String>,
    pub characteristics_art: Option<String>,
    pub image_url: Option<String>,
    pub takeaways: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

impl NewStory {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("dynasty_name", &self.dynasty_name, 1, 100);
        check_slug(&mut v, Some(&self.slug));
        v.max_len("period", self.period.as_deref(), 100);
        check_years(&mut v, self.start_year, self.end_year);
        v.text("description", &self.description, 1, usize::MAX);
        v.http_url("image_url", self.image_url.as_deref());
        if self.display_order < 0 {
            v.add("display_order", "must be 0 or greater");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryUpdate {
    pub dynasty_name: Option<String>,
    pub slug: Option<String>,
    pub period: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub description: Option<String>,
    pub characteristics_craft: Option<String>,
    pub characteristics_art: Option<String>,
    pub image_url: Option<String>,
    pub takeaways: Option<String>,
    pub display_order: Option<i32>,
}

impl StoryUpdate {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.optional_text("dynasty_name", self.dynasty_name.as_deref(), 1, 100);
        if self.slug.is_some() {
            check_slug(&mut v, self.slug.as_deref());
        }
        v.max_len("period", self.period.as_deref(), 100);
        check_years(&mut v, self.start_year, self.end_year);
        v.optional_text("description", self.description.as_deref(), 1, usize::MAX);
        v.http_url("image_url", self.image_url.as_deref());
        if matches!(self.display_order, Some(order) if order < 0) {
            v.add("display_order", "must be 0 or greater");
        }
        v.finish()
    }

    /// Sets one end of the year range but not the other.
    pub fn changes_one_year(&self) -> bool {
        self.start_year.is_some() != self.end_year.is_some()
    }

    /// Checks the year range `current` will have once this update lands.
    pub fn validate_against(&self, current: &CeramicStory) -> ServiceResult<()> {
        let mut v = Violations::new();
        check_years(
            &mut v,
            self.start_year.or(current.start_year),
            self.end_year.or(current.end_year),
        );
        v.finish()
    }

    pub fn into_patch(self) -> Patch {
        Patch::new()
            .set_opt("dynasty_name", self.dynasty_name)
            .set_opt("slug", self.slug)
            .set_opt("period", self.period)
            .set_opt("start_year", self.start_year)
            .set_opt("end_year", self.end_year)
            .set_opt("description", self.description)
            .set_opt("characteristics_craft", self.characteristics_craft)
            .set_opt("characteristics_art", self.characteristics_art)
            .set_opt("image_url", self.image_url)
            .set_opt("takeaways", self.takeaways)
            .set_opt("display_order", self.display_order)
    }
}

fn check_slug(v: &mut Violations, slug: Option<&str>) {
    match slug {
        Some(s) if s.is_empty() => v.add("slug", "is required"),
        Some(s) if s.chars().count() > 100 => v.add("slug", "must be at most 100 characters"),
        Some(s) if !is_slug(s) => v.add("slug", "must contain only lowercase letters, digits and dashes"),
        None => v.add("slug", "is required"),
        _ => {}
    }
}

fn check_years(v: &mut Violations, start: Option<i32>, end: Option<i32>) {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            v.add("start_year", "must not be after end_year");
        }
    }
}
