use std::collections::HashMap;

use crate::services::ServiceError;

/// Collects per-field problems in a request body.
#[derive(Debug, Default)]
pub struct Violations {
    fields: HashMap<String, String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Required text, trimmed length within `min..=max` characters.
    pub fn text(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len == 0 && min > 0 {
            self.add(field, "is required");
        } else if len < min {
            self.add(field, format!("must be at least {} characters", min));
        } else if len > max {
            self.add(field, format!("must be at most {} characters", max));
        }
    }

    /// Like [`Violations::text`] but only when the field is present.
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
        if let Some(v) = value {
            self.text(field, v, min, max);
        }
    }

    pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.add(field, format!("must be at most {} characters", max));
            }
        }
    }

    pub fn positive(&mut self, field: &str, value: Option<i64>) {
        if let Some(v) = value {
            if v <= 0 {
                self.add(field, "must be greater than 0");
            }
        }
    }

    pub fn http_url(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !is_http_url(v) {
                self.add(field, "must be a valid http(s) URL");
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "is required");
        } else if !is_email(value) {
            self.add(field, "must be a valid email address");
        }
    }

    pub fn one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) {
        if let Some(v) = value {
            if !allowed.contains(&v) {
                self.add(field, format!("must be one of: {}", allowed.join(", ")));
            }
        }
    }

    /// Each tag 1..=50 characters, at most `max_tags` of them.
    pub fn tags(&mut self, field: &str, value: Option<&[String]>, max_tags: usize) {
        if let Some(tags) = value {
            if tags.len() > max_tags {
                self.add(field, format!("must contain at most {} entries", max_tags));
            } else if tags.iter().any(|t| t.trim().is_empty() || t.chars().count() > 50) {
                self.add(field, "entries must be 1 to 50 characters");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn finish(self) -> Result<(), ServiceError> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::InvalidInput(self.fields))
        }
    }
}

pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

/// Lowercase ASCII letters, digits and dashes.
pub fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bounds() {
        let mut v = Violations::new();
        v.text("title", "  ", 1, 10);
        v.text("content", "short", 10, 100);
        v.text("subject", &"x".repeat(11), 1, 10);
        v.text("ok", "fine", 1, 10);
        match v.finish() {
            Err(ServiceError::InvalidInput(fields)) => {
                assert_eq!(fields["title"], "is required");
                assert_eq!(fields["content"], "must be at least 10 characters");
                assert_eq!(fields["subject"], "must be at most 10 characters");
                assert!(!fields.contains_key("ok"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn first_problem_per_field_wins() {
        let mut v = Violations::new();
        v.add("email", "is required");
        v.add("email", "must be a valid email address");
        match v.finish() {
            Err(ServiceError::InvalidInput(fields)) => assert_eq!(fields["email"], "is required"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn urls_must_be_http() {
        assert!(is_http_url("https://cdn.example.com/a.png"));
        assert!(is_http_url("http://localhost:5173/x"));
        assert!(!is_http_url("ftp://example.com/a.png"));
        assert!(!is_http_url("javascript:alert(1)"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn emails() {
        assert!(is_email("potter@jingdezhen.cn"));
        assert!(!is_email("potter"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@@b.cn"));
        assert!(!is_email("a b@c.cn"));
    }

    #[test]
    fn slugs() {
        assert!(is_slug("ming-dynasty"));
        assert!(is_slug("song-960"));
        assert!(!is_slug("Ming"));
        assert!(!is_slug("ming_dynasty"));
        assert!(!is_slug(""));
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = normalize_tags(vec![" glaze ".into(), "glaze".into(), "".into(), "kiln".into()]);
        assert_eq!(tags, vec!["glaze", "kiln"]);
    }
}
