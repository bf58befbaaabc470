use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::Role;
use crate::database::patch::Patch;
use crate::services::ServiceResult;
use crate::validation::Violations;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const USER_COLUMNS: &str = "id, nickname, email, role, avatar_url, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.optional_text("nickname", self.nickname.as_deref(), 1, 100);
        v.http_url("avatar_url", self.avatar_url.as_deref());
        v.finish()
    }

    pub fn trimmed_nickname(&self) -> Option<String> {
        self.nickname.as_ref().map(|n| n.trim().to_string())
    }

    pub fn into_patch(self) -> Patch {
        let nickname = self.trimmed_nickname();
        Patch::new()
            .set_opt("nickname", nickname)
            .set_opt("avatar_url", self.avatar_url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdate {
    pub role: String,
}

impl RoleUpdate {
    pub fn parse(&self) -> ServiceResult<Role> {
        self.role.parse::<Role>().map_err(|_| {
            crate::services::ServiceError::invalid_field("role", "must be one of: admin, normal_user")
        })
    }
}
