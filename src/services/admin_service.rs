use std::sync::Arc;

use crate::api::{Page, Paginated};
use crate::auth::Principal;
use crate::database::models::{RoleUpdate, User};
use crate::database::repositories::UserRepository;
use crate::services::{ServiceError, ServiceResult};

/// User administration. Moderation of posts and works lives in the forum
/// and portfolio services.
pub struct AdminService {
    users: Arc<dyn UserRepository>,
}

impl AdminService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn users(&self, page: Page) -> ServiceResult<Paginated<User>> {
        let (users, total) = self.users.list(page).await?;
        Ok(Paginated::new(users, total, page))
    }

    pub async fn set_role(&self, actor: &Principal, user_id: &str, update: RoleUpdate) -> ServiceResult<User> {
        let role = update.parse()?;
        let user = self
            .users
            .update_role(user_id, role)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;
        tracing::info!(actor = %actor.subject_id, user_id, role = role.as_str(), "user role changed");
        Ok(user)
    }
}
