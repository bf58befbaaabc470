use std::sync::Arc;

use crate::api::{Page, Paginated};
use crate::auth::Principal;
use crate::database::models::{Notification, ProfileUpdate, User};
use crate::database::repositories::{NotificationRepository, UserRepository};
use crate::database::DatabaseError;
use crate::services::{ServiceError, ServiceResult};

const NICKNAME_TAKEN: &str = "Nickname is already taken";

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { users, notifications }
    }

    pub async fn get(&self, principal: &Principal) -> ServiceResult<User> {
        self.users
            .find(&principal.subject_id)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }

    pub async fn update(&self, principal: &Principal, update: ProfileUpdate) -> ServiceResult<User> {
        update.validate()?;

        if let Some(nickname) = update.trimmed_nickname() {
            if self.users.nickname_taken(&nickname, &principal.subject_id).await? {
                return Err(ServiceError::Conflict(NICKNAME_TAKEN.to_string()));
            }
        }

        // The pre-check can race; the unique index has the final say.
        match self.users.update_profile(&principal.subject_id, update.into_patch()).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ServiceError::NotFound("User")),
            Err(DatabaseError::UniqueViolation { .. }) => Err(ServiceError::Conflict(NICKNAME_TAKEN.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn notifications(&self, principal: &Principal, page: Page) -> ServiceResult<Paginated<Notification>> {
        let (items, total) = self.notifications.list_for(&principal.subject_id, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn mark_notification_read(&self, principal: &Principal, id: i64) -> ServiceResult<()> {
        if self.notifications.mark_read(id, &principal.subject_id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Notification"))
        }
    }
}
