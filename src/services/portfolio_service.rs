use std::sync::Arc;

use crate::api::{Page, Paginated};
use crate::auth::Principal;
use crate::database::models::{KudosState, NewNotification, NewWork, PortfolioWork, WorkFilter, WorkUpdate};
use crate::database::repositories::{NotificationRepository, PortfolioRepository};
use crate::services::{ServiceError, ServiceResult};

pub struct PortfolioService {
    works: Arc<dyn PortfolioRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl PortfolioService {
    pub fn new(works: Arc<dyn PortfolioRepository>, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { works, notifications }
    }

    pub async fn list(&self, filter: &WorkFilter, page: Page) -> ServiceResult<Paginated<PortfolioWork>> {
        let (works, total) = self.works.list(filter, page).await?;
        Ok(Paginated::new(works, total, page))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<PortfolioWork> {
        self.works.find(id).await?.ok_or(ServiceError::NotFound("Work"))
    }

    pub async fn create(&self, principal: &Principal, work: NewWork) -> ServiceResult<PortfolioWork> {
        work.validate()?;
        Ok(self.works.create(&principal.subject_id, &work).await?)
    }

    pub async fn update(&self, principal: &Principal, id: i64, update: WorkUpdate) -> ServiceResult<PortfolioWork> {
        update.validate()?;
        self.works
            .update(id, &principal.scope(), update.into_patch())
            .await?
            .ok_or(ServiceError::NotFound("Work"))
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> ServiceResult<()> {
        if self.works.delete(id, &principal.scope()).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Work"))
        }
    }

    /// One kudos per user per work; authors cannot kudos their own work.
    pub async fn give_kudos(&self, principal: &Principal, work_id: i64) -> ServiceResult<KudosState> {
        let work = self.get(work_id).await?;
        if work.user_id == principal.subject_id {
            return Err(ServiceError::invalid_field("work_id", "cannot give kudos to your own work"));
        }

        if !self.works.add_kudos(work_id, &principal.subject_id).await? {
            return Err(ServiceError::Conflict("Kudos already given".to_string()));
        }

        let notice = NewNotification::kudos_on_work(&work.user_id, &principal.subject_id, work.id, &work.title);
        if let Err(err) = self.notifications.create(&notice).await {
            tracing::warn!(work_id = work.id, error = %err, "failed to record kudos notification");
        }

        let kudos_count = self.works.kudos_count(work_id).await?;
        Ok(KudosState { work_id, kudos_count })
    }

    pub async fn set_highlighted(&self, id: i64, highlighted: bool) -> ServiceResult<PortfolioWork> {
        self.works
            .set_highlighted(id, highlighted)
            .await?
            .ok_or(ServiceError::NotFound("Work"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::testing::{principal, MemoryNotificationRepository, MemoryPortfolioRepository};

    fn service() -> (PortfolioService, Arc<MemoryNotificationRepository>) {
        let notifications = Arc::new(MemoryNotificationRepository::default());
        let svc = PortfolioService::new(Arc::new(MemoryPortfolioRepository::default()), notifications.clone());
        (svc, notifications)
    }

    fn work() -> NewWork {
        NewWork {
            title: "Crackle glaze bowl".into(),
            description: None,
            category: Some("bowl".into()),
            image_urls: vec!["https://img.example/bowl.jpg".into()],
        }
    }

    #[tokio::test]
    async fn kudos_once_per_user_and_never_to_self() {
        let (svc, notifications) = service();
        let alice = principal("alice", Role::NormalUser);
        let bob = principal("bob", Role::NormalUser);
        let created = svc.create(&alice, work()).await.unwrap();

        assert!(matches!(
            svc.give_kudos(&alice, created.id).await,
            Err(ServiceError::InvalidInput(_))
        ));

        let state = svc.give_kudos(&bob, created.id).await.unwrap();
        assert_eq!(state.kudos_count, 1);
        assert!(matches!(svc.give_kudos(&bob, created.id).await, Err(ServiceError::Conflict(_))));

        let sent = notifications.created();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_user_id, "alice");
        assert_eq!(sent[0].action_type, "kudo_portfolio_work");
    }

    #[tokio::test]
    async fn owner_scope_applies_to_works() {
        let (svc, _) = service();
        let alice = principal("alice", Role::NormalUser);
        let bob = principal("bob", Role::NormalUser);
        let created = svc.create(&alice, work()).await.unwrap();

        let update = WorkUpdate { title: Some("Mine now".into()), ..Default::default() };
        assert!(matches!(svc.update(&bob, created.id, update).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(&bob, created.id).await, Err(ServiceError::NotFound(_))));
        svc.delete(&alice, created.id).await.unwrap();
        assert!(svc.get(created.id).await.is_err());
    }

    #[tokio::test]
    async fn highlight_unknown_work_is_not_found() {
        let (svc, _) = service();
        assert!(matches!(svc.set_highlighted(7, true).await, Err(ServiceError::NotFound(_))));
    }
}
