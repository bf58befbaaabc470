pub mod admin_service;
pub mod contact_service;
pub mod course_service;
pub mod engage_service;
pub mod forum_service;
pub mod gallery_service;
pub mod note_service;
pub mod portfolio_service;
pub mod profile_service;
pub mod story_service;

use std::collections::HashMap;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::mail::MailError;

pub use admin_service::AdminService;
pub use contact_service::ContactService;
pub use course_service::CourseService;
pub use engage_service::EngageService;
pub use forum_service::ForumService;
pub use gallery_service::GalleryService;
pub use note_service::NoteService;
pub use portfolio_service::PortfolioService;
pub use profile_service::ProfileService;
pub use story_service::StoryService;

/// Business error taxonomy shared by every service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0:?}")]
    InvalidInput(HashMap<String, String>),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = HashMap::new();
        fields.insert(field.to_string(), message.into());
        ServiceError::InvalidInput(fields)
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ServiceError::NotFound("Resource"),
            DatabaseError::UniqueViolation { .. } => {
                ServiceError::Conflict("Resource already exists".to_string())
            }
            DatabaseError::ForeignKeyViolation { .. } => {
                ServiceError::InvalidReference("Referenced resource does not exist".to_string())
            }
            other => ServiceError::Database(other),
        }
    }
}

impl From<MailError> for ServiceError {
    fn from(err: MailError) -> Self {
        ServiceError::Internal(format!("mail delivery failed: {}", err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
