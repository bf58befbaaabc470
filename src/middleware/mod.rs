pub mod auth;
pub mod guard;
pub mod response;

pub use auth::{authenticate, RequestIdentity};
pub use guard::enforce;
pub use response::{ApiResponse, ApiResult};
