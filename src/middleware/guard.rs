use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{decide, Access, Decision, DenyReason};
use crate::error::ApiError;

use super::auth::RequestIdentity;

/// Route-group guard: `route_layer(from_fn_with_state(Access::..., enforce))`.
/// Denied requests never reach the handler.
pub async fn enforce(State(required): State<Access>, request: Request, next: Next) -> Response {
    let identity = request.extensions().get::<RequestIdentity>().cloned().unwrap_or_default();

    match decide(identity.principal.as_ref(), required, None) {
        Decision::Allow => next.run(request).await,
        Decision::Deny(DenyReason::Unauthenticated) => {
            tracing::warn!(
                reason = DenyReason::Unauthenticated.code(),
                credential = identity.failure.map(|f| f.reason_code()).unwrap_or("missing"),
                path = %request.uri().path(),
                "request denied"
            );
            ApiError::unauthorized(identity.public_message()).into_response()
        }
        Decision::Deny(reason) => {
            tracing::warn!(
                reason = reason.code(),
                subject = identity.principal.as_ref().map(|p| p.subject_id.as_str()).unwrap_or(""),
                path = %request.uri().path(),
                "request denied"
            );
            ApiError::forbidden("Insufficient permissions").into_response()
        }
    }
}
