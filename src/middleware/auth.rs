use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthFailure, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// Outcome of reading the bearer credential, stored in request extensions
/// for the guard and the extractors.
#[derive(Debug, Clone, Default)]
pub struct RequestIdentity {
    pub principal: Option<Principal>,
    pub failure: Option<AuthFailure>,
}

impl RequestIdentity {
    /// Message for a 401; never more specific than missing, expired or invalid.
    pub fn public_message(&self) -> &'static str {
        self.failure.unwrap_or(AuthFailure::Missing).public_message()
    }
}

/// Verifies the `Authorization` header on every request. It never rejects:
/// public routes treat a bad credential as a guest, and the route guard
/// decides everything else.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let verified = match request.headers().get(AUTHORIZATION) {
        None => state.verifier.verify_header(None),
        Some(value) => match value.to_str() {
            Ok(value) => state.verifier.verify_header(Some(value)),
            Err(_) => Err(AuthFailure::Malformed),
        },
    };

    let identity = match verified {
        Ok(principal) => RequestIdentity {
            principal: Some(principal),
            failure: None,
        },
        Err(failure) => {
            if failure != AuthFailure::Missing {
                tracing::debug!(reason = failure.reason_code(), path = %request.uri().path(), "credential rejected");
            }
            RequestIdentity {
                principal: None,
                failure: Some(failure),
            }
        }
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts.extensions.get::<RequestIdentity>().cloned().unwrap_or_default();
        match identity.principal {
            Some(principal) => Ok(principal),
            None => Err(ApiError::unauthorized(identity.public_message())),
        }
    }
}
