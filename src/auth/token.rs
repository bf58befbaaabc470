use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use super::{Principal, Role};

/// Why a credential was rejected. The variant is only ever logged; callers see
/// [`AuthFailure::public_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing")]
    Missing,
    #[error("malformed")]
    Malformed,
    #[error("expired")]
    Expired,
    #[error("bad_signature")]
    BadSignature,
    #[error("unexpected_algorithm")]
    UnexpectedAlgorithm,
    #[error("invalid_claims")]
    InvalidClaims,
}

impl AuthFailure {
    pub fn reason_code(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "missing",
            AuthFailure::Malformed => "malformed",
            AuthFailure::Expired => "expired",
            AuthFailure::BadSignature => "bad_signature",
            AuthFailure::UnexpectedAlgorithm => "unexpected_algorithm",
            AuthFailure::InvalidClaims => "invalid_claims",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "Missing authorization token",
            AuthFailure::Expired => "Token has expired",
            _ => "Invalid token",
        }
    }
}

// Claims are read loosely so that a wrong shape is reported as invalid_claims
// rather than as a decoding failure.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    email: Option<Value>,
    #[serde(default)]
    role: Option<Value>,
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked when present but not required
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies a raw `Authorization` header value of the form `Bearer <token>`.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Principal, AuthFailure> {
        let value = match header {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Err(AuthFailure::Missing),
        };

        let mut parts = value.split_whitespace();
        let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) => (scheme, token),
            _ => return Err(AuthFailure::Malformed),
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthFailure::Malformed);
        }

        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthFailure> {
        let data = decode::<RawClaims>(token, &self.key, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = data.claims;

        let subject_id = claims
            .user_id
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthFailure::InvalidClaims)?
            .to_string();

        let role = claims
            .role
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Role>().ok())
            .ok_or(AuthFailure::InvalidClaims)?;

        let email = claims
            .email
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Principal {
            subject_id,
            role,
            email,
        })
    }
}

fn classify(kind: &ErrorKind) -> AuthFailure {
    match kind {
        ErrorKind::ExpiredSignature => AuthFailure::Expired,
        ErrorKind::InvalidSignature => AuthFailure::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            AuthFailure::UnexpectedAlgorithm
        }
        ErrorKind::MissingRequiredClaim(_) => AuthFailure::InvalidClaims,
        _ => AuthFailure::Malformed,
    }
}
