use anyhow::{anyhow, Context};
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{issue_token, Claims, Role, TokenVerifier};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

const DEFAULT_EXPIRY_HOURS: u64 = 24;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a signed bearer token")]
    Issue {
        #[arg(long, help = "Subject id carried in the user_id claim")]
        user_id: String,
        #[arg(long, help = "Role claim: admin or normal_user")]
        role: String,
        #[arg(long, help = "Optional email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS or 24)")]
        hours: Option<u64>,
    },

    #[command(about = "Verify a token and show the principal it carries")]
    Inspect {
        #[arg(help = "Bearer token")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

    match cmd {
        TokenCommands::Issue {
            user_id,
            role,
            email,
            hours,
        } => {
            let role: Role = role.parse().map_err(|e: String| anyhow!(e))?;
            let hours = hours.unwrap_or_else(default_expiry_hours);
            let claims = Claims::new(user_id, email, role, hours)?;
            let token = issue_token(&secret, &claims)?;

            let expires_at = Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();

            output_success(
                &output_format,
                "Token issued",
                Some(json!({
                    "token": token,
                    "user_id": claims.user_id,
                    "role": claims.role,
                    "expires_at": expires_at,
                })),
            )
        }
        TokenCommands::Inspect { token } => {
            let verifier = TokenVerifier::new(&secret);
            match verifier.verify(token.trim()) {
                Ok(principal) => output_success(
                    &output_format,
                    "Token is valid",
                    Some(json!({
                        "user_id": principal.subject_id,
                        "role": principal.role,
                        "email": principal.email,
                    })),
                ),
                Err(failure) => {
                    output_error(&output_format, failure.public_message(), Some(failure.reason_code()))?;
                    Err(anyhow!("token rejected: {}", failure.reason_code()))
                }
            }
        }
    }
}

fn default_expiry_hours() -> u64 {
    std::env::var("SECURITY_JWT_EXPIRY_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXPIRY_HOURS)
}
