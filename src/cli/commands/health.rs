use anyhow::{anyhow, Context};
use serde_json::{json, Value};
use std::time::Duration;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn handle(base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            &output_format,
            "Server is healthy",
            Some(json!({ "url": url, "status": status.as_u16(), "body": body })),
        )
    } else {
        output_error(
            &output_format,
            &format!("Server reported {} at {}", status, url),
            Some("unhealthy"),
        )?;
        Err(anyhow!("health check failed with status {}", status.as_u16()))
    }
}
