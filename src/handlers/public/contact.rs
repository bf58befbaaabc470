// handlers/public/contact.rs - POST /contact handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::JsonBody;
use crate::database::models::ContactForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn submit(State(state): State<AppState>, JsonBody(form): JsonBody<ContactForm>) -> ApiResult<Value> {
    state.contact.submit(form).await?;
    Ok(ApiResponse::ok(json!({ "message": "Thank you, your message has been sent" })))
}
