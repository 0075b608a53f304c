//! Project template lookup

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    extract::JsonBody,
    models::TemplatePrompt,
    state::AppState,
    templates::{Framework, framework_prompt},
};

/// Pick a starter template for the prompt
///
/// Failures are reported as `{"error": ...}` with a 200 status rather than
/// an HTTP error.
pub async fn template(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<TemplatePrompt>,
) -> Json<Value> {
    if payload.prompt.trim().is_empty() {
        return Json(json!({ "error": "Prompt is required" }));
    }

    match resolve(&state, &payload.prompt).await {
        Ok(template) => Json(json!({ "template": template })),
        Err(e) => {
            warn!("Template lookup failed: {:#}", e);
            Json(json!({ "error": e.to_string() }))
        }
    }
}

async fn resolve(state: &AppState, prompt: &str) -> anyhow::Result<Value> {
    let reply = state
        .text_generator
        .generate(&framework_prompt(prompt))
        .await?;

    let framework: Framework = reply.parse()?;
    info!("Prompt classified as {}", framework);

    Ok(state.templates.load(framework).await?)
}
