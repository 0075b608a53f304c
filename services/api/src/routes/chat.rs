//! Chat endpoint streaming a generated answer in chunks

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tokio_stream::StreamExt;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    extract::JsonBody,
    models::ChatRequest,
    state::AppState,
    streaming,
};

/// Answer the latest user message as a newline-delimited JSON stream
///
/// The full answer is generated before anything is sent, so an upstream
/// failure is reported as a plain 500 with no partial stream.
pub async fn chat(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ChatRequest>,
) -> ApiResult<Response> {
    let answer = state
        .text_generator
        .generate(request.latest_user_prompt())
        .await
        .map_err(|e| {
            error!("Chat {} generation failed: {}", request.id, e);
            ApiError::InternalServerError
        })?;

    let chunks = streaming::split_into_chunks(&answer);
    info!("Streaming chat {} in {} chunks", request.id, chunks.len());

    let lines = streaming::emit(chunks, state.chat_chunk_delay)
        .map(|chunk| streaming::to_line(&chunk));

    Ok((
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(lines),
    )
        .into_response())
}
