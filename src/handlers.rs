use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::ChatError;
use crate::prompt::{assemble, ChatTurn};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "devops-chatbot";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub message: String,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// A validated chat request
struct ChatInput {
    message: String,
    history: Vec<ChatTurn>,
}

fn validate(payload: Result<Json<ChatRequest>, JsonRejection>) -> Result<ChatInput, ChatError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected chat body: {}", rejection.body_text());
        ChatError::Validation("Invalid request body".to_string())
    })?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ChatError::Validation("No message provided".to_string()))?;

    Ok(ChatInput {
        message,
        history: request.history.unwrap_or_default(),
    })
}

/// `POST /api/chat`: one backend call per request, no retry
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let input = validate(payload)?;

    let span = info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        backend = state.llm.name()
    );

    respond(state, input).instrument(span).await
}

async fn respond(state: AppState, input: ChatInput) -> Result<Json<ChatResponse>, ChatError> {
    info!(history_turns = input.history.len(), "Handling chat request");
    let prompt = assemble(
        state.system_prompt,
        &input.history,
        &input.message,
        state.llm.prompt_style(),
    );
    debug!(style = ?prompt.style(), "Assembled prompt");
    let reply = state.llm.generate(&prompt).await?;
    info!(reply_chars = reply.len(), "Chat request completed");

    Ok(Json(ChatResponse {
        message: reply,
        success: true,
    }))
}

/// `GET /api/health`: static liveness answer, never touches the backend
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
