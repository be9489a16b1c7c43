use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred processing your request";
pub const TIMEOUT_ERROR_MESSAGE: &str =
    "The model took too long to respond. It may still be loading, please try again in a moment.";

/// Errors of the chat request lifecycle.
/// Backend and unexpected failures are logged in full and answered with a generic message.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed or missing input. The message is shown to the caller.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backend did not answer within the request timeout.
    #[error("backend timed out: {0}")]
    Timeout(String),

    /// The backend was reachable but failed or returned an unusable payload.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ChatError::Backend(_) | ChatError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Unexpected(format!("{:#}", err))
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ChatError::Validation(m) => json!({ "error": m }),
            ChatError::Timeout(detail) => {
                error!(error = %detail, "Error in chat endpoint: backend timeout");
                json!({ "error": TIMEOUT_ERROR_MESSAGE, "success": false })
            }
            ChatError::Backend(detail) => {
                error!(error = %detail, "Error in chat endpoint: backend failure");
                json!({ "error": GENERIC_ERROR_MESSAGE, "success": false })
            }
            ChatError::Unexpected(detail) => {
                error!(error = %detail, "Error in chat endpoint: unexpected failure");
                json!({ "error": GENERIC_ERROR_MESSAGE, "success": false })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_keeps_its_message() {
        let response = ChatError::Validation("No message provided".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "No message provided" }));
    }

    #[tokio::test]
    async fn timeout_maps_to_gateway_timeout() {
        let response = ChatError::Timeout("operation timed out".into()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], TIMEOUT_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn backend_detail_never_reaches_the_client() {
        let response = ChatError::Backend("Incorrect API key provided: sk-123".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], GENERIC_ERROR_MESSAGE);
        assert_eq!(body["success"], false);
        assert!(!body.to_string().contains("sk-123"));
    }

    #[tokio::test]
    async fn anyhow_errors_become_unexpected() {
        let err: ChatError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ChatError::Unexpected(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
