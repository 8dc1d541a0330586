//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Both endpoints identify the caller's session through a `session` cookie
//! minted here; the core never reads ambient request state. Errors ride
//! inside the normal 200 envelope so clients always receive structured JSON.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        chat_handler,
        clear_history_handler,
    ),
    components(
        schemas(ChatRequest, ChatResponse, ClearHistoryResponse)
    ),
    tags(
        (name = "Reading Coach API", description = "API endpoints for the English reading coach.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// The JSON body of a chat request.
#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// The chat response envelope. `full_content` and `file_path` are only
/// present on successful task turns.
#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Result of clearing the caller's chat history.
#[derive(Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub message: String,
}

//=========================================================================================
// Session Cookie Helpers
//=========================================================================================

const SESSION_COOKIE: &str = "session";
/// Cookie lifetime; matches the default chat-history retention window.
const SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Returns the caller's session id from the `session` cookie, minting a fresh
/// one when absent, along with the `Set-Cookie` value that refreshes it.
fn session_from_headers(headers: &HeaderMap) -> (String, String) {
    let existing = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|c| {
                c.trim()
                    .strip_prefix(&format!("{}=", SESSION_COOKIE))
                    .map(str::to_string)
            })
        });

    let session_id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, session_id, SESSION_MAX_AGE_SECS
    );
    (session_id, cookie)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Handle one chat turn for the caller's session.
///
/// The literal message "task" (any case) triggers reading generation; any
/// other text is answered as free-form, context-aware chat.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat turn handled; errors are reported inside the envelope", body = ChatResponse)
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let (session_id, cookie) = session_from_headers(&headers);

    let message = req.message.trim();
    if message.is_empty() {
        let body = ChatResponse {
            response: String::new(),
            full_content: None,
            file_path: None,
        };
        return ([(header::SET_COOKIE, cookie)], Json(body));
    }

    let body = match app_state.chat.handle_turn(&session_id, message).await {
        Ok(reply) => ChatResponse {
            response: reply.response,
            full_content: reply.full_content,
            file_path: reply.file_path.map(|p| p.display().to_string()),
        },
        Err(e) => {
            error!("chat turn failed for session {}: {:?}", session_id, e);
            ChatResponse {
                response: format!("Service error: {}", e),
                full_content: None,
                file_path: None,
            }
        }
    };

    ([(header::SET_COOKIE, cookie)], Json(body))
}

/// Delete all persisted chat history for the caller's session.
#[utoipa::path(
    post,
    path = "/api/clear_history",
    responses(
        (status = 200, description = "History cleared (or failure reported in the envelope)", body = ClearHistoryResponse)
    )
)]
pub async fn clear_history_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let (session_id, cookie) = session_from_headers(&headers);

    let body = match app_state.store.clear_session(&session_id).await {
        Ok(()) => ClearHistoryResponse {
            success: true,
            message: "Chat history cleared successfully.".to_string(),
        },
        Err(e) => {
            error!("failed to clear history for session {}: {:?}", session_id, e);
            ClearHistoryResponse {
                success: false,
                message: format!("Error: {}", e),
            }
        }
    };

    ([(header::SET_COOKIE, cookie)], Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_cookie_mints_a_session_and_sets_it() {
        let headers = HeaderMap::new();
        let (session_id, cookie) = session_from_headers(&headers);
        assert!(Uuid::parse_str(&session_id).is_ok());
        assert!(cookie.starts_with(&format!("session={}", session_id)));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn existing_cookie_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; lang=en"),
        );
        let (session_id, _) = session_from_headers(&headers);
        assert_eq!(session_id, "abc-123");
    }
}
