//! HTTP handlers for the triage endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::{
    AdvanceConversationError, TriageError, TriageRequest, TriageService,
};
use crate::domain::foundation::{ErrorCode, SessionId, UserId};

use super::dto::{ErrorResponse, TriageRequestBody, TriageResponseBody};

/// Shared state for the triage routes.
#[derive(Clone)]
pub struct TriageAppState {
    pub service: Arc<TriageService>,
}

impl TriageAppState {
    pub fn new(service: Arc<TriageService>) -> Self {
        Self { service }
    }
}

/// POST /api/triage - advance a triage conversation by one turn.
pub async fn post_triage(
    State(state): State<TriageAppState>,
    Json(body): Json<TriageRequestBody>,
) -> Response {
    let session_id = match &body.session_id {
        Some(raw) => match raw.parse::<SessionId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(ErrorCode::InvalidFormat, "Invalid sessionId")),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let user_id = body
        .user_id
        .as_deref()
        .and_then(|raw| UserId::new(raw).ok());

    let request = TriageRequest {
        session_id,
        description: body.description.clone(),
        images: body.images.clone(),
        contact: body.contact_info(),
        trade: body.trade.clone(),
        user_id,
    };

    match state.service.triage(request).await {
        Ok(response) => {
            let body: TriageResponseBody = response.into();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(TriageError::EmptyMessage) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                ErrorCode::EmptyField,
                "Description must not be empty",
            )),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "triage request failed");
            let code = match &e {
                TriageError::Conversation(AdvanceConversationError::Classifier(_)) => {
                    ErrorCode::ClassifierError
                }
                TriageError::Conversation(AdvanceConversationError::Store(_)) => {
                    ErrorCode::StoreError
                }
                _ => ErrorCode::InternalError,
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    code,
                    "Something went wrong, please try again",
                )),
            )
                .into_response()
        }
    }
}

/// GET /health - liveness probe.
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}
