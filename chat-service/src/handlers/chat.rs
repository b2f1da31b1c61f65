//! Chat endpoints.

use crate::models::{ChatRequest, ChatResponse, QuestionList, Role};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use portal_core::error::AppError;
use serde::Deserialize;

/// Error text for any body that does not carry a usable `message`.
pub const NO_MESSAGE_PROVIDED: &str = "No message provided.";

/// Answer one chat message.
///
/// Missing, malformed or message-less bodies are rejected with 400. Every
/// accepted message gets a 200, including when generation failed.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected chat request body");
        AppError::bad_request(NO_MESSAGE_PROVIDED)
    })?;

    let resolution = state
        .resolver
        .resolve(&request.message, request.role.as_deref())
        .await;

    let detected_role = state
        .resolver
        .is_role_aware()
        .then(|| resolution.audience.to_string());

    Ok(Json(ChatResponse {
        response: resolution.answer,
        detected_role,
    }))
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub role: Option<String>,
}

/// List the curated questions that match exactly for a role.
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<QuestionList>, AppError> {
    let role = if !state.resolver.is_role_aware() {
        Role::Default
    } else {
        match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => Role::General,
            Some(label) => label
                .parse::<Role>()
                .map_err(|e| AppError::not_found(e.to_string()))?,
        }
    };

    Ok(Json(QuestionList {
        role: role.to_string(),
        questions: state.resolver.table().questions(role),
    }))
}
