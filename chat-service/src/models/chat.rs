use serde::{Deserialize, Serialize};

/// Inbound body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Audience named by the caller; takes precedence over classification.
    #[serde(default)]
    pub role: Option<String>,
}

/// Outbound body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Present only when role classification is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_role: Option<String>,
}

/// Body of `GET /api/questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionList {
    pub role: String,
    pub questions: Vec<String>,
}
