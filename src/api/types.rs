//! API request and response types

use crate::conversation::{ChatTurn, LeadData, Role};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for a chat turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub html: String,
    pub source: crate::responder::ReplySource,
    pub high_intent: bool,
    pub summary_sent: bool,
}

/// A stored turn as displayed by the widget; model turns carry rendered HTML
#[derive(Debug, Serialize)]
pub struct TurnView {
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Response with a session and its rendered turns
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub lead: LeadData,
    pub turns: Vec<TurnView>,
    pub chat_active: bool,
    pub summary_sent: bool,
}

/// Stateless chat request in the Gemini `contents` shape.
///
/// `history` is optional so that a missing field gets the same answer as a
/// malformed one.
#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    pub history: Option<Vec<ChatTurn>>,
    pub lead: Option<LeadData>,
}

/// Gemini-compatible reply
#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    pub candidates: Vec<Candidate>,
    #[serde(rename = "highIntent", skip_serializing_if = "std::ops::Not::not")]
    pub high_intent: bool,
}

#[derive(Debug, Serialize)]
pub struct Candidate {
    pub content: ChatTurn,
}

/// Request to render text
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
}

/// Rendered HTML fragment
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

/// Lead submitted directly by the widget
#[derive(Debug, Deserialize)]
pub struct LeadRequest {
    #[serde(flatten)]
    pub lead: LeadData,
    #[serde(default, alias = "conversationSummary")]
    pub conversation_summary: Option<String>,
}

/// Response for notification actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub notifier: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
