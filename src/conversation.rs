//! Conversation model: turns, lead data, the summary latch and derived summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User messages shorter than this do not count toward a summary
const MIN_QUALIFYING_CHARS: usize = 11;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message in the conversation.
///
/// Serialized in the Gemini `contents` shape:
/// `{"role": "user", "parts": [{"text": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTurn", into = "WireTurn")]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct WireTurn {
    role: Role,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Clone, Serialize, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: String,
}

impl From<WireTurn> for ChatTurn {
    fn from(wire: WireTurn) -> Self {
        let text = wire
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        Self {
            role: wire.role,
            text,
        }
    }
}

impl From<ChatTurn> for WireTurn {
    fn from(turn: ChatTurn) -> Self {
        Self {
            role: turn.role,
            parts: vec![WirePart { text: turn.text }],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeadError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
}

/// Visitor contact details captured before the chat starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadData {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, alias = "eventType", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl LeadData {
    /// Trim every field and require name, email and phone
    pub fn validated(self) -> Result<Self, LeadError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let phone = self.phone.trim().to_string();
        if name.is_empty() {
            return Err(LeadError::Missing("name"));
        }
        if email.is_empty() {
            return Err(LeadError::Missing("email"));
        }
        if phone.is_empty() {
            return Err(LeadError::Missing("phone"));
        }
        let event_type = self
            .event_type
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Ok(Self {
            name,
            email,
            phone,
            event_type,
        })
    }
}

/// One-shot latch guarding the sales summary.
///
/// `NotSent -> Sent` happens at most once, and is claimed before the send is
/// attempted. There is no way back to `NotSent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryState {
    #[default]
    NotSent,
    Sent { at: DateTime<Utc> },
}

impl SummaryState {
    /// Claim the latch. Returns true only for the call that flips it.
    pub fn claim(&mut self, now: DateTime<Utc>) -> bool {
        match self {
            SummaryState::NotSent => {
                *self = SummaryState::Sent { at: now };
                true
            }
            SummaryState::Sent { .. } => false,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SummaryState::Sent { .. })
    }
}

/// Everything persisted for one chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub lead: LeadData,
    pub turns: Vec<ChatTurn>,
    pub chat_active: bool,
    #[serde(default)]
    pub summary: SummaryState,
    pub started_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(id: impl Into<String>, lead: LeadData, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            lead,
            turns: Vec::new(),
            chat_active: true,
            summary: SummaryState::NotSent,
            started_at: now,
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::user(text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::model(text));
    }

    pub fn user_messages(&self) -> impl Iterator<Item = &str> {
        self.turns
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
    }

    /// User messages long enough to say something about the visitor's needs
    pub fn qualifying_user_messages(&self) -> Vec<&str> {
        self.user_messages()
            .filter(|text| text.chars().count() >= MIN_QUALIFYING_CHARS)
            .collect()
    }

    /// Three qualifying messages, or two when one mentions a trigger keyword
    pub fn should_send_summary(&self, triggers: &[&str]) -> bool {
        let messages = self.qualifying_user_messages();
        let has_trigger = messages
            .iter()
            .any(|m| contains_any_keyword(m, triggers));
        messages.len() >= 3 || (messages.len() >= 2 && has_trigger)
    }
}

/// Case-insensitive substring match against any keyword
pub fn contains_any_keyword(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// Whether a single message signals intent to buy
pub fn is_high_intent(text: &str, keywords: &[&str]) -> bool {
    contains_any_keyword(text, keywords)
}

/// A transcript line for the sales summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub message: String,
}

/// Conversation facts handed to the lead notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub user_messages: Vec<String>,
    pub bot_messages: Vec<String>,
    pub transcript: Vec<TranscriptEntry>,
    pub conversation_length: usize,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

impl ConversationSummary {
    pub fn from_session(session: &SessionState, now: DateTime<Utc>) -> Self {
        let user_messages: Vec<String> = session
            .qualifying_user_messages()
            .into_iter()
            .map(str::to_string)
            .collect();
        let bot_messages: Vec<String> = session
            .turns
            .iter()
            .filter(|t| t.role == Role::Model)
            .map(|t| t.text.clone())
            .collect();
        let transcript = session
            .turns
            .iter()
            .map(|t| TranscriptEntry {
                role: t.role,
                message: t.text.clone(),
            })
            .collect();

        Self {
            conversation_length: user_messages.len() + bot_messages.len(),
            user_messages,
            bot_messages,
            transcript,
            started_at: session.started_at,
            generated_at: now,
        }
    }

    /// Summary for a lead submitted without a stored conversation
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            user_messages: Vec::new(),
            bot_messages: Vec::new(),
            transcript: Vec::new(),
            conversation_length: 0,
            started_at: now,
            generated_at: now,
        }
    }
}

/// What the notifier sends to sales
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadSummary {
    pub lead: LeadData,
    pub conversation: ConversationSummary,
    /// Free-form summary supplied by the widget instead of a transcript
    pub note: Option<String>,
}

impl LeadSummary {
    pub fn from_session(session: &SessionState, now: DateTime<Utc>) -> Self {
        Self {
            lead: session.lead.clone(),
            conversation: ConversationSummary::from_session(session, now),
            note: None,
        }
    }
}
