//! Produces the assistant's next message
//!
//! Sources are tried in order until one yields text: the model, the keyword
//! rules (or rules first when the profile asks for it), a random fallback
//! reply and finally the profile's fixed apology. Responding never fails.

mod rules;

pub use rules::{RuleEngine, RuleError};

use crate::conversation::{ChatTurn, LeadData, Role};
use crate::llm::{LlmMessage, LlmRequest, LlmService};
use crate::profile::Profile;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Rule,
    Fallback,
    Apology,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

pub struct Responder {
    llm: Option<Arc<dyn LlmService>>,
    rules: RuleEngine,
    profile: &'static Profile,
}

impl Responder {
    pub fn new(profile: &'static Profile, llm: Option<Arc<dyn LlmService>>) -> Result<Self, RuleError> {
        let rules = RuleEngine::new(profile.rules)?;
        if llm.is_none() && rules.is_empty() {
            tracing::warn!(profile = profile.key, "No model and no keyword rules; replies come from fallbacks only");
        }
        Ok(Self {
            llm,
            rules,
            profile,
        })
    }

    pub fn has_model(&self) -> bool {
        self.llm.is_some()
    }

    /// Next assistant message for `history`, which ends with the user's turn
    pub async fn respond(&self, history: &[ChatTurn], lead: Option<&LeadData>) -> Reply {
        let last_user = history
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map_or("", |t| t.text.as_str());

        let reply = if self.profile.rules_first {
            match self.from_rules(last_user) {
                Some(reply) => Some(reply),
                None => self.from_model(history, lead).await,
            }
        } else {
            match self.from_model(history, lead).await {
                Some(reply) => Some(reply),
                None => self.from_rules(last_user),
            }
        };

        let reply = reply
            .or_else(|| self.from_fallbacks())
            .unwrap_or_else(|| Reply::new(self.profile.apology, ReplySource::Apology));

        tracing::debug!(source = ?reply.source, chars = reply.text.len(), "Reply chosen");
        reply
    }

    async fn from_model(&self, history: &[ChatTurn], lead: Option<&LeadData>) -> Option<Reply> {
        let llm = self.llm.as_ref()?;
        let request = LlmRequest::new(
            Some(self.profile.system_prompt_for(lead)),
            history.iter().map(LlmMessage::from).collect(),
        );
        match llm.complete(&request).await {
            Ok(response) => Some(Reply::new(response.text, ReplySource::Model)),
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e, "Model unavailable, falling back");
                None
            }
        }
    }

    fn from_rules(&self, text: &str) -> Option<Reply> {
        self.rules
            .reply(text)
            .map(|text| Reply::new(text, ReplySource::Rule))
    }

    fn from_fallbacks(&self) -> Option<Reply> {
        self.profile
            .fallbacks
            .choose(&mut rand::thread_rng())
            .map(|text| Reply::new(*text, ReplySource::Fallback))
    }
}
