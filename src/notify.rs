//! Lead notification
//!
//! Once a conversation looks like a sales opportunity, a summary goes to the
//! sales inbox through whichever channel is configured: an SMTP relay, the
//! Web3Forms relay, or nowhere (logged only).

mod email;
mod recommend;
mod smtp;
mod web3forms;

pub use smtp::{SmtpConfig, SmtpNotifier};
pub use web3forms::Web3FormsNotifier;

use crate::conversation::LeadSummary;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SMTP relay failed: {0}")]
    Smtp(String),
    #[error("Relay rejected the submission: {0}")]
    Rejected(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A channel that delivers lead summaries to sales
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, summary: &LeadSummary) -> Result<(), NotifyError>;

    /// Send a message that only proves the channel works
    async fn send_test(&self) -> Result<(), NotifyError>;

    fn name(&self) -> &'static str;
}

/// Used when no channel is configured
pub struct NoopNotifier;

#[async_trait]
impl LeadNotifier for NoopNotifier {
    async fn notify(&self, summary: &LeadSummary) -> Result<(), NotifyError> {
        tracing::warn!(
            lead = %summary.lead.email,
            messages = summary.conversation.conversation_length,
            "No notifier configured, lead summary dropped"
        );
        Ok(())
    }

    async fn send_test(&self) -> Result<(), NotifyError> {
        tracing::warn!("No notifier configured, test message dropped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Send the configuration check message through the active notifier
pub async fn test_email(notifier: &dyn LeadNotifier) -> Result<(), NotifyError> {
    let result = notifier.send_test().await;
    match &result {
        Ok(()) => tracing::info!(notifier = notifier.name(), "Test message sent"),
        Err(e) => tracing::error!(notifier = notifier.name(), error = %e, "Test message failed"),
    }
    result
}

/// Send the summary after `delay` on a background task. Failures are logged;
/// the session's latch is already claimed so there is no retry.
pub fn dispatch_summary(
    notifier: Arc<dyn LeadNotifier>,
    summary: LeadSummary,
    delay: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match notifier.notify(&summary).await {
            Ok(()) => tracing::info!(
                notifier = notifier.name(),
                lead = %summary.lead.email,
                "Lead summary sent"
            ),
            Err(e) => tracing::error!(
                notifier = notifier.name(),
                lead = %summary.lead.email,
                error = %e,
                "Lead summary failed"
            ),
        }
    })
}
