//! Delivery through the Web3Forms form relay

use super::{LeadNotifier, NotifyError};
use crate::conversation::{LeadData, LeadSummary, Role, TranscriptEntry};
use crate::profile::Profile;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

const ENDPOINT: &str = "https://api.web3forms.com/submit";
const NOT_PROVIDED: &str = "No proporcionado";

pub struct Web3FormsNotifier {
    client: Client,
    access_key: String,
    profile: &'static Profile,
}

impl Web3FormsNotifier {
    pub fn new(access_key: String, profile: &'static Profile) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            access_key,
            profile,
        })
    }

    async fn submit(&self, form: &Submission<'_>) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(ENDPOINT)
            .header("Accept", "application/json")
            .json(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<RelayReply>(&body) {
            Ok(reply) if reply.success => Ok(()),
            Ok(reply) => Err(NotifyError::Rejected(reply.message)),
            Err(_) => Err(NotifyError::Rejected(format!("HTTP {status}: {body}"))),
        }
    }
}

#[async_trait]
impl LeadNotifier for Web3FormsNotifier {
    async fn notify(&self, summary: &LeadSummary) -> Result<(), NotifyError> {
        let lead = &summary.lead;
        let message = match &summary.note {
            Some(note) if summary.conversation.transcript.is_empty() => note.clone(),
            _ => format_transcript(&summary.conversation.transcript, Utc::now()),
        };
        let subject = self.profile.email_subject_for(lead);
        let from_name = format!("Chatbot {}", self.profile.business_name);
        let form = Submission {
            access_key: &self.access_key,
            subject: &subject,
            from_name: &from_name,
            ..Submission::for_lead(lead, &message)
        };
        tracing::info!(lead = %lead.email, "Submitting lead to Web3Forms");
        self.submit(&form).await
    }

    async fn send_test(&self) -> Result<(), NotifyError> {
        let subject = format!("✅ Test - Sistema {}", self.profile.business_name);
        let from_name = format!("Chatbot {}", self.profile.business_name);
        let form = Submission {
            access_key: &self.access_key,
            subject: &subject,
            from_name: &from_name,
            name: NOT_PROVIDED,
            email: self.profile.email,
            phone: NOT_PROVIDED,
            event_type: NOT_PROVIDED,
            message: "Mensaje de prueba: el envío de leads está configurado correctamente.",
        };
        self.submit(&form).await
    }

    fn name(&self) -> &'static str {
        "web3forms"
    }
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    access_key: &'a str,
    subject: &'a str,
    from_name: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    event_type: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayReply {
    success: bool,
    #[serde(default)]
    message: String,
}

impl<'a> Submission<'a> {
    /// Lead fields are validated upstream; only the event type is optional
    fn for_lead(lead: &'a LeadData, message: &'a str) -> Self {
        Self {
            access_key: "",
            subject: "",
            from_name: "",
            name: &lead.name,
            email: &lead.email,
            phone: &lead.phone,
            event_type: lead.event_type.as_deref().unwrap_or(NOT_PROVIDED),
            message,
        }
    }
}

/// Plain-text transcript for the relay's message field
fn format_transcript(entries: &[TranscriptEntry], now: DateTime<Utc>) -> String {
    let mut out = String::from("CONVERSACION DEL CHATBOT\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    for (i, entry) in entries.iter().enumerate() {
        let who = match entry.role {
            Role::User => "CLIENTE",
            Role::Model => "ASISTENTE",
        };
        let _ = write!(out, "[{}] {who}:\n{}\n\n", i + 1, entry.message);
    }
    out.push_str(&"=".repeat(50));
    let _ = write!(
        out,
        "\nTotal: {} mensajes\nFecha: {}\n",
        entries.len(),
        now.format("%d/%m/%Y %H:%M:%S UTC")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_transcript() {
        let entries = vec![
            TranscriptEntry {
                role: Role::Model,
                message: "¡Hola!".to_string(),
            },
            TranscriptEntry {
                role: Role::User,
                message: "Quiero cotizar".to_string(),
            },
        ];
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let text = format_transcript(&entries, now);
        let rule = "=".repeat(50);
        assert_eq!(
            text,
            format!(
                "CONVERSACION DEL CHATBOT\n{rule}\n\n[1] ASISTENTE:\n¡Hola!\n\n[2] CLIENTE:\nQuiero cotizar\n\n{rule}\nTotal: 2 mensajes\nFecha: 01/03/2025 12:30:00 UTC\n"
            )
        );
    }

    #[test]
    fn test_submission_from_lead() {
        let lead = LeadData {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5512345678".to_string(),
            event_type: None,
        };
        let form = Submission {
            access_key: "k",
            subject: "s",
            from_name: "f",
            ..Submission::for_lead(&lead, "m")
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["access_key"], "k");
        assert_eq!(value["name"], "Ana");
        assert_eq!(value["phone"], "5512345678");
        assert_eq!(value["event_type"], "No proporcionado");
        assert_eq!(value["message"], "m");

        let with_event = LeadData {
            event_type: Some("Boda".to_string()),
            ..lead
        };
        assert_eq!(Submission::for_lead(&with_event, "m").event_type, "Boda");
    }

    #[test]
    fn test_relay_reply_parsing() {
        let ok: RelayReply = serde_json::from_str(r#"{"success": true, "message": "Email sent"}"#).unwrap();
        assert!(ok.success);
        let bad: RelayReply = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!bad.success);
        assert!(bad.message.is_empty());
    }
}
