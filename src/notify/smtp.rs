//! SMTP delivery through the system `curl`

use super::email::{compose_email, compose_test_email, LeadEmail};
use super::{LeadNotifier, NotifyError};
use crate::conversation::LeadSummary;
use crate::profile::Profile;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const SEND_TIMEOUT_SECS: &str = "30";
const LINE_WIDTH: usize = 76;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
}

impl SmtpConfig {
    /// Port 465 speaks TLS from the first byte; anything else upgrades with STARTTLS
    fn url(&self) -> String {
        if self.port == 465 {
            format!("smtps://{}:{}", self.host, self.port)
        } else {
            format!("smtp://{}:{}", self.host, self.port)
        }
    }
}

pub struct SmtpNotifier {
    config: SmtpConfig,
    profile: &'static Profile,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig, profile: &'static Profile) -> Self {
        Self { config, profile }
    }

    async fn send(&self, email: &LeadEmail, reply_to: Option<&str>) -> Result<(), NotifyError> {
        let message = build_message(&self.config, email, reply_to);
        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            to = %self.config.to_email,
            "Sending email via SMTP"
        );

        let mut child = Command::new("curl")
            .args([
                "--silent",
                "--show-error",
                "--ssl-reqd",
                "--max-time",
                SEND_TIMEOUT_SECS,
                "--url",
                &self.config.url(),
                "--user",
                &format!("{}:{}", self.config.username, self.config.password),
                "--mail-from",
                &self.config.from_email,
                "--mail-rcpt",
                &self.config.to_email,
                "-T",
                "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(message.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(NotifyError::Smtp(stderr.trim().to_string()))
        }
    }
}

#[async_trait]
impl LeadNotifier for SmtpNotifier {
    async fn notify(&self, summary: &LeadSummary) -> Result<(), NotifyError> {
        let email = compose_email(self.profile, summary, Utc::now());
        self.send(&email, Some(&summary.lead.email)).await
    }

    async fn send_test(&self) -> Result<(), NotifyError> {
        let email = compose_test_email(self.profile, self.name(), Utc::now());
        self.send(&email, None).await
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// RFC 5322 message with `multipart/alternative` text and HTML parts
fn build_message(config: &SmtpConfig, email: &LeadEmail, reply_to: Option<&str>) -> String {
    let boundary = format!("=_leadchat_{}", uuid::Uuid::new_v4().simple());
    let domain = config.from_email.rsplit('@').next().unwrap_or("localhost");

    let mut headers = vec![
        format!("From: {} <{}>", encode_header(&config.from_name), config.from_email),
        format!("To: <{}>", config.to_email),
    ];
    if let Some(reply_to) = reply_to.filter(|r| is_header_safe(r)) {
        headers.push(format!("Reply-To: <{reply_to}>"));
    }
    headers.extend([
        format!("Subject: {}", encode_header(&email.subject)),
        format!("Date: {}", Utc::now().to_rfc2822()),
        format!("Message-ID: <{}@{domain}>", uuid::Uuid::new_v4()),
        "MIME-Version: 1.0".to_string(),
        format!("Content-Type: multipart/alternative; boundary=\"{boundary}\""),
    ]);

    let mut message = headers.join("\r\n");
    message.push_str("\r\n\r\n");
    for (content_type, body) in [("text/plain", &email.text), ("text/html", &email.html)] {
        message.push_str(&format!(
            "--{boundary}\r\nContent-Type: {content_type}; charset=UTF-8\r\nContent-Transfer-Encoding: base64\r\n\r\n{}\r\n",
            base64_lines(body)
        ));
    }
    message.push_str(&format!("--{boundary}--\r\n"));
    message
}

/// RFC 2047 encoded-word when the value is not plain ASCII
fn encode_header(value: &str) -> String {
    if value.is_ascii() && is_header_safe(value) {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

fn is_header_safe(value: &str) -> bool {
    !value.contains(['\r', '\n'])
}

fn base64_lines(body: &str) -> String {
    let encoded = STANDARD.encode(body);
    encoded
        .as_bytes()
        .chunks(LINE_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n")
}
