//! Environment configuration

use crate::notify::SmtpConfig;
use crate::profile::{Profile, PROFILE_KEYS};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PROFILE: &str = "logistics";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SUMMARY_DELAY_MS: u64 = 2000;

/// Sessions live in memory instead of SQLite when the database path is this
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown profile {0:?} (expected one of {keys:?})", keys = PROFILE_KEYS)]
    UnknownProfile(String),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub gateway: Option<String>,
}

/// Where lead summaries go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    Smtp(SmtpConfig),
    Web3Forms { access_key: String },
    None,
}

#[derive(Debug)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub profile: &'static Profile,
    pub gemini: Option<GeminiConfig>,
    pub notifier: NotifierConfig,
    pub summary_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = parse_or(&get, "LEADCHAT_PORT", DEFAULT_PORT)?;

        let db_path = get("LEADCHAT_DB_PATH").map_or_else(
            || {
                let home = get("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".leadchat").join("sessions.db")
            },
            PathBuf::from,
        );

        let profile_key = get("LEADCHAT_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let profile =
            Profile::by_key(&profile_key).ok_or(ConfigError::UnknownProfile(profile_key))?;

        let gateway = get("LLM_GATEWAY");
        let gemini = match (get("GEMINI_API_KEY"), gateway) {
            (Some(api_key), gateway) => Some(GeminiConfig {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                gateway,
            }),
            // The gateway authenticates on our behalf
            (None, Some(gateway)) => Some(GeminiConfig {
                api_key: "implicit".to_string(),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                gateway: Some(gateway),
            }),
            (None, None) => None,
        };

        let notifier = notifier_config(&get, profile)?;

        let summary_delay = Duration::from_millis(parse_or(
            &get,
            "SUMMARY_DELAY_MS",
            DEFAULT_SUMMARY_DELAY_MS,
        )?);

        Ok(Self {
            port,
            db_path,
            profile,
            gemini,
            notifier,
            summary_delay,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_DB
    }
}

/// SMTP when fully configured, else Web3Forms when keyed, else nothing
fn notifier_config(
    get: &impl Fn(&str) -> Option<String>,
    profile: &Profile,
) -> Result<NotifierConfig, ConfigError> {
    if let (Some(username), Some(password), Some(to_email)) =
        (get("SMTP_USERNAME"), get("SMTP_PASSWORD"), get("LEAD_TO_EMAIL"))
    {
        return Ok(NotifierConfig::Smtp(SmtpConfig {
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: parse_or(get, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            from_email: get("SMTP_FROM_EMAIL").unwrap_or_else(|| username.clone()),
            from_name: get("SMTP_FROM_NAME")
                .unwrap_or_else(|| format!("Chatbot {}", profile.business_name)),
            username,
            password,
            to_email,
        }));
    }
    if let Some(access_key) = get("WEB3FORMS_ACCESS_KEY") {
        return Ok(NotifierConfig::Web3Forms { access_key });
    }
    Ok(NotifierConfig::None)
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
