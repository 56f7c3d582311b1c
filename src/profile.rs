//! Per-deployment business data
//!
//! A profile carries everything that differs between the sites sharing this
//! backend: brand and contact details, the model's system prompt, canned
//! replies, summary triggers and the packages sales can recommend.

mod entertainment;
mod logistics;

use crate::conversation::LeadData;
use crate::render::{DecorativeTerm, PhoneLink, RenderConfig};

/// An ordered keyword rule: the first rule whose keywords match wins.
///
/// Keywords match whole words; a trailing `*` turns a keyword into a stem
/// matched at the start of a word (`cotiz*` matches "cotización").
#[derive(Debug)]
pub struct RuleDef {
    pub keywords: &'static [&'static str],
    pub replies: &'static [&'static str],
}

#[derive(Debug)]
pub struct PackageDef {
    pub name: &'static str,
    pub reason: &'static str,
    pub keywords: &'static [&'static str],
}

#[derive(Debug)]
pub struct DecorationDef {
    pub pattern: &'static str,
    pub glyph: &'static str,
}

#[derive(Debug)]
pub struct Profile {
    pub key: &'static str,
    pub business_name: &'static str,
    pub assistant_name: &'static str,
    pub tagline: &'static str,
    pub website: &'static str,
    pub address: &'static str,
    pub phone_display: &'static str,
    /// Digits only, with country code
    pub whatsapp_e164: &'static str,
    /// Prefixed to lead phone numbers for WhatsApp links
    pub country_code: &'static str,
    pub email: &'static str,
    pub system_prompt: &'static str,
    pub greeting: &'static str,
    pub rules: &'static [RuleDef],
    pub fallbacks: &'static [&'static str],
    pub apology: &'static str,
    pub summary_triggers: &'static [&'static str],
    pub high_intent_keywords: &'static [&'static str],
    pub decorative_terms: &'static [DecorationDef],
    pub packages: &'static [PackageDef],
    pub default_package: &'static str,
    /// Try canned rules before the model
    pub rules_first: bool,
    /// `{name}` is replaced with the lead's name
    pub email_subject: &'static str,
    /// Opening line of the WhatsApp message sales sends to the lead
    pub whatsapp_greeting: &'static str,
    pub follow_up: &'static [&'static str],
}

pub const PROFILE_KEYS: &[&str] = &["logistics", "entertainment"];

impl Profile {
    pub fn by_key(key: &str) -> Option<&'static Profile> {
        match key {
            "logistics" => Some(&logistics::PROFILE),
            "entertainment" => Some(&entertainment::PROFILE),
            _ => None,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            phone: Some(PhoneLink {
                display: self.phone_display.to_string(),
                whatsapp_e164: self.whatsapp_e164.to_string(),
            }),
            company_email: Some(self.email.to_string()),
            decorative_terms: self
                .decorative_terms
                .iter()
                .map(|d| DecorativeTerm::new(d.pattern, d.glyph))
                .collect(),
        }
    }

    /// System instruction for the model, with the lead's details when known
    pub fn system_prompt_for(&self, lead: Option<&LeadData>) -> String {
        let mut prompt = self.system_prompt.to_string();
        if let Some(lead) = lead {
            prompt.push_str(&format!(
                "\n\nLos datos del usuario son: Nombre: {}, Correo electrónico: {}, Número de teléfono: {}.",
                lead.name, lead.email, lead.phone
            ));
            if let Some(event) = &lead.event_type {
                prompt.push_str(&format!(" Tipo de evento: {event}."));
            }
        }
        prompt
    }

    pub fn email_subject_for(&self, lead: &LeadData) -> String {
        self.email_subject.replace("{name}", &lead.name)
    }
}
