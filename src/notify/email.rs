//! Lead summary email composition

use super::recommend::recommend_package;
use crate::conversation::{LeadSummary, Role};
use crate::profile::Profile;
use crate::render::escape_html;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

const RECENT_QUERIES: usize = 3;
const HISTORY_ENTRIES: usize = 10;
const BOT_EXCERPT_CHARS: usize = 200;

/// A composed message with HTML and plaintext bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Build the sales email for a lead. All visitor-supplied text is escaped.
pub fn compose_email(profile: &Profile, summary: &LeadSummary, now: DateTime<Utc>) -> LeadEmail {
    let lead = &summary.lead;
    let conv = &summary.conversation;
    let date = now.format("%d/%m/%Y %H:%M:%S UTC").to_string();
    let event_type = lead.event_type.as_deref().unwrap_or("No especificado");
    let recent: Vec<&String> = last_n(&conv.user_messages, RECENT_QUERIES).iter().collect();
    let history = last_n(&conv.transcript, HISTORY_ENTRIES);
    let package = recommend_package(profile.packages, &conv.user_messages, profile.default_package);
    let phone_digits = digits(&lead.phone);
    let whatsapp = lead_whatsapp_link(profile, &lead.name, &lead.phone);
    let bot_count = conv.bot_messages.len();
    let user_count = conv.user_messages.len();

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html><html><head><meta charset="UTF-8"></head><body style="font-family: Arial, sans-serif; color: #333; line-height: 1.6;">
<div style="max-width: 640px; margin: 0 auto;">
<div style="background: #002131; color: #ffffff; padding: 24px; text-align: center;">
<h1 style="margin: 0;">{business}</h1>
<p style="margin: 4px 0 0;">Nuevo lead generado por {assistant}</p>
<p style="margin: 4px 0 0;">{date}</p>
</div>
<div style="padding: 20px;">
<h2>Información del Cliente</h2>
<p><strong>Nombre:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Teléfono:</strong> {phone}</p>
<p><strong>Tipo de evento:</strong> {event}</p>
<p><strong>Mensajes:</strong> {total} en total ({user_count} del cliente, {bot_count} del asistente)</p>
"#,
        business = escape_html(profile.business_name),
        assistant = escape_html(profile.assistant_name),
        name = escape_html(&lead.name),
        email = escape_html(&lead.email),
        phone = escape_html(&lead.phone),
        event = escape_html(event_type),
        total = conv.conversation_length,
    );

    if let Some(package) = &package {
        let _ = write!(
            html,
            "<h2>Paquete recomendado</h2>\n<p>Basado en la conversación, el cliente podría estar interesado en: <strong>{}</strong></p>\n",
            escape_html(package)
        );
    }

    if let Some(note) = &summary.note {
        let _ = write!(
            html,
            "<h2>Resumen enviado por el cliente</h2>\n<p>{}</p>\n",
            escape_html(note).replace('\n', "<br>")
        );
    }

    if !recent.is_empty() {
        html.push_str("<h3>💬 Últimas Consultas del Cliente</h3>\n<ul>\n");
        for query in &recent {
            let _ = writeln!(html, "<li>{}</li>", escape_html(query));
        }
        html.push_str("</ul>\n");
    }

    if !history.is_empty() {
        html.push_str("<h3>📝 Historial de Conversación</h3>\n");
        for entry in history {
            let (who, message) = match entry.role {
                Role::User => ("Cliente", entry.message.clone()),
                Role::Model => ("Asistente", excerpt(&entry.message, BOT_EXCERPT_CHARS)),
            };
            let _ = writeln!(
                html,
                "<p><strong>{who}:</strong> {}</p>",
                escape_html(&message)
            );
        }
    }

    if !profile.follow_up.is_empty() {
        html.push_str(
            "<div style=\"background: #fff9e6; border: 1px solid #f4d03f; padding: 16px; border-radius: 8px;\">\n<strong>🎯 Acción Recomendada:</strong>\n<ul>\n",
        );
        for step in profile.follow_up {
            let _ = writeln!(html, "<li>{}</li>", escape_html(step));
        }
        html.push_str("</ul>\n</div>\n");
    }

    let _ = write!(
        html,
        r#"<h3>Contactar Cliente</h3>
<p>
<a href="mailto:{email_href}" style="{CTA_STYLE}">📧 Email</a>
<a href="tel:{phone_digits}" style="{CTA_STYLE}">📞 Llamar</a>
<a href="{whatsapp}" style="{CTA_STYLE}">💬 WhatsApp</a>
</p>
</div>
<div style="background: #f8feff; padding: 20px; text-align: center; font-size: 13px; color: #67c4d5;">
<p><strong style="color: #002131;">{business}</strong><br>{tagline}</p>
<p>{address}<br>📞 {company_phone} | 📧 {company_email} | 🌐 {website}</p>
<p>Este email fue generado automáticamente por el chatbot de {business}.</p>
</div>
</div></body></html>"#,
        email_href = escape_html(&lead.email),
        whatsapp = escape_html(&whatsapp),
        business = escape_html(profile.business_name),
        tagline = escape_html(profile.tagline),
        address = escape_html(profile.address),
        company_phone = escape_html(profile.phone_display),
        company_email = escape_html(profile.email),
        website = escape_html(profile.website),
    );

    let mut text = String::new();
    let _ = writeln!(text, "NUEVO LEAD - {}", profile.business_name);
    let _ = writeln!(text, "Fecha: {date}\n");
    let _ = writeln!(text, "INFORMACIÓN DEL CLIENTE");
    let _ = writeln!(text, "Nombre: {}", lead.name);
    let _ = writeln!(text, "Email: {}", lead.email);
    let _ = writeln!(text, "Teléfono: {}", lead.phone);
    let _ = writeln!(text, "Tipo de evento: {event_type}");
    let _ = writeln!(
        text,
        "Mensajes: {} en total ({user_count} del cliente, {bot_count} del asistente)",
        conv.conversation_length
    );
    if let Some(package) = &package {
        let _ = writeln!(text, "\nPAQUETE RECOMENDADO: {package}");
    }
    if let Some(note) = &summary.note {
        let _ = writeln!(text, "\nRESUMEN DEL CLIENTE:\n{note}");
    }
    if !recent.is_empty() {
        let _ = writeln!(text, "\nÚLTIMAS CONSULTAS:");
        for (i, query) in recent.iter().enumerate() {
            let _ = writeln!(text, "{}. {query}", i + 1);
        }
    }
    if !profile.follow_up.is_empty() {
        let _ = writeln!(text, "\n🎯 ACCIÓN RECOMENDADA:");
        for step in profile.follow_up {
            let _ = writeln!(text, "- {step}");
        }
    }
    let _ = writeln!(text, "\nCONTACTAR CLIENTE:");
    let _ = writeln!(text, "📧 Email: {}", lead.email);
    let _ = writeln!(text, "📞 Teléfono: {}", lead.phone);
    let _ = writeln!(text, "💬 WhatsApp: {whatsapp}");
    let _ = writeln!(
        text,
        "\n{} | {} | {} | {}",
        profile.business_name, profile.phone_display, profile.email, profile.website
    );

    LeadEmail {
        subject: profile.email_subject_for(lead),
        html,
        text,
    }
}

/// A message that only proves the delivery channel works
pub fn compose_test_email(profile: &Profile, channel: &str, now: DateTime<Utc>) -> LeadEmail {
    let date = now.format("%d/%m/%Y %H:%M:%S UTC").to_string();
    let html = format!(
        r#"<!DOCTYPE html><html><head><meta charset="UTF-8"></head><body style="font-family: Arial, sans-serif;">
<h2 style="color: #002131;">✅ Sistema de Email Funcionando</h2>
<p>Este es un mensaje de prueba del chatbot de <strong>{business}</strong>.</p>
<p><strong>Canal:</strong> {channel}<br><strong>Fecha:</strong> {date}</p>
</body></html>"#,
        business = escape_html(profile.business_name),
        channel = escape_html(channel),
    );
    let text = format!(
        "Sistema de Email Funcionando\n\nEste es un mensaje de prueba del chatbot de {}.\nCanal: {channel}\nFecha: {date}\n",
        profile.business_name
    );
    LeadEmail {
        subject: format!("✅ Test Email - Sistema {}", profile.business_name),
        html,
        text,
    }
}

const CTA_STYLE: &str = "display: inline-block; padding: 10px 18px; margin: 4px; background: #67c4d5; color: #ffffff; text-decoration: none; border-radius: 6px;";

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// First `max` characters, with an ellipsis when cut
fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// wa.me link to the lead with a prefilled greeting from sales
pub(super) fn lead_whatsapp_link(profile: &Profile, name: &str, phone: &str) -> String {
    let digits = digits(phone);
    let number = if digits.len() > 10 && digits.starts_with(profile.country_code) {
        digits
    } else {
        format!("{}{digits}", profile.country_code)
    };
    let message = format!("Hola {name}, {}", profile.whatsapp_greeting);
    format!("https://wa.me/{number}?text={}", urlencoding::encode(&message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ConversationSummary, LeadData, SessionState};

    fn lead(name: &str) -> LeadData {
        LeadData {
            name: name.to_string(),
            email: "ana@example.com".to_string(),
            phone: "55 1234 5678".to_string(),
            event_type: Some("boda".to_string()),
        }
    }

    fn summary_with(turns: &[(&str, &str)]) -> LeadSummary {
        let mut session = SessionState::new("s", lead("Ana"), Utc::now());
        for (user, bot) in turns {
            session.push_user(*user);
            session.push_model(*bot);
        }
        LeadSummary::from_session(&session, Utc::now())
    }

    #[test]
    fn test_lead_fields_are_escaped() {
        let profile = Profile::by_key("logistics").unwrap();
        let mut summary = summary_with(&[("<b>hola</b> quiero cotizar", "Claro")]);
        summary.lead.name = "<script>alert(1)</script>".to_string();
        let email = compose_email(profile, &summary, Utc::now());
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(email.html.contains("&lt;b&gt;hola&lt;/b&gt;"));
    }

    #[test]
    fn test_logistics_email_contents() {
        let profile = Profile::by_key("logistics").unwrap();
        let summary = summary_with(&[
            ("necesito transporte refrigerado", "Claro"),
            ("de Veracruz a CDMX", "Perfecto"),
            ("¿cuál es el precio aproximado?", "Te conecto con ventas"),
            ("gracias por todo", "¡A ti!"),
        ]);
        let email = compose_email(profile, &summary, Utc::now());

        assert_eq!(email.subject, "🚛 Nuevo Lead Generado - OMEX TL");
        // Only the last three queries are listed
        assert!(!email.html.contains("<li>necesito transporte refrigerado</li>"));
        assert!(email.html.contains("<li>gracias por todo</li>"));
        assert!(email.html.contains("8 en total (4 del cliente, 4 del asistente)"));
        assert!(!email.html.contains("Paquete recomendado"));
        assert!(email.html.contains("mailto:ana@example.com"));
        assert!(email.html.contains("tel:5512345678"));
        assert!(email.html.contains("Av. Homero 229"));
        assert!(email.text.contains("Nombre: Ana"));
        assert!(email.text.contains("💬 WhatsApp: https://wa.me/525512345678?text=Hola%20Ana%2C%20te%20contacto"));
    }

    #[test]
    fn test_entertainment_email_recommends_package() {
        let profile = Profile::by_key("entertainment").unwrap();
        let summary = summary_with(&[("es para una boda en un salon", "¡Felicidades!")]);
        let email = compose_email(profile, &summary, Utc::now());
        assert_eq!(email.subject, "🎵 Nueva consulta musical - Ana");
        assert!(email.html.contains("Paquete Event Plus (ideal para eventos grandes"));
        assert!(email.text.contains("PAQUETE RECOMENDADO: Paquete Event Plus"));
    }

    #[test]
    fn test_bot_history_is_truncated() {
        let profile = Profile::by_key("logistics").unwrap();
        let long = "á".repeat(250);
        let summary = summary_with(&[("necesito un flete urgente", long.as_str())]);
        let email = compose_email(profile, &summary, Utc::now());
        let expected = format!("<strong>Asistente:</strong> {}...</p>", "á".repeat(200));
        assert!(email.html.contains(&expected));
    }

    #[test]
    fn test_note_is_included() {
        let profile = Profile::by_key("entertainment").unwrap();
        let summary = LeadSummary {
            lead: lead("Ana"),
            conversation: ConversationSummary::empty(Utc::now()),
            note: Some("Boda\n200 invitados".to_string()),
        };
        let email = compose_email(profile, &summary, Utc::now());
        assert!(email.html.contains("<p>Boda<br>200 invitados</p>"));
        assert!(!email.html.contains("Historial de Conversación"));
    }

    #[test]
    fn test_whatsapp_number_keeps_existing_country_code() {
        let profile = Profile::by_key("logistics").unwrap();
        assert!(lead_whatsapp_link(profile, "Ana", "+52 55 1234 5678").starts_with("https://wa.me/525512345678?"));
        assert!(lead_whatsapp_link(profile, "Ana", "55-1234-5678").starts_with("https://wa.me/525512345678?"));
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("abc", 5), "abc");
        assert_eq!(excerpt("abcdef", 3), "abc...");
    }

    #[test]
    fn test_test_email() {
        let profile = Profile::by_key("logistics").unwrap();
        let email = compose_test_email(profile, "smtp", Utc::now());
        assert_eq!(email.subject, "✅ Test Email - Sistema OMEX TL");
        assert!(email.html.contains("Canal:</strong> smtp"));
    }
}
