//! Markdown subset renderer for bot-authored chat messages
//!
//! Converts the small markdown dialect the assistant writes (bold, italics,
//! lists, bare links and the company's contact details) into an HTML fragment
//! that is safe to insert into the transcript.
//!
//! The renderer is a pipeline of pure stages over a typed document:
//!
//! 1. [`blocks::split`] breaks the text into paragraphs and list groups
//! 2. [`inline::parse`] finds bold spans, then italics outside of them
//! 3. [`autolink::Linker`] turns URLs, the company phone and emails into links
//! 4. [`decorate::Decorator`] prefixes configured words with a glyph
//! 5. [`cleanup`] drops whatever became empty
//! 6. [`html::write`] emits markup, escaping every literal text run
//!
//! Literal text only becomes markup in the final stage, so no stage can
//! re-match tags produced by an earlier one.

mod autolink;
mod blocks;
mod decorate;
mod html;
mod inline;

#[cfg(test)]
mod proptests;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use html::escape_html;

/// Phone number that gets linked to a WhatsApp chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneLink {
    /// Number as the business writes it, e.g. `56 3594 2337`
    pub display: String,
    /// Full international number without `+`, e.g. `525635942337`
    pub whatsapp_e164: String,
}

/// A whole-word pattern and the glyph placed in front of each match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorativeTerm {
    pub pattern: String,
    pub glyph: String,
}

impl DecorativeTerm {
    pub fn new(pattern: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            glyph: glyph.into(),
        }
    }
}

/// Per-deployment renderer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub phone: Option<PhoneLink>,
    pub company_email: Option<String>,
    #[serde(default)]
    pub decorative_terms: Vec<DecorativeTerm>,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid decorative pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("phone number {0:?} contains no digits")]
    InvalidPhone(String),
}

/// Block-level structure, generic over what a line holds at each stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block<T> {
    /// Lines of a paragraph, joined with line breaks
    Paragraph(Vec<T>),
    List { kind: ListKind, items: Vec<T> },
}

impl<T> Block<T> {
    fn map<U>(self, f: impl FnMut(T) -> U) -> Block<U> {
        match self {
            Block::Paragraph(lines) => Block::Paragraph(lines.into_iter().map(f).collect()),
            Block::List { kind, items } => Block::List {
                kind,
                items: items.into_iter().map(f).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Unordered,
    Ordered,
}

/// Inline content of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link(Link),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Link {
    pub kind: LinkKind,
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkKind {
    Url,
    WhatsApp,
    CompanyEmail,
    Email,
}

/// Compiled renderer. Cheap to share; `render` takes `&self`.
#[derive(Debug)]
pub struct Renderer {
    linker: autolink::Linker,
    decorator: decorate::Decorator,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        Ok(Self {
            linker: autolink::Linker::new(config.phone.as_ref(), config.company_email.as_deref())?,
            decorator: decorate::Decorator::new(&config.decorative_terms)?,
        })
    }

    /// Renderer with no company contacts and no decorations
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            linker: autolink::Linker::plain(),
            decorator: decorate::Decorator::default(),
        }
    }

    /// Render one message. Total over all inputs.
    pub fn render(&self, text: &str) -> String {
        let blocks: Vec<Block<Vec<Inline>>> = blocks::split(text)
            .into_iter()
            .map(|block| block.map(|line| inline::parse(&line)))
            .map(|block| block.map(|nodes| self.linker.apply(nodes)))
            .map(|block| block.map(|nodes| self.decorator.apply(nodes)))
            .filter_map(cleanup)
            .collect();

        html::write(&blocks)
    }
}

/// Drop empty inline nodes, empty lines and blocks left with nothing in them
fn cleanup(block: Block<Vec<Inline>>) -> Option<Block<Vec<Inline>>> {
    match block.map(prune) {
        Block::Paragraph(lines) => {
            let lines: Vec<_> = lines.into_iter().filter(|l| !l.is_empty()).collect();
            (!lines.is_empty()).then_some(Block::Paragraph(lines))
        }
        Block::List { kind, items } => {
            let items: Vec<_> = items.into_iter().filter(|i| !i.is_empty()).collect();
            (!items.is_empty()).then_some(Block::List { kind, items })
        }
    }
}

fn prune(nodes: Vec<Inline>) -> Vec<Inline> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            Inline::Text(text) if text.is_empty() => None,
            Inline::Strong(children) => {
                let children = prune(children);
                (!children.is_empty()).then_some(Inline::Strong(children))
            }
            Inline::Emphasis(children) => {
                let children = prune(children);
                (!children.is_empty()).then_some(Inline::Emphasis(children))
            }
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistics() -> Renderer {
        Renderer::new(&RenderConfig {
            phone: Some(PhoneLink {
                display: "56 3594 2337".to_string(),
                whatsapp_e164: "525635942337".to_string(),
            }),
            company_email: Some("contacto@omextl.com".to_string()),
            decorative_terms: vec![
                DecorativeTerm::new(r"\b(?:FTL|LTL)\b", "🚛"),
                DecorativeTerm::new(r"\bGPS\b", "📍"),
                DecorativeTerm::new(r"(?i)\brefrigerad[ao]s?\b", "❄️"),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_plain_text_is_one_paragraph() {
        assert_eq!(Renderer::plain().render("Hola mundo"), "<p>Hola mundo</p>");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let r = Renderer::plain();
        assert_eq!(r.render(""), "");
        assert_eq!(r.render("   \n\t\n  "), "");
    }

    #[test]
    fn test_paragraphs_and_line_breaks() {
        let r = Renderer::plain();
        assert_eq!(
            r.render("uno\ndos\n\ntres"),
            "<p>uno<br>dos</p><p>tres</p>"
        );
        assert_eq!(r.render("uno\n\n\n\ndos"), "<p>uno</p><p>dos</p>");
        assert_eq!(r.render("uno\r\ndos"), "<p>uno<br>dos</p>");
    }

    #[test]
    fn test_escapes_html() {
        let out = Renderer::plain().render("<script>alert('x')</script> & \"q\"");
        assert_eq!(
            out,
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;q&quot;</p>"
        );
    }

    #[test]
    fn test_bold() {
        assert_eq!(Renderer::plain().render("**x**"), "<p><strong>x</strong></p>");
    }

    #[test]
    fn test_bold_and_italic_do_not_interfere() {
        assert_eq!(
            Renderer::plain().render("**x** and *y*"),
            "<p><strong>x</strong> and <em>y</em></p>"
        );
    }

    #[test]
    fn test_italic_inside_bold_stays_literal() {
        assert_eq!(
            Renderer::plain().render("**a *b* c**"),
            "<p><strong>a *b* c</strong></p>"
        );
    }

    #[test]
    fn test_nested_emphasis_keeps_outer_asterisks() {
        assert_eq!(
            Renderer::plain().render("*a **b** c*"),
            "<p>*a <strong>b</strong> c*</p>"
        );
    }

    #[test]
    fn test_unmatched_delimiters_are_literal() {
        let r = Renderer::plain();
        assert_eq!(r.render("a * b"), "<p>a * b</p>");
        assert_eq!(r.render("a * b * c"), "<p>a * b * c</p>");
        assert_eq!(r.render("**abierto"), "<p>**abierto</p>");
        assert_eq!(r.render("*solo"), "<p>*solo</p>");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            Renderer::plain().render("- a\n- b\n- c"),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
        assert_eq!(
            Renderer::plain().render("* a\n• b"),
            "<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            Renderer::plain().render("1. first\n2. second"),
            "<ol><li>first</li><li>second</li></ol>"
        );
    }

    #[test]
    fn test_list_between_text() {
        assert_eq!(
            Renderer::plain().render("Opciones:\n- **Party**\n- Live\nSaludos"),
            "<p>Opciones:</p><ul><li><strong>Party</strong></li><li>Live</li></ul><p>Saludos</p>"
        );
    }

    #[test]
    fn test_list_kind_change_starts_new_list() {
        assert_eq!(
            Renderer::plain().render("- a\n1. b"),
            "<ul><li>a</li></ul><ol><li>b</li></ol>"
        );
    }

    #[test]
    fn test_mid_sentence_markers_are_not_lists() {
        let r = Renderer::plain();
        assert_eq!(r.render("Precio - 500 pesos"), "<p>Precio - 500 pesos</p>");
        assert_eq!(r.render("Son 2. opciones"), "<p>Son 2. opciones</p>");
        assert_eq!(r.render("-sin espacio"), "<p>-sin espacio</p>");
    }

    #[test]
    fn test_autolink_url() {
        assert_eq!(
            Renderer::plain().render("Visit https://omextl.com now"),
            "<p>Visit <a href=\"https://omextl.com\" target=\"_blank\" rel=\"noopener noreferrer\" \
             style=\"color: #0056b3; text-decoration: underline;\">https://omextl.com</a> now</p>"
        );
    }

    #[test]
    fn test_autolink_url_leaves_trailing_period() {
        let out = Renderer::plain().render("Ver https://omextl.com.");
        assert!(out.contains("href=\"https://omextl.com\""));
        assert!(out.ends_with("</a>.</p>"));
    }

    #[test]
    fn test_phone_spaced_and_unspaced() {
        let r = logistics();
        for input in ["Call 56 3594 2337", "Call 5635942337"] {
            let out = r.render(input);
            assert!(out.contains("href=\"https://wa.me/525635942337\""), "{out}");
            assert!(out.contains("📱 "), "{out}");
        }
    }

    #[test]
    fn test_phone_inside_bold() {
        let out = logistics().render("Llámanos al **56 3594 2337**");
        assert!(out.contains("<strong><a href=\"https://wa.me/525635942337\""));
    }

    #[test]
    fn test_company_email_and_other_emails() {
        let out = logistics().render("Escribe a contacto@omextl.com o ventas@ejemplo.mx");
        assert!(out.contains("href=\"mailto:contacto@omextl.com\""));
        assert!(out.contains("📧 contacto@omextl.com"));
        assert!(out.contains("href=\"mailto:ventas@ejemplo.mx\""));
        assert_eq!(out.matches("📧").count(), 1);
    }

    #[test]
    fn test_url_is_not_relinked() {
        let out = logistics().render("https://example.com/u/ana@example.com");
        assert_eq!(out.matches("<a ").count(), 1);
    }

    #[test]
    fn test_decorative_terms() {
        let out = logistics().render("Servicio FTL con GPS y carga Refrigerada");
        assert_eq!(
            out,
            "<p>Servicio 🚛 FTL con 📍 GPS y carga ❄️ Refrigerada</p>"
        );
    }

    #[test]
    fn test_decorative_terms_are_whole_words() {
        assert_eq!(logistics().render("GPSX"), "<p>GPSX</p>");
    }

    #[test]
    fn test_render_is_pure() {
        let r = logistics();
        let input = "**FTL** y *GPS* en https://omextl.com\n- 56 3594 2337";
        assert_eq!(r.render(input), r.render(input));
    }

    #[test]
    fn test_invalid_decorative_pattern_rejected() {
        let config = RenderConfig {
            decorative_terms: vec![DecorativeTerm::new("(", "x")],
            ..Default::default()
        };
        assert!(matches!(
            Renderer::new(&config),
            Err(RenderError::InvalidPattern { .. })
        ));
    }
}
