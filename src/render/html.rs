//! HTML emission

use super::{Block, Inline, Link, LinkKind, ListKind};
use std::borrow::Cow;
use std::fmt::Write as _;

const LINK_STYLE: &str = "color: #0056b3; text-decoration: underline;";
const WHATSAPP_STYLE: &str = "color: #25D366; font-weight: bold; text-decoration: none;";

/// Escape the five HTML metacharacters
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

pub(crate) fn write(blocks: &[Block<Vec<Inline>>]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(lines) => {
                out.push_str("<p>");
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        out.push_str("<br>");
                    }
                    write_inlines(&mut out, line);
                }
                out.push_str("</p>");
            }
            Block::List { kind, items } => {
                let tag = match kind {
                    ListKind::Unordered => "ul",
                    ListKind::Ordered => "ol",
                };
                let _ = write!(out, "<{tag}>");
                for item in items {
                    out.push_str("<li>");
                    write_inlines(&mut out, item);
                    out.push_str("</li>");
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
    out
}

fn write_inlines(out: &mut String, nodes: &[Inline]) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                write_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                write_inlines(out, children);
                out.push_str("</em>");
            }
            Inline::Link(link) => write_link(out, link),
        }
    }
}

fn write_link(out: &mut String, link: &Link) {
    let href = escape_html(&link.href);
    let label = escape_html(&link.label);
    let _ = match link.kind {
        LinkKind::Url => write!(
            out,
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer" style="{LINK_STYLE}">{label}</a>"#
        ),
        LinkKind::WhatsApp => write!(
            out,
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer" style="{WHATSAPP_STYLE}">📱 {label}</a>"#
        ),
        LinkKind::CompanyEmail => write!(
            out,
            r#"<a href="{href}" style="{LINK_STYLE}">📧 {label}</a>"#
        ),
        LinkKind::Email => write!(out, r#"<a href="{href}" style="{LINK_STYLE}">{label}</a>"#),
    };
}
