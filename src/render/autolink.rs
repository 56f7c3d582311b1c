//! URL, phone and email autolinking

use super::{Inline, Link, LinkKind, PhoneLink, RenderError};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("url pattern is valid"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern is valid")
});

const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?'];

#[derive(Debug)]
struct Phone {
    pattern: Regex,
    href: String,
}

/// Finds links in text nodes. Passes run in order (URLs, phone, emails) and
/// each pass only sees the text the previous ones left unlinked.
#[derive(Debug)]
pub(crate) struct Linker {
    phone: Option<Phone>,
    company_email: Option<String>,
}

impl Linker {
    pub(crate) fn new(
        phone: Option<&PhoneLink>,
        company_email: Option<&str>,
    ) -> Result<Self, RenderError> {
        let phone = phone.map(compile_phone).transpose()?;
        Ok(Self {
            phone,
            company_email: company_email.map(str::to_string),
        })
    }

    #[cfg(test)]
    pub(crate) fn plain() -> Self {
        Self {
            phone: None,
            company_email: None,
        }
    }

    pub(crate) fn apply(&self, nodes: Vec<Inline>) -> Vec<Inline> {
        let nodes = split_text(nodes, &find_urls);
        let nodes = match &self.phone {
            Some(phone) => split_text(nodes, &|text: &str| find_phone(phone, text)),
            None => nodes,
        };
        split_text(nodes, &|text: &str| self.find_emails(text))
    }

    fn find_emails(&self, text: &str) -> Vec<(Range<usize>, Link)> {
        EMAIL
            .find_iter(text)
            .map(|m| {
                let address = m.as_str();
                let is_company = self
                    .company_email
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(address));
                let kind = if is_company {
                    LinkKind::CompanyEmail
                } else {
                    LinkKind::Email
                };
                let link = Link {
                    kind,
                    href: format!("mailto:{address}"),
                    label: address.to_string(),
                };
                (m.range(), link)
            })
            .collect()
    }
}

/// Accept the number with or without separators between its digit groups
fn compile_phone(phone: &PhoneLink) -> Result<Phone, RenderError> {
    let groups: Vec<&str> = phone
        .display
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    if groups.is_empty() {
        return Err(RenderError::InvalidPhone(phone.display.clone()));
    }

    let source = format!(r"\b{}\b", groups.join(r"[ \t.\-]*"));
    let pattern = Regex::new(&source).map_err(|source_err| RenderError::InvalidPattern {
        pattern: source,
        source: source_err,
    })?;

    let digits: String = phone
        .whatsapp_e164
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    Ok(Phone {
        pattern,
        href: format!("https://wa.me/{digits}"),
    })
}

fn find_urls(text: &str) -> Vec<(Range<usize>, Link)> {
    URL.find_iter(text)
        .map(|m| {
            let url = trim_url(m.as_str());
            let range = m.start()..m.start() + url.len();
            let link = Link {
                kind: LinkKind::Url,
                href: url.to_string(),
                label: url.to_string(),
            };
            (range, link)
        })
        .collect()
}

/// Leave sentence punctuation and an unbalanced `)` outside the link
fn trim_url(url: &str) -> &str {
    let mut url = url.trim_end_matches(URL_TRAILING);
    while url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
        url = url[..url.len() - 1].trim_end_matches(URL_TRAILING);
    }
    url
}

fn find_phone(phone: &Phone, text: &str) -> Vec<(Range<usize>, Link)> {
    phone
        .pattern
        .find_iter(text)
        .map(|m| {
            let link = Link {
                kind: LinkKind::WhatsApp,
                href: phone.href.clone(),
                label: m.as_str().to_string(),
            };
            (m.range(), link)
        })
        .collect()
}

/// Replace matches inside text nodes with link nodes, recursing into spans.
/// Existing links are left alone.
fn split_text(
    nodes: Vec<Inline>,
    find: &dyn Fn(&str) -> Vec<(Range<usize>, Link)>,
) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => {
                let mut last = 0;
                for (range, link) in find(&text) {
                    if range.start < last || range.is_empty() {
                        continue;
                    }
                    if range.start > last {
                        out.push(Inline::Text(text[last..range.start].to_string()));
                    }
                    out.push(Inline::Link(link));
                    last = range.end;
                }
                if last < text.len() {
                    out.push(Inline::Text(text[last..].to_string()));
                }
            }
            Inline::Strong(children) => out.push(Inline::Strong(split_text(children, find))),
            Inline::Emphasis(children) => out.push(Inline::Emphasis(split_text(children, find))),
            link @ Inline::Link(_) => out.push(link),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url("https://a.com."), "https://a.com");
        assert_eq!(trim_url("https://a.com/x)"), "https://a.com/x");
        assert_eq!(trim_url("https://a.com/wiki/A_(b)"), "https://a.com/wiki/A_(b)");
        assert_eq!(trim_url("https://a.com/?q=1"), "https://a.com/?q=1");
    }

    #[test]
    fn test_phone_pattern_variants() {
        let phone = compile_phone(&PhoneLink {
            display: "55 3541 2631".to_string(),
            whatsapp_e164: "+52 5535412631".to_string(),
        })
        .unwrap();
        assert_eq!(phone.href, "https://wa.me/525535412631");
        for text in ["55 3541 2631", "5535412631", "55-3541-2631"] {
            assert_eq!(find_phone(&phone, text).len(), 1, "{text}");
        }
        assert!(find_phone(&phone, "155354126310").is_empty());
    }

    #[test]
    fn test_phone_without_digits_rejected() {
        let result = compile_phone(&PhoneLink {
            display: "n/a".to_string(),
            whatsapp_e164: String::new(),
        });
        assert!(matches!(result, Err(RenderError::InvalidPhone(_))));
    }

    #[test]
    fn test_links_inside_spans() {
        let linker = Linker::plain();
        let nodes = linker.apply(vec![Inline::Emphasis(vec![Inline::Text(
            "ver https://a.com".to_string(),
        )])]);
        let Inline::Emphasis(children) = &nodes[0] else {
            panic!("expected emphasis");
        };
        assert!(matches!(children[1], Inline::Link(Link { kind: LinkKind::Url, .. })));
    }
}
