//! Decorative glyphs in front of configured words

use super::{DecorativeTerm, Inline, RenderError};
use regex::Regex;

#[derive(Debug, Default)]
pub(crate) struct Decorator {
    terms: Vec<(Regex, String)>,
}

impl Decorator {
    pub(crate) fn new(terms: &[DecorativeTerm]) -> Result<Self, RenderError> {
        let terms = terms
            .iter()
            .map(|term| {
                Regex::new(&term.pattern)
                    .map(|re| (re, term.glyph.clone()))
                    .map_err(|source| RenderError::InvalidPattern {
                        pattern: term.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { terms })
    }

    /// Prefix matches in text nodes. Link labels are left as they are.
    pub(crate) fn apply(&self, nodes: Vec<Inline>) -> Vec<Inline> {
        if self.terms.is_empty() {
            return nodes;
        }
        nodes
            .into_iter()
            .map(|node| match node {
                Inline::Text(text) => Inline::Text(self.decorate(&text)),
                Inline::Strong(children) => Inline::Strong(self.apply(children)),
                Inline::Emphasis(children) => Inline::Emphasis(self.apply(children)),
                link @ Inline::Link(_) => link,
            })
            .collect()
    }

    fn decorate(&self, text: &str) -> String {
        // Terms match the unmodified input; on overlap the earliest match wins.
        let mut hits: Vec<(usize, usize, &str)> = self
            .terms
            .iter()
            .flat_map(|(re, glyph)| {
                re.find_iter(text)
                    .filter(|m| !m.is_empty())
                    .map(move |m| (m.start(), m.end(), glyph.as_str()))
            })
            .collect();
        if hits.is_empty() {
            return text.to_string();
        }
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut out = String::with_capacity(text.len() + hits.len() * 8);
        let mut last = 0;
        for (start, end, glyph) in hits {
            if start < last {
                continue;
            }
            out.push_str(&text[last..start]);
            out.push_str(glyph);
            out.push(' ');
            out.push_str(&text[start..end]);
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_terms_prefix_once() {
        let decorator = Decorator::new(&[
            DecorativeTerm::new(r"\bFTL\b", "🚛"),
            DecorativeTerm::new(r"(?i)\bftl\b", "🚚"),
        ])
        .unwrap();
        assert_eq!(decorator.decorate("FTL"), "🚛 FTL");
    }

    #[test]
    fn test_no_terms_is_identity() {
        let decorator = Decorator::default();
        let nodes = vec![Inline::Text("GPS".to_string())];
        assert_eq!(decorator.apply(nodes.clone()), nodes);
    }
}
