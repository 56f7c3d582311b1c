//! Bold and italic spans

use super::Inline;
use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

/// Parse one line into text, bold and italic nodes.
///
/// Bold spans are taken first and their content is kept literal. Italics are
/// then looked for only in the text between bold spans.
pub(crate) fn parse(line: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut last = 0;

    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        nodes.extend(italics(&line[last..whole.start()]));
        nodes.push(Inline::Strong(vec![Inline::Text(inner.as_str().to_string())]));
        last = whole.end();
    }
    nodes.extend(italics(&line[last..]));

    nodes
}

/// Split text into plain runs and `*emphasis*`.
///
/// An opening `*` must be followed by a non-space character and a closing `*`
/// preceded by one; neither may touch another `*`.
fn italics(text: &str) -> Vec<Inline> {
    let stars: Vec<usize> = text.match_indices('*').map(|(i, _)| i).collect();
    let mut nodes = Vec::new();
    let mut last = 0;
    let mut i = 0;

    while i < stars.len() {
        let open = stars[i];
        if let Some(&close) = stars.get(i + 1) {
            if close > open + 1 && can_open(text, open) && can_close(text, close) {
                push_text(&mut nodes, &text[last..open]);
                nodes.push(Inline::Emphasis(vec![Inline::Text(
                    text[open + 1..close].to_string(),
                )]));
                last = close + 1;
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    push_text(&mut nodes, &text[last..]);

    nodes
}

fn can_open(text: &str, at: usize) -> bool {
    let before = text[..at].chars().next_back();
    let after = text[at + 1..].chars().next();
    before != Some('*') && after.is_some_and(|c| c != '*' && !c.is_whitespace())
}

fn can_close(text: &str, at: usize) -> bool {
    let before = text[..at].chars().next_back();
    let after = text[at + 1..].chars().next();
    after != Some('*') && before.is_some_and(|c| c != '*' && !c.is_whitespace())
}

fn push_text(nodes: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        nodes.push(Inline::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_bold_then_italic() {
        assert_eq!(
            parse("**x** and *y*"),
            vec![
                Inline::Strong(vec![text("x")]),
                text(" and "),
                Inline::Emphasis(vec![text("y")]),
            ]
        );
    }

    #[test]
    fn test_empty_bold_is_literal() {
        assert_eq!(parse("****"), vec![text("****")]);
    }

    #[test]
    fn test_italic_needs_tight_delimiters() {
        assert_eq!(parse("a * b"), vec![text("a * b")]);
        assert_eq!(parse("*a *"), vec![text("*a *")]);
        assert_eq!(parse("2*3*4"), vec![text("2"), Inline::Emphasis(vec![text("3")]), text("4")]);
    }

    #[test]
    fn test_skips_failed_opener() {
        assert_eq!(
            parse("* x *y*"),
            vec![text("* x "), Inline::Emphasis(vec![text("y")])]
        );
    }
}
