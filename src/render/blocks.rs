//! Paragraph splitting and list detection

use super::{Block, ListKind};

/// Split raw text into paragraphs and list groups.
///
/// A blank (or whitespace-only) line ends a paragraph. Inside a paragraph,
/// consecutive list-item lines of the same kind form one list; the lines
/// around them stay paragraph text.
pub(crate) fn split(text: &str) -> Vec<Block<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
        } else {
            paragraph.push(line);
        }
    }
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block<String>>) {
    let mut text_run: Vec<String> = Vec::new();
    let mut list: Option<(ListKind, Vec<String>)> = None;

    for line in lines.drain(..) {
        match list_item(line) {
            Some((kind, body)) => {
                if !text_run.is_empty() {
                    blocks.push(Block::Paragraph(std::mem::take(&mut text_run)));
                }
                match &mut list {
                    Some((current, items)) if *current == kind => items.push(body.to_string()),
                    _ => {
                        if let Some((kind, items)) = list.take() {
                            blocks.push(Block::List { kind, items });
                        }
                        list = Some((kind, vec![body.to_string()]));
                    }
                }
            }
            None => {
                if let Some((kind, items)) = list.take() {
                    blocks.push(Block::List { kind, items });
                }
                text_run.push(line.trim().to_string());
            }
        }
    }

    if let Some((kind, items)) = list {
        blocks.push(Block::List { kind, items });
    }
    if !text_run.is_empty() {
        blocks.push(Block::Paragraph(text_run));
    }
}

/// Recognize `- item`, `* item`, `• item` and `12. item` at the start of a line
fn list_item(line: &str) -> Option<(ListKind, &str)> {
    let line = line.trim_start();
    let first = line.chars().next()?;

    let (kind, rest) = if matches!(first, '-' | '*' | '•') {
        (ListKind::Unordered, &line[first.len_utf8()..])
    } else if first.is_ascii_digit() {
        let digits_end = line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(line.len());
        let rest = line[digits_end..].strip_prefix('.')?;
        (ListKind::Ordered, rest)
    } else {
        return None;
    };

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let body = rest.trim();
    (!body.is_empty()).then_some((kind, body))
}
