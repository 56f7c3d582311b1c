//! Keyword rule table

use crate::profile::RuleDef;
use rand::seq::SliceRandom;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid rule keywords {keywords:?}: {source}")]
pub struct RuleError {
    keywords: Vec<String>,
    #[source]
    source: regex::Error,
}

#[derive(Debug)]
struct Rule {
    pattern: Regex,
    replies: &'static [&'static str],
}

/// Ordered rules; the first matching rule answers
#[derive(Debug, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new(defs: &'static [RuleDef]) -> Result<Self, RuleError> {
        let rules = defs
            .iter()
            .filter(|def| !def.keywords.is_empty() && !def.replies.is_empty())
            .map(|def| {
                Regex::new(&keyword_pattern(def.keywords))
                    .map(|pattern| Rule {
                        pattern,
                        replies: def.replies,
                    })
                    .map_err(|source| RuleError {
                        keywords: def.keywords.iter().map(|k| (*k).to_string()).collect(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Reply from the first rule matching `text`, picked at random among its replies
    pub fn reply(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .and_then(|rule| rule.replies.choose(&mut rand::thread_rng()).copied())
    }
}

/// `(?i)\b(?:word\b|stem)` from whole words and `*`-suffixed stems
fn keyword_pattern(keywords: &[&str]) -> String {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| match k.strip_suffix('*') {
            Some(stem) => regex::escape(stem),
            None => format!(r"{}\b", regex::escape(k)),
        })
        .collect();
    format!(r"(?i)\b(?:{})", alternatives.join("|"))
}
