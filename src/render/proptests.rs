//! Property-based tests for the renderer
//!
//! - rendering never panics, for any input
//! - literal text can never produce a tag of its own
//! - rendering is deterministic
//! - list lines group into exactly one container

use super::*;
use proptest::prelude::*;

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
        ],
    })
    .unwrap()
}

/// Text biased toward the characters the renderer cares about
fn arb_markdownish() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("*".to_string()),
            Just("**".to_string()),
            Just("\n".to_string()),
            Just("\n\n".to_string()),
            Just("- ".to_string()),
            Just("1. ".to_string()),
            Just("• ".to_string()),
            Just("<".to_string()),
            Just("&".to_string()),
            Just("https://omextl.com".to_string()),
            Just("56 3594 2337".to_string()),
            Just("contacto@omextl.com".to_string()),
            Just("FTL".to_string()),
            "[a-zA-Z0-9 .,()]{1,12}",
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

/// Count opening tags of the given name
fn opened(html: &str, tag: &str) -> usize {
    html.matches(&format!("<{tag}>")).count() + html.matches(&format!("<{tag} ")).count()
}

proptest! {
    #[test]
    fn prop_total_over_any_string(s in any::<String>()) {
        let _ = Renderer::plain().render(&s);
        let _ = logistics().render(&s);
    }

    #[test]
    fn prop_total_over_markdownish(s in arb_markdownish()) {
        let _ = logistics().render(&s);
    }

    #[test]
    fn prop_script_never_survives(prefix in "[a-z *\n]{0,10}", suffix in "[a-z *\n]{0,10}") {
        let input = format!("{prefix}<script>alert(1)</script>{suffix}");
        let out = logistics().render(&input);
        prop_assert!(!out.contains("<script"));
        prop_assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn prop_no_foreign_tags(s in any::<String>()) {
        // Every '<' in the output starts one of the renderer's own tags
        let out = logistics().render(&s);
        const OWN: &[&str] = &[
            "<p>", "</p>", "<br>", "<strong>", "</strong>", "<em>", "</em>",
            "<ul>", "</ul>", "<ol>", "</ol>", "<li>", "</li>", "<a ", "</a>",
        ];
        for (i, _) in out.match_indices('<') {
            let rest = &out[i..];
            prop_assert!(OWN.iter().any(|t| rest.starts_with(t)), "foreign tag at {}: {}", i, rest);
        }
    }

    #[test]
    fn prop_tags_are_balanced(s in arb_markdownish()) {
        let out = logistics().render(&s);
        for tag in ["p", "strong", "em", "ul", "ol", "li", "a"] {
            prop_assert_eq!(opened(&out, tag), out.matches(&format!("</{tag}>")).count(), "tag {}", tag);
        }
    }

    #[test]
    fn prop_deterministic(s in arb_markdownish()) {
        let renderer = logistics();
        prop_assert_eq!(renderer.render(&s), renderer.render(&s));
    }

    #[test]
    fn prop_whitespace_renders_empty(s in "[ \t\r\n]{0,20}") {
        prop_assert_eq!(logistics().render(&s), "");
    }

    #[test]
    fn prop_unordered_items_grouped(items in proptest::collection::vec("[a-z]{1,8}", 1..8)) {
        let input = items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n");
        let expected = format!(
            "<ul>{}</ul>",
            items.iter().map(|i| format!("<li>{i}</li>")).collect::<String>()
        );
        prop_assert_eq!(Renderer::plain().render(&input), expected);
    }

    #[test]
    fn prop_ordered_items_grouped(items in proptest::collection::vec("[a-z]{1,8}", 1..8)) {
        let input = items
            .iter()
            .enumerate()
            .map(|(n, i)| format!("{}. {i}", n + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let expected = format!(
            "<ol>{}</ol>",
            items.iter().map(|i| format!("<li>{i}</li>")).collect::<String>()
        );
        prop_assert_eq!(Renderer::plain().render(&input), expected);
    }

    #[test]
    fn prop_bold_consumes_delimiters(word in "[a-z]{1,10}") {
        let out = Renderer::plain().render(&format!("**{word}**"));
        prop_assert_eq!(out, format!("<p><strong>{word}</strong></p>"));
    }
}
