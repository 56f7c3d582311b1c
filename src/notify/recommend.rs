//! Package recommendation by keyword scoring

use crate::profile::PackageDef;

/// Score each package by how many of its keywords appear in the visitor's
/// messages. The best score wins, ties go to the earlier package, and no
/// hits at all yields `default`. Returns `None` when there are no packages.
pub fn recommend_package(
    packages: &[PackageDef],
    user_messages: &[String],
    default: &str,
) -> Option<String> {
    if packages.is_empty() {
        return None;
    }
    let text = user_messages.join(" ").to_lowercase();

    let mut best: Option<(&PackageDef, usize)> = None;
    for package in packages {
        let score = package
            .keywords
            .iter()
            .filter(|k| text.contains(&k.to_lowercase()))
            .count();
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((package, score));
        }
    }

    Some(match best {
        Some((package, _)) => format!("{} ({})", package.name, package.reason),
        None => default.to_string(),
    })
}
