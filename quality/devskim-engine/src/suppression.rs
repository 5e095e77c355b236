//! Inline suppression comments
//!
//! A comment containing `DevSkim: ignore DS126858` suppresses that rule on
//! the line it appears on. Several ids may be listed separated by commas, and
//! `all` suppresses every rule:
//!
//! ```text
//! var h = MD5.Create(); // DevSkim: ignore DS126858
//! var u = "http://x";   # DevSkim: ignore DS137138, DS173237
//! legacy();             // DevSkim: ignore all
//! ```

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static IGNORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DevSkim:\s*ignore\s+([\w-]+(?:\s*,\s*[\w-]+)*)")
        .expect("suppression pattern is valid")
});

const ALL_RULES: &str = "all";

/// Suppressed rule ids by 1-based line
#[derive(Debug, Default)]
pub struct SuppressionMap {
    lines: HashMap<u32, HashSet<String>>,
}

impl SuppressionMap {
    /// Scan a document for suppression comments
    pub fn parse(source: &str) -> Self {
        let mut map = Self::default();

        for (idx, line) in source.lines().enumerate() {
            for caps in IGNORE_PATTERN.captures_iter(line) {
                let ids = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let entry = map.lines.entry(idx as u32 + 1).or_default();
                entry.extend(
                    ids.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(|id| id.to_ascii_lowercase()),
                );
            }
        }

        map
    }

    /// Is `rule_id` suppressed on `line`?
    pub fn is_suppressed(&self, rule_id: &str, line: u32) -> bool {
        self.lines.get(&line).is_some_and(|ids| {
            ids.contains(ALL_RULES) || ids.contains(&rule_id.to_ascii_lowercase())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The comment text that suppresses `rule_id`
pub fn suppression_comment(comment_prefix: &str, rule_id: &str) -> String {
    format!("{} DevSkim: ignore {}", comment_prefix, rule_id)
}
