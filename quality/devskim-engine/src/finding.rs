//! Analysis results

use crate::location::Location;
use crate::rule::{Confidence, Severity};
use serde::{Deserialize, Serialize};

/// What applying a fix does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    /// Rewrites the matched code
    Replace,
    /// Keeps the code and adds a suppression comment
    Suppress,
}

/// A suggested replacement for a finding's range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFix {
    pub name: String,
    /// `None` when the fix template did not apply to the matched text
    pub replacement: Option<String>,
    pub kind: FixKind,
}

impl CodeFix {
    pub fn replace(name: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replacement: Some(replacement.into()),
            kind: FixKind::Replace,
        }
    }

    pub fn suppress(name: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replacement: Some(replacement.into()),
            kind: FixKind::Suppress,
        }
    }

    /// Replacement text, if it is present and non-empty
    pub fn usable_replacement(&self) -> Option<&str> {
        self.replacement.as_deref().filter(|r| !r.is_empty())
    }
}

/// A single rule match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub rule_name: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub confidence: Confidence,
    pub start: Location,
    /// Exclusive end
    pub end: Location,
    pub matched_text: String,
    #[serde(default)]
    pub fixes: Vec<CodeFix>,
}

impl Finding {
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
