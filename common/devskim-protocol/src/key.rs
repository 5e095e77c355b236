//! Correlation keys
//!
//! Diagnostics are value objects rebuilt independently by the server and the
//! editor, so the only identity they share is their content. The key is an
//! order-stable rendering of the document identity, message, code and range.

use crate::identity::DocumentIdentity;
use std::fmt;
use tower_lsp::lsp_types::{Diagnostic, NumberOrString};

/// Join key between a rendered diagnostic and its recorded fixes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Build the key for a diagnostic shown in `document`
    pub fn new(document: &DocumentIdentity, diagnostic: &Diagnostic) -> Self {
        let range = &diagnostic.range;
        Self(format!(
            "{}: {}, {}, {}, {}, {}, {}",
            document,
            diagnostic.message,
            code_text(diagnostic.code.as_ref()),
            range.start.line,
            range.start.character,
            range.end.line,
            range.end.character,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a diagnostic code the way an editor stringifies it
pub fn code_text(code: Option<&NumberOrString>) -> String {
    match code {
        Some(NumberOrString::String(s)) => s.clone(),
        Some(NumberOrString::Number(n)) => n.to_string(),
        None => "undefined".to_string(),
    }
}
