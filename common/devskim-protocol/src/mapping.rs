//! The `devskim/codefixmapping` notification

use crate::identity::DocumentIdentity;
use crate::key::CorrelationKey;
use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::Diagnostic;

/// One candidate fix for one published diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFixMapping {
    /// The diagnostic this fix applies to, exactly as published
    pub diagnostic: Diagnostic,
    /// Text that replaces the diagnostic's range
    pub replacement: String,
    /// URI of the owning document, as the server printed it
    pub file_name: String,
    /// Document version of the analysis pass that produced the fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

impl CodeFixMapping {
    pub fn new(
        diagnostic: Diagnostic,
        replacement: impl Into<String>,
        document: &DocumentIdentity,
        version: Option<i32>,
    ) -> Self {
        Self {
            diagnostic,
            replacement: replacement.into(),
            file_name: document.to_string(),
            version,
        }
    }

    /// Canonical identity of the owning document
    pub fn document(&self) -> DocumentIdentity {
        DocumentIdentity::new(&self.file_name)
    }

    pub fn key(&self) -> CorrelationKey {
        CorrelationKey::new(&self.document(), &self.diagnostic)
    }
}

/// Custom notification carrying a [`CodeFixMapping`]
pub struct CodeFixMappingNotification;

impl Notification for CodeFixMappingNotification {
    type Params = CodeFixMapping;
    const METHOD: &'static str = "devskim/codefixmapping";
}
