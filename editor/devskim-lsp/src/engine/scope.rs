//! Per-document configuration scopes
//!
//! A scope is acquired when a document opens and released when it closes.
//! It holds the client's `devskim` settings for that document once they have
//! been fetched; until then the scope is pending and nothing is analyzed.

use super::error::ScopeError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use devskim_protocol::DocumentIdentity;
use serde::Deserialize;
use serde_json::Value;
use tower_lsp::lsp_types::Url;

/// Configuration section requested from the client
pub const SETTINGS_SECTION: &str = "devskim";

/// Client settings that apply to one document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSettings {
    /// Analyze the document at all
    pub enabled: bool,
    /// Rule ids never reported for the document
    pub ignore_rules_list: Vec<String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ignore_rules_list: Vec::new(),
        }
    }
}

impl DocumentSettings {
    /// Settings from a `workspace/configuration` answer
    ///
    /// Missing or malformed sections fall back to the defaults.
    pub fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Invalid {} settings, using defaults: {}", SETTINGS_SECTION, e);
                Self::default()
            }),
        }
    }

    /// Should findings of `rule_id` be reported?
    pub fn allows(&self, rule_id: &str) -> bool {
        !self
            .ignore_rules_list
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(rule_id))
    }
}

/// Where document settings come from
#[tower_lsp::async_trait]
pub trait SettingsSource: Send + Sync {
    async fn document_settings(&self, uri: &Url) -> DocumentSettings;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScopeState {
    /// Settings requested, answer not in yet
    Pending,
    Ready(DocumentSettings),
}

/// Acquired scopes, one per open document
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: DashMap<DocumentIdentity, ScopeState>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the scope for a document; it stays pending until `update`
    pub fn acquire(&self, document: &DocumentIdentity) -> Result<(), ScopeError> {
        match self.scopes.entry(document.clone()) {
            Entry::Occupied(_) => Err(ScopeError::AlreadyAcquired(document.clone())),
            Entry::Vacant(entry) => {
                entry.insert(ScopeState::Pending);
                Ok(())
            }
        }
    }

    /// Store the fetched settings of an acquired scope
    ///
    /// Returns false if the scope was released in the meantime.
    pub fn update(&self, document: &DocumentIdentity, settings: DocumentSettings) -> bool {
        match self.scopes.get_mut(document) {
            Some(mut current) => {
                *current = ScopeState::Ready(settings);
                true
            }
            None => false,
        }
    }

    /// Release the scope of a closing document
    pub fn release(&self, document: &DocumentIdentity) -> Result<(), ScopeError> {
        self.scopes
            .remove(document)
            .map(|_| ())
            .ok_or_else(|| ScopeError::NotAcquired(document.clone()))
    }

    /// Settings of a scope whose settings have arrived
    pub fn settings(&self, document: &DocumentIdentity) -> Option<DocumentSettings> {
        self.scopes.get(document).and_then(|state| match &*state {
            ScopeState::Ready(settings) => Some(settings.clone()),
            ScopeState::Pending => None,
        })
    }

    pub fn is_acquired(&self, document: &DocumentIdentity) -> bool {
        self.scopes.contains_key(document)
    }
}
