//! Notification routing for a client host
//!
//! The host owns one session and forwards the server's notifications, the
//! editor's close events and code action queries to it. All mutation goes
//! through `&mut self`, so the session lives on the host's event loop.

use crate::error::FixerError;
use crate::quickfix::provide_actions;
use crate::registry::{FixRegistry, RecordOutcome};
use devskim_protocol::{CodeFixMapping, CodeFixMappingNotification, DocumentIdentity};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_lsp::lsp_types::notification::{Notification, PublishDiagnostics};
use tower_lsp::lsp_types::{CodeAction, Diagnostic, PublishDiagnosticsParams, Url};

#[derive(Debug, Default)]
pub struct FixerSession {
    registry: FixRegistry,
}

impl FixerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one server notification
    ///
    /// Methods other than diagnostics and fix mappings are rejected with
    /// [`FixerError::UnsupportedMethod`] so the host can handle them itself.
    pub fn handle_notification(&mut self, method: &str, params: Value) -> Result<(), FixerError> {
        match method {
            PublishDiagnostics::METHOD => {
                let params: PublishDiagnosticsParams = parse(method, params)?;
                self.on_publish(params);
                Ok(())
            }
            CodeFixMappingNotification::METHOD => {
                let mapping: CodeFixMapping = parse(method, params)?;
                self.on_fix(mapping);
                Ok(())
            }
            other => Err(FixerError::UnsupportedMethod(other.to_string())),
        }
    }

    /// The editor closed a document
    pub fn did_close(&mut self, uri: &Url) {
        tracing::debug!("Forgetting fixes for {}", uri);
        self.registry.forget(&DocumentIdentity::from_url(uri));
    }

    /// Quick fixes for the diagnostics shown at the requested range
    pub fn code_actions(&self, uri: &Url, diagnostics: &[Diagnostic]) -> Vec<CodeAction> {
        provide_actions(&self.registry, uri, diagnostics)
    }

    pub fn registry(&self) -> &FixRegistry {
        &self.registry
    }

    fn on_publish(&mut self, params: PublishDiagnosticsParams) {
        let document = DocumentIdentity::from_url(&params.uri);

        // the server clears a closed document with an empty unversioned batch
        if params.version.is_none() && params.diagnostics.is_empty() {
            tracing::debug!("Diagnostics cleared for {}, forgetting fixes", document);
            self.registry.forget(&document);
            return;
        }

        if self.registry.observe_publish(&document, params.version) {
            tracing::debug!(
                "Evicted fixes for {} before version {:?}",
                document,
                params.version
            );
        }
    }

    fn on_fix(&mut self, mapping: CodeFixMapping) {
        let version = mapping.version;
        let file_name = mapping.file_name.clone();

        match self.registry.record(mapping) {
            RecordOutcome::Recorded => {
                tracing::trace!("Recorded fix for {} (version {:?})", file_name, version)
            }
            RecordOutcome::Duplicate => {
                tracing::trace!("Duplicate fix for {} ignored", file_name)
            }
            RecordOutcome::Stale => {
                tracing::warn!("Dropped stale fix for {} (version {:?})", file_name, version)
            }
        }
    }
}

fn parse<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, FixerError> {
    serde_json::from_value(params).map_err(|source| FixerError::InvalidParams {
        method: method.to_string(),
        source,
    })
}
