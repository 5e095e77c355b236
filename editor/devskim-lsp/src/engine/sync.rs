//! Document sync controller
//!
//! Turns document lifecycle events into analysis passes. Every open and
//! change re-analyzes the whole document on the blocking pool; a pass whose
//! document moved on (newer version or close) is dropped instead of
//! published. Nothing is analyzed before the document's settings arrive:
//! changes received meanwhile are picked up by the open's own pass.

use super::analyzer::DocumentAnalyzer;
use super::document::{DocumentManager, DocumentState};
use super::error::AnalyzeError;
use super::publisher::{DiagnosticSink, Publisher};
use super::scope::{DocumentSettings, ScopeRegistry, SettingsSource};
use devskim_engine::Finding;
use devskim_protocol::DocumentIdentity;
use std::sync::Arc;
use tower_lsp::lsp_types::Url;

pub struct SyncController<S, C> {
    analyzer: Arc<dyn DocumentAnalyzer>,
    publisher: Publisher<S>,
    settings: C,
    documents: DocumentManager,
    scopes: ScopeRegistry,
}

impl<S: DiagnosticSink, C: SettingsSource> SyncController<S, C> {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, sink: S, settings: C) -> Self {
        Self {
            analyzer,
            publisher: Publisher::new(sink),
            settings,
            documents: DocumentManager::new(),
            scopes: ScopeRegistry::new(),
        }
    }

    pub fn sink(&self) -> &S {
        self.publisher.sink()
    }

    pub fn documents(&self) -> &DocumentManager {
        &self.documents
    }

    pub fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }

    /// A document was opened
    pub async fn did_open(&self, uri: &Url, version: i32, text: Option<String>) {
        let document = DocumentIdentity::from_url(uri);
        tracing::debug!("Document opened: {} (version {})", document, version);

        self.documents.open(document.clone(), version, text);
        if let Err(e) = self.scopes.acquire(&document) {
            tracing::warn!("{}", e);
        }

        let settings = self.settings.document_settings(uri).await;
        if !self.scopes.update(&document, settings.clone()) {
            tracing::debug!("{} closed while fetching settings", document);
            return;
        }

        self.analyze_latest(uri, document, settings).await;
    }

    /// A document changed; `text` is the full new content, if sent
    pub async fn did_change(&self, uri: &Url, version: i32, text: Option<String>) {
        let document = DocumentIdentity::from_url(uri);
        tracing::debug!("Document changed: {} (version {})", document, version);

        if !self.documents.update(&document, version, text) {
            tracing::debug!("Ignoring out-of-order version {} of {}", version, document);
            return;
        }

        let Some(settings) = self.scopes.settings(&document) else {
            if self.scopes.is_acquired(&document) {
                tracing::debug!("Settings for {} still loading, deferring analysis", document);
            } else {
                tracing::debug!("{} was never opened, skipping analysis", document);
            }
            return;
        };

        self.analyze_latest(uri, document, settings).await;
    }

    /// A document was saved; analysis already happened on change
    pub async fn did_save(&self, uri: &Url) {
        tracing::debug!("Document saved: {}", uri);
    }

    /// A document was closed
    ///
    /// The empty unversioned batch sent here tells the editor side to drop
    /// the document's diagnostics and fixes.
    pub async fn did_close(&self, uri: &Url) {
        let document = DocumentIdentity::from_url(uri);
        tracing::debug!("Document closed: {}", document);

        self.documents.close(&document);
        if let Err(e) = self.scopes.release(&document) {
            tracing::warn!("{}", e);
        }
        self.publisher.clear(uri).await;
    }

    async fn analyze_latest(
        &self,
        uri: &Url,
        document: DocumentIdentity,
        settings: DocumentSettings,
    ) {
        match self.documents.latest(&document) {
            Some(DocumentState {
                version,
                text: Some(text),
            }) => {
                self.analyze_and_publish(uri, document, version, text, settings)
                    .await
            }
            Some(_) => tracing::debug!("No full text for {}, skipping analysis", document),
            None => tracing::debug!("{} closed before analysis", document),
        }
    }

    async fn analyze_and_publish(
        &self,
        uri: &Url,
        document: DocumentIdentity,
        version: i32,
        text: String,
        settings: DocumentSettings,
    ) {
        if !settings.enabled {
            tracing::debug!("Analysis disabled for {}", document);
            if self.documents.is_current(&document, version) {
                self.publisher.publish(&[], uri, version).await;
            }
            return;
        }

        let findings = match self.run_analysis(document.clone(), text).await {
            Ok(findings) => findings,
            Err(e) => {
                tracing::error!("{}", e);
                return;
            }
        };

        if !self.documents.is_current(&document, version) {
            tracing::debug!("Dropping stale pass for {} (version {})", document, version);
            return;
        }

        let findings = filter_ignored(findings, &settings);
        self.publisher.publish(&findings, uri, version).await;
    }

    async fn run_analysis(
        &self,
        document: DocumentIdentity,
        text: String,
    ) -> Result<Vec<Finding>, AnalyzeError> {
        let analyzer = Arc::clone(&self.analyzer);
        let target = document.clone();

        tokio::task::spawn_blocking(move || analyzer.analyze(&text, &target))
            .await
            .map_err(|e| AnalyzeError::Aborted {
                document,
                reason: e.to_string(),
            })?
    }
}

fn filter_ignored(findings: Vec<Finding>, settings: &DocumentSettings) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| settings.allows(&f.rule_id))
        .collect()
}
