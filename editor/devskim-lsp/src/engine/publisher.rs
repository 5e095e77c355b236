//! Diagnostic publishing
//!
//! A pass is published as one full-replace diagnostics batch followed by one
//! fix message per usable fix. The fix messages reference the diagnostics by
//! content only, so they must be built from the very same diagnostics.

use super::convert::to_lsp_diagnostic;
use devskim_engine::Finding;
use devskim_protocol::{CodeFixMapping, DocumentIdentity};
use tower_lsp::lsp_types::{Diagnostic, Url};

/// Destination of published messages
#[tower_lsp::async_trait]
pub trait DiagnosticSink: Send + Sync {
    /// Replace every diagnostic of `uri`
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    );

    /// Send one `devskim/codefixmapping` notification
    async fn send_fix(&self, mapping: CodeFixMapping);
}

/// Diagnostics and fix messages for one analysis pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishBatch {
    pub diagnostics: Vec<Diagnostic>,
    pub fixes: Vec<CodeFixMapping>,
}

impl PublishBatch {
    /// Render findings for a document version
    pub fn render(findings: &[Finding], document: &DocumentIdentity, version: Option<i32>) -> Self {
        let mut batch = Self::default();

        for finding in findings {
            let diagnostic = to_lsp_diagnostic(finding);
            batch.fixes.extend(
                finding
                    .fixes
                    .iter()
                    .filter_map(|fix| fix.usable_replacement())
                    .map(|replacement| {
                        CodeFixMapping::new(diagnostic.clone(), replacement, document, version)
                    }),
            );
            batch.diagnostics.push(diagnostic);
        }

        batch
    }
}

pub struct Publisher<S> {
    sink: S,
}

impl<S: DiagnosticSink> Publisher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Publish the findings of one pass
    pub async fn publish(&self, findings: &[Finding], uri: &Url, version: i32) {
        let document = DocumentIdentity::from_url(uri);
        let batch = PublishBatch::render(findings, &document, Some(version));

        tracing::debug!(
            "Publishing {} diagnostics and {} fixes for {} (version {})",
            batch.diagnostics.len(),
            batch.fixes.len(),
            document,
            version
        );

        self.sink
            .publish_diagnostics(uri.clone(), batch.diagnostics, Some(version))
            .await;
        for fix in batch.fixes {
            self.sink.send_fix(fix).await;
        }
    }

    /// Clear a document's diagnostics
    pub async fn clear(&self, uri: &Url) {
        self.sink
            .publish_diagnostics(uri.clone(), Vec::new(), None)
            .await;
    }
}
