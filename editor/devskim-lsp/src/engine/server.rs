//! tower-lsp server
//!
//! Wires the client connection into the sync controller: diagnostics and fix
//! messages go out through the client, document settings come back through
//! `workspace/configuration`.

use super::analyzer::DocumentAnalyzer;
use super::config::ServerConfig;
use super::publisher::DiagnosticSink;
use super::scope::{DocumentSettings, SettingsSource, SETTINGS_SECTION};
use super::sync::SyncController;
use devskim_protocol::{CodeFixMapping, CodeFixMappingNotification};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Sends published messages to the editor
pub struct ClientSink {
    client: Client,
}

#[tower_lsp::async_trait]
impl DiagnosticSink for ClientSink {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    ) {
        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }

    async fn send_fix(&self, mapping: CodeFixMapping) {
        self.client
            .send_notification::<CodeFixMappingNotification>(mapping)
            .await;
    }
}

/// Fetches the `devskim` section from the editor
pub struct ClientSettings {
    client: Client,
    /// Set once the client announced `workspace/configuration` support
    supported: Arc<AtomicBool>,
}

#[tower_lsp::async_trait]
impl SettingsSource for ClientSettings {
    async fn document_settings(&self, uri: &Url) -> DocumentSettings {
        if !self.supported.load(Ordering::Relaxed) {
            return DocumentSettings::default();
        }

        let items = vec![ConfigurationItem {
            scope_uri: Some(uri.clone()),
            section: Some(SETTINGS_SECTION.to_string()),
        }];

        match self.client.configuration(items).await {
            Ok(values) => DocumentSettings::from_value(values.into_iter().next()),
            Err(e) => {
                tracing::warn!("Failed to fetch settings for {}: {}", uri, e);
                DocumentSettings::default()
            }
        }
    }
}

/// DevSkim language server
pub struct DevSkimServer {
    controller: SyncController<ClientSink, ClientSettings>,
    client: Client,
    config: ServerConfig,
    configuration_supported: Arc<AtomicBool>,
}

impl DevSkimServer {
    pub fn new(client: Client, analyzer: Arc<dyn DocumentAnalyzer>, config: ServerConfig) -> Self {
        let configuration_supported = Arc::new(AtomicBool::new(false));
        let sink = ClientSink {
            client: client.clone(),
        };
        let settings = ClientSettings {
            client: client.clone(),
            supported: Arc::clone(&configuration_supported),
        };

        Self {
            controller: SyncController::new(analyzer, sink, settings),
            client,
            config,
            configuration_supported,
        }
    }

    /// Full-text sync, open/close and save notifications without text
    pub fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    will_save: None,
                    will_save_wait_until: None,
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(false),
                    })),
                },
            )),
            ..ServerCapabilities::default()
        }
    }
}

/// Text of the last whole-document change, if any
fn full_text(changes: Vec<TextDocumentContentChangeEvent>) -> Option<String> {
    changes
        .into_iter()
        .rev()
        .find(|change| change.range.is_none())
        .map(|change| change.text)
}

fn client_supports_configuration(capabilities: &ClientCapabilities) -> bool {
    capabilities
        .workspace
        .as_ref()
        .and_then(|w| w.configuration)
        .unwrap_or(false)
}

#[tower_lsp::async_trait]
impl LanguageServer for DevSkimServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("{} initializing", self.config.engine.name);

        self.configuration_supported.store(
            client_supports_configuration(&params.capabilities),
            Ordering::Relaxed,
        );

        Ok(InitializeResult {
            capabilities: Self::capabilities(),
            server_info: Some(ServerInfo {
                name: self.config.engine.name.clone(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("{} initialized", self.config.engine.name);
        self.client
            .log_message(
                MessageType::INFO,
                format!("{} ready", self.config.engine.name),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("{} shutting down", self.config.engine.name);
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        self.controller
            .did_open(&document.uri, document.version, Some(document.text))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let text = full_text(params.content_changes);
        self.controller
            .did_change(&params.text_document.uri, params.text_document.version, text)
            .await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.controller.did_save(&params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.controller.did_close(&params.text_document.uri).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(text: &str, range: Option<Range>) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range,
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_capabilities_full_sync() {
        let caps = DevSkimServer::capabilities();
        let Some(TextDocumentSyncCapability::Options(sync)) = caps.text_document_sync else {
            panic!("expected sync options");
        };
        assert_eq!(sync.open_close, Some(true));
        assert_eq!(sync.change, Some(TextDocumentSyncKind::FULL));
        assert_eq!(
            sync.save,
            Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                include_text: Some(false)
            }))
        );
    }

    #[test]
    fn test_full_text_takes_last_whole_change() {
        let ranged = Some(Range::new(Position::new(0, 0), Position::new(0, 1)));
        let changes = vec![change("first", None), change("second", None), change("x", ranged)];
        assert_eq!(full_text(changes), Some("second".to_string()));
    }

    #[test]
    fn test_full_text_absent() {
        assert_eq!(full_text(vec![]), None);
        let ranged = Some(Range::new(Position::new(0, 0), Position::new(0, 1)));
        assert_eq!(full_text(vec![change("x", ranged)]), None);
    }

    #[test]
    fn test_configuration_capability() {
        assert!(!client_supports_configuration(&ClientCapabilities::default()));

        let caps = ClientCapabilities {
            workspace: Some(WorkspaceClientCapabilities {
                configuration: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(client_supports_configuration(&caps));
    }
}
