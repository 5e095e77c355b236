//! Server to editor round trips
//!
//! Messages published by the sync controller are serialized the way they
//! travel over JSON-RPC and replayed into an editor-side fixer session.

use devskim_engine::{CodeFix, Confidence, Finding, Location, Severity};
use devskim_fixer::FixerSession;
use devskim_lsp::engine::error::AnalyzeError;
use devskim_lsp::engine::scope::{DocumentSettings, SettingsSource};
use devskim_lsp::{DiagnosticSink, DocumentAnalyzer, SyncController};
use devskim_protocol::{CodeFixMapping, CodeFixMappingNotification, DocumentIdentity};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower_lsp::lsp_types::notification::{Notification, PublishDiagnostics};
use tower_lsp::lsp_types::{Diagnostic, PublishDiagnosticsParams, Url};

/// Records outgoing notifications as (method, params) pairs
#[derive(Clone, Default)]
struct WireSink {
    messages: Arc<Mutex<Vec<(String, Value)>>>,
}

impl WireSink {
    fn take(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }

    fn push(&self, method: &str, params: Value) {
        self.messages
            .lock()
            .unwrap()
            .push((method.to_string(), params));
    }
}

#[tower_lsp::async_trait]
impl DiagnosticSink for WireSink {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    ) {
        let params = PublishDiagnosticsParams {
            uri,
            diagnostics,
            version,
        };
        self.push(
            PublishDiagnostics::METHOD,
            serde_json::to_value(params).unwrap(),
        );
    }

    async fn send_fix(&self, mapping: CodeFixMapping) {
        self.push(
            CodeFixMappingNotification::METHOD,
            serde_json::to_value(mapping).unwrap(),
        );
    }
}

struct DefaultSettings;

#[tower_lsp::async_trait]
impl SettingsSource for DefaultSettings {
    async fn document_settings(&self, _uri: &Url) -> DocumentSettings {
        DocumentSettings::default()
    }
}

/// Returns a fixed list of findings for every document
struct CannedAnalyzer(Vec<Finding>);

impl DocumentAnalyzer for CannedAnalyzer {
    fn analyze(
        &self,
        _text: &str,
        _document: &DocumentIdentity,
    ) -> Result<Vec<Finding>, AnalyzeError> {
        Ok(self.0.clone())
    }
}

fn secret(fixes: Vec<CodeFix>) -> Finding {
    Finding {
        rule_id: "SM00100".to_string(),
        rule_name: "Hard-coded secret".to_string(),
        description: Some("Do not hard-code secrets".to_string()),
        severity: Severity::Critical,
        confidence: Confidence::High,
        start: Location::new(3, 5),
        end: Location::new(3, 25),
        matched_text: "SECRET_ABCDEFGHIJKLM".to_string(),
        fixes,
    }
}

struct Harness {
    sink: WireSink,
    controller: SyncController<WireSink, DefaultSettings>,
    session: FixerSession,
}

impl Harness {
    fn new(findings: Vec<Finding>) -> Self {
        let sink = WireSink::default();
        let controller = SyncController::new(
            Arc::new(CannedAnalyzer(findings)),
            sink.clone(),
            DefaultSettings,
        );
        Self {
            sink,
            controller,
            session: FixerSession::new(),
        }
    }

    /// Deliver everything sent so far and return the last diagnostics batch
    fn deliver(&mut self) -> Vec<Diagnostic> {
        let mut shown = Vec::new();
        for (method, params) in self.sink.take() {
            if method == PublishDiagnostics::METHOD {
                let batch: PublishDiagnosticsParams =
                    serde_json::from_value(params.clone()).unwrap();
                shown = batch.diagnostics;
            }
            self.session.handle_notification(&method, params).unwrap();
        }
        shown
    }
}

#[tokio::test]
async fn test_fix_reachable_from_published_diagnostic() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let server_uri = Url::parse("file:///c%3A/src/a.cs").unwrap();
    h.controller.did_open(&server_uri, 1, Some("x".to_string())).await;

    let shown = h.deliver();
    assert_eq!(shown.len(), 1);
    assert_eq!(
        shown[0].code,
        Some(tower_lsp::lsp_types::NumberOrString::String(
            "MS-CST-E.vscode-devskim: SM00100".to_string()
        ))
    );
    assert_eq!(shown[0].range.start.line, 2);
    assert_eq!(shown[0].range.start.character, 5);
    assert_eq!(shown[0].range.end.character, 25);

    // the editor addresses the document with its own escaping
    let editor_uri = Url::parse("file:///C:/src/a.cs").unwrap();
    let actions = h.session.code_actions(&editor_uri, &shown);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].title, "Replace with ***");
}

#[tokio::test]
async fn test_suppression_fix_title() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::suppress(
        "Suppress",
        "SECRET_ABCDEFGHIJKLM // DevSkim: ignore SM00100",
    )])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();
    h.controller.did_open(&uri, 1, Some("x".to_string())).await;

    let shown = h.deliver();
    let actions = h.session.code_actions(&uri, &shown);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].title, "Suppress SM00100");
}

#[tokio::test]
async fn test_identical_findings_share_one_key() {
    let mut h = Harness::new(vec![
        secret(vec![CodeFix::replace("a", "***")]),
        secret(vec![CodeFix::replace("b", "###")]),
        secret(vec![CodeFix::replace("c", "***")]),
    ]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();
    h.controller.did_open(&uri, 1, Some("x".to_string())).await;

    let shown = h.deliver();
    assert_eq!(shown.len(), 3);
    assert_eq!(h.session.registry().len(), 1);

    let titles: Vec<_> = h
        .session
        .code_actions(&uri, &shown[..1])
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(titles, vec!["Replace with ***", "Replace with ###"]);
}

#[tokio::test]
async fn test_replayed_fix_recorded_once() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();
    h.controller.did_open(&uri, 1, Some("x".to_string())).await;

    let messages = h.sink.take();
    for (method, params) in messages.iter().chain(messages.iter()) {
        h.session
            .handle_notification(method, params.clone())
            .unwrap();
    }

    let shown: PublishDiagnosticsParams = serde_json::from_value(messages[0].1.clone()).unwrap();
    assert_eq!(h.session.code_actions(&uri, &shown.diagnostics).len(), 1);
}

#[tokio::test]
async fn test_new_version_replaces_fixes() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();
    h.controller.did_open(&uri, 1, Some("x".to_string())).await;
    h.deliver();
    h.controller.did_change(&uri, 2, Some("y".to_string())).await;

    let shown = h.deliver();
    assert_eq!(h.session.registry().len(), 1);
    assert_eq!(h.session.code_actions(&uri, &shown).len(), 1);
    assert_eq!(
        h.session
            .registry()
            .document_version(&DocumentIdentity::from_url(&uri)),
        Some(2)
    );
}

#[tokio::test]
async fn test_late_fix_from_old_pass_dropped() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();

    h.controller.did_open(&uri, 1, Some("x".to_string())).await;
    let first_pass = h.sink.take();
    h.controller.did_change(&uri, 2, Some("y".to_string())).await;
    h.deliver();

    // the version 1 fix arrives after version 2 was published
    let (method, params) = first_pass
        .into_iter()
        .find(|(m, _)| m == CodeFixMappingNotification::METHOD)
        .unwrap();
    h.session.handle_notification(&method, params).unwrap();

    assert_eq!(h.session.registry().len(), 1);
}

#[tokio::test]
async fn test_change_without_text_sends_nothing() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();
    h.controller.did_change(&uri, 7, None).await;

    assert!(h.deliver().is_empty());
    assert!(h.session.registry().is_empty());
}

#[tokio::test]
async fn test_close_clears_editor_state() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();
    h.controller.did_open(&uri, 1, Some("x".to_string())).await;
    h.deliver();

    assert!(!h.session.registry().is_empty());

    h.controller.did_close(&uri).await;
    let messages = h.sink.take();

    assert_eq!(messages.len(), 1);
    let (method, params) = &messages[0];
    assert_eq!(method, PublishDiagnostics::METHOD);
    let cleared: PublishDiagnosticsParams = serde_json::from_value(params.clone()).unwrap();
    assert_eq!(cleared.uri, uri);
    assert!(cleared.diagnostics.is_empty());
    assert_eq!(cleared.version, None);

    // the clear alone is enough for the editor side to drop the fixes
    h.session
        .handle_notification(method, params.clone())
        .unwrap();
    assert!(h.session.registry().is_empty());
}

#[tokio::test]
async fn test_reopened_document_offers_fixes_again() {
    let mut h = Harness::new(vec![secret(vec![CodeFix::replace("Mask", "***")])]);
    let uri = Url::parse("file:///c:/src/a.cs").unwrap();

    h.controller.did_open(&uri, 5, Some("x".to_string())).await;
    h.controller.did_change(&uri, 6, Some("y".to_string())).await;
    h.deliver();
    h.controller.did_close(&uri).await;
    h.session.did_close(&uri);
    h.deliver();

    // versions start over after a reopen
    h.controller.did_open(&uri, 1, Some("x".to_string())).await;
    let shown = h.deliver();

    let titles: Vec<_> = h
        .session
        .code_actions(&uri, &shown)
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(titles, vec!["Replace with ***"]);
    assert_eq!(
        h.session
            .registry()
            .document_version(&DocumentIdentity::from_url(&uri)),
        Some(1)
    );
}
