//! Quick-fix code actions

use crate::registry::FixRegistry;
use devskim_protocol::{DocumentIdentity, DIAGNOSTIC_CODE_PREFIX, SUPPRESSION_MARKER};
use std::collections::HashMap;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, Diagnostic, NumberOrString, TextEdit, Url, WorkspaceEdit,
};

/// Code actions for the DevSkim diagnostics in `diagnostics`
///
/// Diagnostics from other sources are skipped, as are diagnostics with no
/// recorded fixes.
pub fn provide_actions(
    registry: &FixRegistry,
    uri: &Url,
    diagnostics: &[Diagnostic],
) -> Vec<CodeAction> {
    let document = DocumentIdentity::from_url(uri);

    diagnostics
        .iter()
        .filter(|d| is_devskim_diagnostic(d))
        .flat_map(|diagnostic| {
            registry
                .lookup(&document, diagnostic)
                .iter()
                .map(move |replacement| fix_action(uri, diagnostic, replacement))
        })
        .collect()
}

/// Title shown in the editor for a candidate replacement
pub fn action_title(replacement: &str) -> String {
    match replacement.split_once(SUPPRESSION_MARKER) {
        Some((_, rest)) => format!("Suppress {}", rest),
        None => format!("Replace with {}", replacement),
    }
}

fn is_devskim_diagnostic(diagnostic: &Diagnostic) -> bool {
    matches!(
        &diagnostic.code,
        Some(NumberOrString::String(code)) if code.starts_with(DIAGNOSTIC_CODE_PREFIX)
    )
}

fn fix_action(uri: &Url, diagnostic: &Diagnostic, replacement: &str) -> CodeAction {
    let edit = TextEdit {
        range: diagnostic.range,
        new_text: replacement.to_string(),
    };

    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![edit]);

    CodeAction {
        title: action_title(replacement),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic.clone()]),
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            document_changes: None,
            change_annotations: None,
        }),
        command: None,
        is_preferred: None,
        disabled: None,
        data: None,
    }
}
