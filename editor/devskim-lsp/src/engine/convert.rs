//! Type conversions from engine findings to LSP types

use devskim_engine::{Finding, Location};
use devskim_protocol::diagnostic_code;
use tower_lsp::lsp_types::{
    Diagnostic as LspDiagnostic, DiagnosticSeverity as LspDiagnosticSeverity, NumberOrString,
    Position as LspPosition, Range as LspRange,
};

/// Convert a finding to an LSP diagnostic
///
/// Every finding is reported as an error regardless of its rule severity.
pub fn to_lsp_diagnostic(finding: &Finding) -> LspDiagnostic {
    LspDiagnostic {
        range: to_lsp_range(finding.start, finding.end),
        severity: Some(LspDiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(diagnostic_code(&finding.rule_id))),
        code_description: None,
        source: Some(format!("DevSkim Language Server: [{}]", finding.rule_id)),
        message: format!("{}: {}", finding.rule_id, finding.description_or_empty()),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Convert engine locations (1-based lines) to an LSP range (0-based lines)
pub fn to_lsp_range(start: Location, end: Location) -> LspRange {
    LspRange {
        start: to_lsp_position(start),
        end: to_lsp_position(end),
    }
}

fn to_lsp_position(location: Location) -> LspPosition {
    LspPosition {
        line: location.line.saturating_sub(1),
        character: location.column,
    }
}
