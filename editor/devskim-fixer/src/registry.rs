//! Fix registry
//!
//! Candidate replacements indexed by [`CorrelationKey`], partitioned per
//! document. Each partition is pinned to the version of the last diagnostics
//! batch published for the document. A batch for any other version replaces
//! the partition, since versions restart when a document is reopened. Fixes
//! for a version other than the pinned one are rejected as stale.

use devskim_protocol::{CodeFixMapping, CorrelationKey, DocumentIdentity};
use std::collections::HashMap;
use tower_lsp::lsp_types::Diagnostic;

/// What `record` did with a fix message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new candidate was appended
    Recorded,
    /// The key already had this exact replacement
    Duplicate,
    /// The message belongs to a superseded document version
    Stale,
}

#[derive(Debug, Default)]
struct DocumentFixes {
    version: Option<i32>,
    /// `version` came from a diagnostics batch rather than a fix message
    published: bool,
    fixes: HashMap<CorrelationKey, Vec<String>>,
}

impl DocumentFixes {
    fn reset(&mut self, version: i32, published: bool) {
        self.version = Some(version);
        self.published = published;
        self.fixes.clear();
    }

    fn is_stale(&self, version: i32) -> bool {
        match self.version {
            Some(current) if self.published => version != current,
            Some(current) => version < current,
            None => false,
        }
    }
}

/// Fixes known to the editor, per document
#[derive(Debug, Default)]
pub struct FixRegistry {
    documents: HashMap<DocumentIdentity, DocumentFixes>,
}

impl FixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fix message
    ///
    /// Once a batch was published, only fixes for its version are accepted.
    /// Before that, a newer fix replaces older ones. Messages without a
    /// version never evict anything and are never stale.
    pub fn record(&mut self, mapping: CodeFixMapping) -> RecordOutcome {
        let key = mapping.key();
        let partition = self.documents.entry(mapping.document()).or_default();

        if let Some(version) = mapping.version {
            if partition.is_stale(version) {
                return RecordOutcome::Stale;
            }
            if partition.version != Some(version) {
                partition.reset(version, false);
            }
        }

        let candidates = partition.fixes.entry(key).or_default();
        if candidates.contains(&mapping.replacement) {
            RecordOutcome::Duplicate
        } else {
            candidates.push(mapping.replacement);
            RecordOutcome::Recorded
        }
    }

    /// A diagnostics batch was published for `document`
    ///
    /// The batch's version becomes the document's version. A batch for any
    /// other version than the current one drops every fix recorded so far.
    /// Returns whether anything was evicted.
    pub fn observe_publish(&mut self, document: &DocumentIdentity, version: Option<i32>) -> bool {
        let Some(version) = version else {
            return false;
        };

        let partition = self.documents.entry(document.clone()).or_default();
        if partition.version == Some(version) {
            partition.published = true;
            return false;
        }

        let evicted = !partition.fixes.is_empty();
        partition.reset(version, true);
        evicted
    }

    /// Drop everything recorded for a closed document
    pub fn forget(&mut self, document: &DocumentIdentity) {
        self.documents.remove(document);
    }

    /// Candidate replacements for a diagnostic as the editor shows it
    pub fn lookup(&self, document: &DocumentIdentity, diagnostic: &Diagnostic) -> &[String] {
        let key = CorrelationKey::new(document, diagnostic);
        self.documents
            .get(document)
            .and_then(|partition| partition.fixes.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Version the document's fixes belong to
    pub fn document_version(&self, document: &DocumentIdentity) -> Option<i32> {
        self.documents.get(document).and_then(|p| p.version)
    }

    /// Number of keys with at least one candidate
    pub fn len(&self) -> usize {
        self.documents.values().map(|p| p.fixes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tower_lsp::lsp_types::{NumberOrString, Position, Range};

    fn diagnostic(line: u32) -> Diagnostic {
        Diagnostic {
            range: Range {
                start: Position {
                    line,
                    character: 5,
                },
                end: Position {
                    line,
                    character: 25,
                },
            },
            code: Some(NumberOrString::String(
                "MS-CST-E.vscode-devskim: SM00100".to_string(),
            )),
            message: "SM00100: Do not hard-code secrets".to_string(),
            ..Default::default()
        }
    }

    fn mapping(uri: &str, line: u32, replacement: &str, version: Option<i32>) -> CodeFixMapping {
        CodeFixMapping {
            diagnostic: diagnostic(line),
            replacement: replacement.to_string(),
            file_name: uri.to_string(),
            version,
        }
    }

    #[test]
    fn test_record_and_lookup() {
        let mut registry = FixRegistry::new();
        let outcome = registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));
        assert_eq!(outcome, RecordOutcome::Recorded);

        let doc = DocumentIdentity::new("file:///c:/a.cs");
        assert_eq!(registry.lookup(&doc, &diagnostic(2)), &["***".to_string()]);
        assert!(registry.lookup(&doc, &diagnostic(3)).is_empty());
    }

    #[test]
    fn test_duplicate_recorded_once() {
        let mut registry = FixRegistry::new();
        registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));
        let outcome = registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));

        assert_eq!(outcome, RecordOutcome::Duplicate);
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        assert_eq!(registry.lookup(&doc, &diagnostic(2)).len(), 1);
    }

    #[test]
    fn test_distinct_replacements_share_key() {
        let mut registry = FixRegistry::new();
        registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));
        registry.record(mapping("file:///c:/a.cs", 2, "*** // DevSkim: ignore SM00100", Some(1)));

        let doc = DocumentIdentity::new("file:///c:/a.cs");
        assert_eq!(
            registry.lookup(&doc, &diagnostic(2)),
            &["***".to_string(), "*** // DevSkim: ignore SM00100".to_string()]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_across_escaping() {
        let mut registry = FixRegistry::new();
        registry.record(mapping("file:///c%3A/src/a.cs", 2, "***", None));

        let doc = DocumentIdentity::new("file:///C:/src/a.cs");
        assert_eq!(registry.lookup(&doc, &diagnostic(2)), &["***".to_string()]);
    }

    #[test]
    fn test_newer_publish_evicts() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));

        assert!(!registry.observe_publish(&doc, Some(1)));
        assert_eq!(registry.lookup(&doc, &diagnostic(2)).len(), 1);

        assert!(registry.observe_publish(&doc, Some(2)));
        assert!(registry.lookup(&doc, &diagnostic(2)).is_empty());
        assert_eq!(registry.document_version(&doc), Some(2));
    }

    #[test]
    fn test_publish_for_same_version_keeps_fixes_recorded_first() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.record(mapping("file:///c:/a.cs", 2, "***", Some(3)));

        assert!(!registry.observe_publish(&doc, Some(3)));
        assert_eq!(registry.lookup(&doc, &diagnostic(2)), &["***".to_string()]);
    }

    #[test]
    fn test_lower_version_publish_resets_reopened_document() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.observe_publish(&doc, Some(9));
        registry.record(mapping("file:///c:/a.cs", 2, "old", Some(9)));

        assert!(registry.observe_publish(&doc, Some(1)));
        assert_eq!(registry.document_version(&doc), Some(1));

        let outcome = registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));
        assert_eq!(outcome, RecordOutcome::Recorded);
        assert_eq!(registry.lookup(&doc, &diagnostic(2)), &["***".to_string()]);
    }

    #[test]
    fn test_fix_for_other_than_published_version_is_stale() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.observe_publish(&doc, Some(1));

        let outcome = registry.record(mapping("file:///c:/a.cs", 2, "old", Some(5)));
        assert_eq!(outcome, RecordOutcome::Stale);
        assert!(registry.is_empty());
        assert_eq!(registry.document_version(&doc), Some(1));
    }

    #[test]
    fn test_stale_fix_rejected() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.observe_publish(&doc, Some(5));

        let outcome = registry.record(mapping("file:///c:/a.cs", 2, "***", Some(4)));
        assert_eq!(outcome, RecordOutcome::Stale);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_newer_fix_evicts_older_fixes() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.record(mapping("file:///c:/a.cs", 2, "old", Some(1)));
        registry.record(mapping("file:///c:/a.cs", 2, "new", Some(2)));

        assert_eq!(registry.lookup(&doc, &diagnostic(2)), &["new".to_string()]);
    }

    #[test]
    fn test_versionless_never_evicts_or_stale() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.record(mapping("file:///c:/a.cs", 2, "a", Some(3)));

        let outcome = registry.record(mapping("file:///c:/a.cs", 2, "b", None));
        assert_eq!(outcome, RecordOutcome::Recorded);
        assert!(!registry.observe_publish(&doc, None));
        assert_eq!(registry.lookup(&doc, &diagnostic(2)).len(), 2);
    }

    #[test]
    fn test_documents_are_independent() {
        let mut registry = FixRegistry::new();
        registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));
        registry.record(mapping("file:///c:/b.cs", 2, "***", Some(7)));

        let a = DocumentIdentity::new("file:///c:/a.cs");
        let b = DocumentIdentity::new("file:///c:/b.cs");
        registry.observe_publish(&a, Some(2));

        assert!(registry.lookup(&a, &diagnostic(2)).is_empty());
        assert_eq!(registry.lookup(&b, &diagnostic(2)).len(), 1);
    }

    #[test]
    fn test_forget() {
        let mut registry = FixRegistry::new();
        let doc = DocumentIdentity::new("file:///c:/a.cs");
        registry.record(mapping("file:///c:/a.cs", 2, "***", Some(1)));
        registry.forget(&doc);

        assert!(registry.is_empty());
        assert_eq!(registry.document_version(&doc), None);
    }
}
