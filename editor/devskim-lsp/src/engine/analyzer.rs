//! Document analysis
//!
//! The sync controller only sees the [`DocumentAnalyzer`] trait; the rule
//! engine is one implementation of it.

use super::error::AnalyzeError;
use devskim_engine::{Finding, RuleProcessor};
use devskim_protocol::DocumentIdentity;

/// Produces findings for a whole document
///
/// Implementations are called from the blocking thread pool, possibly for
/// several documents at once.
pub trait DocumentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, document: &DocumentIdentity)
        -> Result<Vec<Finding>, AnalyzeError>;
}

/// Analyzer backed by the DevSkim rule processor
pub struct EngineAnalyzer {
    processor: RuleProcessor,
}

impl EngineAnalyzer {
    pub fn new(processor: RuleProcessor) -> Self {
        tracing::debug!(
            "Analyzer ready with rules: {}",
            processor.active_rules().join(", ")
        );
        Self { processor }
    }

    pub fn processor(&self) -> &RuleProcessor {
        &self.processor
    }
}

impl DocumentAnalyzer for EngineAnalyzer {
    fn analyze(
        &self,
        text: &str,
        document: &DocumentIdentity,
    ) -> Result<Vec<Finding>, AnalyzeError> {
        let file_name = document.file_name();
        let findings = self.processor.analyze(text, &file_name);
        tracing::debug!("{} findings in {}", findings.len(), document);
        Ok(findings)
    }
}
