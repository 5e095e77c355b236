//! DevSkim analysis engine
//!
//! A small, regex-driven security linter. Rules and languages are plain JSON;
//! a [`RuleProcessor`] is built once from a rule set and its options and can
//! then analyze any number of documents in parallel.
//!
//! # Example
//!
//! ```no_run
//! use devskim_engine::{Languages, ProcessorOptions, RuleProcessor, RuleSet};
//! use std::path::Path;
//!
//! let options = ProcessorOptions::new(Languages::load_embedded().unwrap());
//! let processor = RuleProcessor::new(RuleSet::default_rules().unwrap(), options).unwrap();
//!
//! for finding in processor.analyze("var md5 = MD5.Create();", Path::new("a.cs")) {
//!     println!("{} at {}:{}", finding.rule_id, finding.start.line, finding.start.column);
//! }
//! ```

pub mod error;
pub mod finding;
pub mod language;
pub mod location;
pub mod processor;
pub mod rule;
pub mod suppression;

pub use error::EngineError;
pub use finding::{CodeFix, Finding, FixKind};
pub use language::{LanguageInfo, Languages};
pub use location::{LineIndex, Location};
pub use processor::{ProcessorOptions, RuleProcessor};
pub use rule::{Confidence, FixIt, Rule, RulePattern, RuleSet, Severity};
pub use suppression::SuppressionMap;
