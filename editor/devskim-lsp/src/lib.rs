//! DevSkim Language Server Protocol implementation
//!
//! Keeps open documents in sync with the DevSkim analysis engine and
//! publishes its findings as diagnostics. Candidate fixes are sent alongside
//! on the custom `devskim/codefixmapping` notification, one message per fix,
//! so the editor can offer them as quick fixes without another round trip.
//!
//! # Architecture
//!
//! - **Sync controller**: reacts to open/change/save/close
//! - **Analyzer**: wraps the rule engine behind a trait
//! - **Publisher**: turns findings into diagnostics and fix messages
//! - **Scopes**: per-document settings fetched from the client
//! - **Config**: YAML-based server configuration
//!
//! # Usage
//!
//! Run the language server via stdio:
//!
//! ```bash
//! devskim-lsp
//! devskim-lsp --config path/to/devskim-lsp.yaml
//! ```
//!
//! # Configuration
//!
//! Create a `.devskim-lsp.yaml` in the working directory:
//!
//! ```yaml
//! engine:
//!   name: devskim-lsp
//!   log_level: info
//!
//! analysis:
//!   severity_filter: [critical, important, moderate, manual-review]
//!   confidence_filter: [high, medium]
//!   enable_suppressions: true
//! ```

pub mod engine;

pub use engine::{
    DevSkimServer, DiagnosticSink, DocumentAnalyzer, DocumentSettings, EngineAnalyzer,
    Publisher, ServerConfig, SettingsSource, SyncController,
};
