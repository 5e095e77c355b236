//! Language server core

pub mod analyzer;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod publisher;
pub mod scope;
pub mod server;
pub mod sync;

pub use analyzer::{DocumentAnalyzer, EngineAnalyzer};
pub use config::ServerConfig;
pub use document::DocumentManager;
pub use error::{AnalyzeError, ConfigError, ScopeError};
pub use publisher::{DiagnosticSink, Publisher};
pub use scope::{DocumentSettings, ScopeRegistry, SettingsSource};
pub use server::DevSkimServer;
pub use sync::SyncController;
