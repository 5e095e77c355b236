//! Server errors

use devskim_engine::EngineError;
use devskim_protocol::DocumentIdentity;
use std::path::PathBuf;
use thiserror::Error;

/// Analysis of one document failed
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("analysis of {document} failed: {reason}")]
    Failed {
        document: DocumentIdentity,
        reason: String,
    },

    #[error("analysis task for {document} did not complete: {reason}")]
    Aborted {
        document: DocumentIdentity,
        reason: String,
    },
}

/// Configuration scope misuse
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("configuration scope for {0} is already acquired")]
    AlreadyAcquired(DocumentIdentity),

    #[error("configuration scope for {0} was never acquired")]
    NotAcquired(DocumentIdentity),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
