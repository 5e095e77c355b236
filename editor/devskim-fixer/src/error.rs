//! Fixer errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixerError {
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported notification {0}")]
    UnsupportedMethod(String),
}
