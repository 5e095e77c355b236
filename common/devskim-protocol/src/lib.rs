//! Shared protocol pieces for the DevSkim language server and its clients
//!
//! The server publishes diagnostics through the regular LSP channel and sends
//! candidate fixes on a separate `devskim/codefixmapping` notification. The
//! two sides never share diagnostic objects, so a fix is matched back to the
//! diagnostic the editor shows by recomputing a [`CorrelationKey`] from the
//! diagnostic's content.
//!
//! - [`DocumentIdentity`]: canonical document URI, identical on both sides
//! - [`CorrelationKey`]: content-derived join key between diagnostics and fixes
//! - [`CodeFixMapping`]: the fix notification payload

pub mod identity;
pub mod key;
pub mod mapping;

pub use identity::DocumentIdentity;
pub use key::CorrelationKey;
pub use mapping::{CodeFixMapping, CodeFixMappingNotification};

/// Prefix of every diagnostic code produced by the server
pub const DIAGNOSTIC_CODE_PREFIX: &str = "MS-CST-E.vscode-devskim";

/// Marker that identifies a suppression fix inside a replacement text
pub const SUPPRESSION_MARKER: &str = "DevSkim: ignore ";

/// Build the diagnostic code for a rule id
pub fn diagnostic_code(rule_id: &str) -> String {
    format!("{}: {}", DIAGNOSTIC_CODE_PREFIX, rule_id)
}
