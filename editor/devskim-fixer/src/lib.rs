//! Editor-side half of the DevSkim fix protocol
//!
//! The language server publishes diagnostics and, separately, one
//! `devskim/codefixmapping` notification per candidate fix. This crate keeps
//! those fixes in a [`FixRegistry`] and turns them into quick-fix code actions
//! when the editor asks for actions at a diagnostic.
//!
//! A client host forwards raw notifications to a [`FixerSession`]:
//!
//! ```no_run
//! use devskim_fixer::FixerSession;
//! use serde_json::json;
//!
//! let mut session = FixerSession::new();
//! session
//!     .handle_notification("textDocument/publishDiagnostics", json!({
//!         "uri": "file:///c:/src/a.cs",
//!         "diagnostics": [],
//!         "version": 3
//!     }))
//!     .unwrap();
//! ```

pub mod error;
pub mod quickfix;
pub mod registry;
pub mod session;

pub use error::FixerError;
pub use quickfix::{action_title, provide_actions};
pub use registry::{FixRegistry, RecordOutcome};
pub use session::FixerSession;
