//! Canonical document identity
//!
//! Editors and servers escape reserved URI characters differently: one side
//! sends `file:///c%3A/src/a.cs` while the other prints `file:///C:/src/a.cs`.
//! Every identity that takes part in fix correlation goes through
//! [`DocumentIdentity::new`] so both spellings compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tower_lsp::lsp_types::Url;

const FILE_SCHEME_ROOT: &str = "file:///";

/// Canonical string form of a document URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DocumentIdentity(String);

impl DocumentIdentity {
    /// Canonicalize a raw URI string
    pub fn new(raw: &str) -> Self {
        let decoded = decode_colons(raw);
        Self(lowercase_drive_letter(decoded))
    }

    /// Canonicalize a parsed URI
    pub fn from_url(url: &Url) -> Self {
        Self::new(url.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename handed to the analysis engine
    ///
    /// Falls back to the raw URI path when the identity is not a local file.
    pub fn file_name(&self) -> PathBuf {
        Url::parse(&self.0)
            .ok()
            .and_then(|url| {
                url.to_file_path()
                    .ok()
                    .or_else(|| Some(PathBuf::from(url.path())))
            })
            .unwrap_or_else(|| PathBuf::from(&self.0))
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentIdentity {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<DocumentIdentity> for String {
    fn from(identity: DocumentIdentity) -> Self {
        identity.0
    }
}

impl From<&Url> for DocumentIdentity {
    fn from(url: &Url) -> Self {
        Self::from_url(url)
    }
}

/// Replace every `%3A`/`%3a` with `:`
fn decode_colons(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let escape = rest.get(idx..idx + 3);
        match escape {
            Some(e) if e.eq_ignore_ascii_case("%3a") => {
                out.push(':');
                rest = &rest[idx + 3..];
            }
            _ => {
                out.push('%');
                rest = &rest[idx + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// `file:///C:/x` -> `file:///c:/x`
fn lowercase_drive_letter(mut uri: String) -> String {
    let Some(tail) = uri.get(FILE_SCHEME_ROOT.len()..) else {
        return uri;
    };
    if !uri[..FILE_SCHEME_ROOT.len()].eq_ignore_ascii_case(FILE_SCHEME_ROOT) {
        return uri;
    }

    let bytes = tail.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_uppercase() && bytes[1] == b':' {
        let at = FILE_SCHEME_ROOT.len();
        let lower = (bytes[0] as char).to_ascii_lowercase().to_string();
        uri.replace_range(at..at + 1, &lower);
    }

    uri
}
