//! Language detection by file name

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_LANGUAGES: &str = include_str!("../data/languages.json");

/// A language the engine knows how to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Language name rules refer to in `applies_to`
    pub name: String,
    /// File extensions including the leading dot
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Exact file names (e.g. `Dockerfile`)
    #[serde(default)]
    pub file_names: Vec<String>,
    /// Line comment prefix used when writing suppressions
    #[serde(default)]
    pub comment: Option<String>,
}

/// Language map
#[derive(Debug, Clone, Default)]
pub struct Languages {
    languages: Vec<LanguageInfo>,
}

impl Languages {
    pub fn new(languages: Vec<LanguageInfo>) -> Self {
        Self { languages }
    }

    /// The language map embedded in the engine
    pub fn load_embedded() -> Result<Self, EngineError> {
        Self::from_json(DEFAULT_LANGUAGES)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let languages = serde_json::from_str(json).map_err(|source| EngineError::Parse {
            what: "language map".to_string(),
            source,
        })?;
        Ok(Self { languages })
    }

    /// Resolve the language of a file
    pub fn language_for(&self, path: &Path) -> Option<&LanguageInfo> {
        let file_name = path.file_name()?.to_str()?;

        if let Some(lang) = self
            .languages
            .iter()
            .find(|l| l.file_names.iter().any(|n| n.eq_ignore_ascii_case(file_name)))
        {
            return Some(lang);
        }

        let ext = path.extension()?.to_str()?.to_lowercase();
        self.languages.iter().find(|l| {
            l.extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_languages() {
        let langs = Languages::load_embedded().unwrap();
        assert!(!langs.is_empty());
        assert!(langs.language_for(Path::new("a.cs")).is_some());
    }

    #[test]
    fn test_language_for_extension() {
        let langs = Languages::load_embedded().unwrap();
        let lang = langs.language_for(Path::new("/src/Program.cs")).unwrap();
        assert_eq!(lang.name, "csharp");
        assert_eq!(lang.comment.as_deref(), Some("//"));

        let lang = langs.language_for(Path::new("script.PY")).unwrap();
        assert_eq!(lang.name, "python");
        assert_eq!(lang.comment.as_deref(), Some("#"));
    }

    #[test]
    fn test_language_for_file_name() {
        let langs = Languages::load_embedded().unwrap();
        let lang = langs.language_for(Path::new("/repo/Dockerfile")).unwrap();
        assert_eq!(lang.name, "dockerfile");
    }

    #[test]
    fn test_unknown_extension() {
        let langs = Languages::load_embedded().unwrap();
        assert!(langs.language_for(Path::new("notes.unknownext")).is_none());
        assert!(langs.language_for(Path::new("README")).is_none());
    }
}
