//! Rule definitions
//!
//! Rules are data: a JSON array of objects, each with one or more regex
//! patterns and optional fix templates. The default set ships inside the
//! crate; extra rule files can be merged on top.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_RULES: &str = include_str!("../data/rules.json");

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Critical,
    Important,
    Moderate,
    BestPractice,
    ManualReview,
}

impl Severity {
    /// The filter the language server runs with
    pub fn default_filter() -> Vec<Severity> {
        vec![
            Severity::Critical,
            Severity::Important,
            Severity::Moderate,
            Severity::ManualReview,
        ]
    }
}

/// How likely a finding is to be a true positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn default_filter() -> Vec<Confidence> {
        vec![Confidence::High, Confidence::Medium]
    }
}

/// A regex that triggers a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    pub pattern: String,
    /// `i` = case-insensitive, `m` = multi-line anchors
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl RulePattern {
    pub fn is_case_insensitive(&self) -> bool {
        self.modifiers.iter().any(|m| m == "i")
    }

    pub fn is_multi_line(&self) -> bool {
        self.modifiers.iter().any(|m| m == "m")
    }
}

/// A regex-replace fix applied to the matched text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixIt {
    pub name: String,
    pub pattern: String,
    pub replacement: String,
}

/// A single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: Severity,
    #[serde(default = "default_confidence")]
    pub confidence: Confidence,
    /// Language names this rule applies to (empty = every language)
    #[serde(default)]
    pub applies_to: Vec<String>,
    pub patterns: Vec<RulePattern>,
    #[serde(default)]
    pub fix_its: Vec<FixIt>,
}

fn default_confidence() -> Confidence {
    Confidence::Medium
}

impl Rule {
    pub fn applies_to_language(&self, language: &str) -> bool {
        self.applies_to.is_empty()
            || self
                .applies_to
                .iter()
                .any(|l| l.eq_ignore_ascii_case(language))
    }
}

/// An ordered collection of rules with unique ids
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules embedded in the engine
    pub fn default_rules() -> Result<Self, EngineError> {
        Self::from_json(DEFAULT_RULES, "embedded rules")
    }

    /// Parse a JSON array of rules
    pub fn from_json(json: &str, what: &str) -> Result<Self, EngineError> {
        let rules: Vec<Rule> = serde_json::from_str(json).map_err(|source| EngineError::Parse {
            what: what.to_string(),
            source,
        })?;

        let mut set = Self::new();
        set.extend(rules)?;
        Ok(set)
    }

    /// Load rules from a JSON file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// Add a single rule
    pub fn add(&mut self, rule: Rule) -> Result<(), EngineError> {
        if rule.patterns.is_empty() {
            return Err(EngineError::EmptyRule(rule.id));
        }
        if self.get(&rule.id).is_some() {
            return Err(EngineError::DuplicateRule(rule.id));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Add every rule, stopping at the first invalid one
    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<(), EngineError> {
        for rule in rules {
            self.add(rule)?;
        }
        Ok(())
    }

    /// Merge another set into this one
    pub fn merge(&mut self, other: RuleSet) -> Result<(), EngineError> {
        self.extend(other.rules)
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}
