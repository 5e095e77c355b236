//! The rule processor
//!
//! Built once from a [`RuleSet`] and [`ProcessorOptions`]; afterwards it is
//! read-only, so a single processor can be shared across threads and used to
//! analyze many documents at the same time.

use crate::error::EngineError;
use crate::finding::{CodeFix, Finding};
use crate::language::{LanguageInfo, Languages};
use crate::location::LineIndex;
use crate::rule::{Confidence, Rule, RulePattern, RuleSet, Severity};
use crate::suppression::{suppression_comment, SuppressionMap};
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// One-time construction options
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    pub languages: Languages,
    /// Only rules with one of these severities run
    pub severity_filter: Vec<Severity>,
    /// Only rules with one of these confidences run
    pub confidence_filter: Vec<Confidence>,
    /// Match rules in parallel
    pub parallel: bool,
    /// Honour `DevSkim: ignore` comments and offer suppression fixes
    pub enable_suppressions: bool,
}

impl ProcessorOptions {
    /// Options with the default filters
    pub fn new(languages: Languages) -> Self {
        Self {
            languages,
            severity_filter: Severity::default_filter(),
            confidence_filter: Confidence::default_filter(),
            parallel: true,
            enable_suppressions: true,
        }
    }
}

struct CompiledFix {
    name: String,
    pattern: Regex,
    replacement: String,
}

struct CompiledRule {
    rule: Rule,
    patterns: Vec<Regex>,
    fixes: Vec<CompiledFix>,
}

/// Runs a rule set over documents
pub struct RuleProcessor {
    rules: Vec<CompiledRule>,
    options: ProcessorOptions,
}

impl RuleProcessor {
    /// Compile every rule that passes the severity and confidence filters
    pub fn new(rule_set: RuleSet, options: ProcessorOptions) -> Result<Self, EngineError> {
        let mut rules = Vec::new();

        for rule in rule_set.into_rules() {
            if !options.severity_filter.contains(&rule.severity)
                || !options.confidence_filter.contains(&rule.confidence)
            {
                tracing::trace!(rule = %rule.id, "rule filtered out");
                continue;
            }
            rules.push(compile(rule)?);
        }

        tracing::debug!(rules = rules.len(), "rule processor ready");
        Ok(Self { rules, options })
    }

    /// Ids of the rules that will run
    pub fn active_rules(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.rule.id.as_str()).collect()
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Analyze a document
    ///
    /// Files in unknown languages produce no findings. Findings are ordered
    /// by start location, then rule id.
    pub fn analyze(&self, text: &str, file_name: &Path) -> Vec<Finding> {
        let Some(language) = self.options.languages.language_for(file_name) else {
            tracing::trace!(file = %file_name.display(), "no language for file");
            return Vec::new();
        };

        let index = LineIndex::new(text);
        let suppressions = if self.options.enable_suppressions {
            SuppressionMap::parse(text)
        } else {
            SuppressionMap::default()
        };

        let applicable: Vec<&CompiledRule> = self
            .rules
            .iter()
            .filter(|r| r.rule.applies_to_language(&language.name))
            .collect();

        let run =
            |rule: &&CompiledRule| self.match_rule(rule, text, &index, language, &suppressions);

        let mut findings: Vec<Finding> = if self.options.parallel {
            applicable.par_iter().flat_map_iter(run).collect()
        } else {
            applicable.iter().flat_map(run).collect()
        };

        findings.sort_by(|a, b| {
            (a.start, a.end, &a.rule_id).cmp(&(b.start, b.end, &b.rule_id))
        });
        findings
    }

    fn match_rule(
        &self,
        compiled: &CompiledRule,
        text: &str,
        index: &LineIndex<'_>,
        language: &LanguageInfo,
        suppressions: &SuppressionMap,
    ) -> Vec<Finding> {
        let rule = &compiled.rule;
        let mut findings = Vec::new();

        for pattern in &compiled.patterns {
            for m in pattern.find_iter(text) {
                if m.is_empty() {
                    continue;
                }

                let start = index.location(m.start());
                if suppressions.is_suppressed(&rule.id, start.line) {
                    continue;
                }

                let matched = m.as_str();
                let mut fixes: Vec<CodeFix> = compiled
                    .fixes
                    .iter()
                    .filter(|f| f.pattern.is_match(matched))
                    .map(|f| {
                        let replaced = f.pattern.replace_all(matched, f.replacement.as_str());
                        CodeFix::replace(f.name.clone(), replaced.into_owned())
                    })
                    .collect();

                if self.options.enable_suppressions {
                    let rest = index.rest_of_line(m.end());
                    if let Some(fix) = suppression_fix(rule, matched, rest, language) {
                        fixes.push(fix);
                    }
                }

                findings.push(Finding {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    description: rule.description.clone(),
                    severity: rule.severity,
                    confidence: rule.confidence,
                    start,
                    end: index.location(m.end()),
                    matched_text: matched.to_string(),
                    fixes,
                });
            }
        }

        findings
    }
}

/// A line comment appended to the match, when nothing else follows it
fn suppression_fix(
    rule: &Rule,
    matched: &str,
    rest_of_line: &str,
    language: &LanguageInfo,
) -> Option<CodeFix> {
    let prefix = language.comment.as_deref()?;
    if !rest_of_line.trim().is_empty() || matched.contains('\n') {
        return None;
    }

    Some(CodeFix::suppress(
        format!("Suppress {}", rule.id),
        format!("{} {}", matched, suppression_comment(prefix, &rule.id)),
    ))
}

fn compile(rule: Rule) -> Result<CompiledRule, EngineError> {
    let patterns = rule
        .patterns
        .iter()
        .map(|p| build_regex(&rule.id, p))
        .collect::<Result<Vec<_>, _>>()?;

    let fixes = rule
        .fix_its
        .iter()
        .map(|f| {
            Regex::new(&f.pattern)
                .map(|pattern| CompiledFix {
                    name: f.name.clone(),
                    pattern,
                    replacement: f.replacement.clone(),
                })
                .map_err(|source| EngineError::InvalidPattern {
                    rule_id: rule.id.clone(),
                    pattern: f.pattern.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledRule {
        rule,
        patterns,
        fixes,
    })
}

fn build_regex(rule_id: &str, pattern: &RulePattern) -> Result<Regex, EngineError> {
    RegexBuilder::new(&pattern.pattern)
        .case_insensitive(pattern.is_case_insensitive())
        .multi_line(pattern.is_multi_line())
        .build()
        .map_err(|source| EngineError::InvalidPattern {
            rule_id: rule_id.to_string(),
            pattern: pattern.pattern.clone(),
            source,
        })
}
