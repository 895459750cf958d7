//! Built-in classification and stage-boundary patterns, per CI source.
//!
//! Each source declares an ordered language map whose entries are either
//! literal rule lists or references into the shared pool (`common`), plus
//! an ordered list of stage-boundary patterns. Order is significant in
//! both: classification and stage detection are first-match-wins.

mod azure;
mod common;
mod github;
mod gitlab;
mod jenkins;

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::bundle::SeverityLevel;

pub use common::common_patterns;

/// A compiled classification rule and the severity it assigns.
pub type LanguageRule = (Regex, SeverityLevel);

/// One language's rules as a source declares them: a literal list, or a
/// reference to the shared pool by language key.
#[derive(Debug, Clone)]
pub enum PatternSpec {
    Rules(Vec<LanguageRule>),
    Common(&'static str),
}

/// Built-in source names, in the order they are reported.
pub const SOURCES: &[&str] = &["jenkins", "github_actions", "gitlab_ci", "azure_devops"];

/// Language pattern declarations for a built-in source.
pub fn language_specs(source: &str) -> Option<IndexMap<&'static str, PatternSpec>> {
    match source {
        "jenkins" => Some(jenkins::specs()),
        "github_actions" => Some(github::specs()),
        "gitlab_ci" => Some(gitlab::specs()),
        "azure_devops" => Some(azure::specs()),
        _ => None,
    }
}

/// Stage-boundary patterns for a built-in source, in scan order.
pub fn stage_patterns(source: &str) -> Option<Vec<Regex>> {
    match source {
        "jenkins" => Some(jenkins::stage_patterns()),
        "github_actions" => Some(github::stage_patterns()),
        "gitlab_ci" => Some(gitlab::stage_patterns()),
        "azure_devops" => Some(azure::stage_patterns()),
        _ => None,
    }
}

static BASELINE: OnceLock<Vec<LanguageRule>> = OnceLock::new();

/// Generic severity tokens, consulted only after the per-language rules
/// of the detected language have all missed. Most severe first.
pub fn baseline_severity_rules() -> &'static [LanguageRule] {
    BASELINE.get_or_init(|| {
        vec![
            rule(r"\b(?:CRITICAL|FATAL)\b", SeverityLevel::Critical),
            rule(r"\b(?:ERROR\b|ERR!)", SeverityLevel::Error),
            rule(r"\b(?:WARNING|WARN)\b", SeverityLevel::Warning),
        ]
    })
}

/// Compiles a trusted built-in pattern, case-insensitively.
pub(crate) fn insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).unwrap()
}

/// Stage patterns match from the start of the (already trimmed) line.
pub(crate) fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("(?i)^(?:{pattern})")).unwrap()
}

pub(crate) fn rule(pattern: &str, severity: SeverityLevel) -> LanguageRule {
    (insensitive(pattern), severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_source_has_specs_and_stage_patterns() {
        for source in SOURCES {
            assert!(language_specs(source).is_some(), "missing specs: {source}");
            assert!(
                stage_patterns(source).is_some(),
                "missing stage patterns: {source}"
            );
        }
    }

    #[test]
    fn test_unknown_source_has_no_patterns() {
        assert!(language_specs("circleci").is_none());
        assert!(stage_patterns("circleci").is_none());
    }

    #[test]
    fn test_baseline_rules_rank_most_severe_first() {
        let rules = baseline_severity_rules();
        assert_eq!(rules[0].1, SeverityLevel::Critical);
        assert_eq!(rules[1].1, SeverityLevel::Error);
        assert_eq!(rules[2].1, SeverityLevel::Warning);
    }

    #[test]
    fn test_baseline_rules_match_plain_prefixes() {
        let classify = |line: &str| {
            baseline_severity_rules()
                .iter()
                .find(|(pattern, _)| pattern.is_match(line))
                .map(|(_, level)| *level)
        };
        assert_eq!(
            classify("ERROR: Build failed due to compilation error"),
            Some(SeverityLevel::Error)
        );
        assert_eq!(
            classify("WARNING: Low disk space"),
            Some(SeverityLevel::Warning)
        );
        assert_eq!(
            classify("FATAL: out of memory"),
            Some(SeverityLevel::Critical)
        );
        assert_eq!(classify("npm ERR! missing script"), Some(SeverityLevel::Error));
        assert_eq!(classify("Cloning repository"), None);
    }

    #[test]
    fn test_anchored_patterns_do_not_match_mid_line() {
        let pattern = anchored(r"\[(\w+)\]\s+.+");
        assert!(pattern.is_match("[Git] Cloning repository"));
        assert!(!pattern.is_match("prefix [Git] Cloning repository"));
    }
}
