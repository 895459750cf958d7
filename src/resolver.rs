//! Resolution of pattern declarations into ready-to-scan rule tables,
//! plus loading of externally supplied pattern documents.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde_yaml::Value;

use crate::bundle::SeverityLevel;
use crate::error::{PipeLensError, Result};
use crate::patterns::{common_patterns, LanguageRule, PatternSpec};

/// Pattern configuration loaded from an external document.
#[derive(Debug, Default)]
pub struct CustomPatterns {
    pub source: Option<String>,
    pub patterns: IndexMap<String, Vec<LanguageRule>>,
    pub stage_patterns: Vec<Regex>,
}

/// Substitutes shared-pool references, leaving literal rule lists as-is.
/// Fails when a reference names a language the pool does not carry.
pub fn resolve_specs(
    specs: IndexMap<&'static str, PatternSpec>,
) -> Result<IndexMap<String, Vec<LanguageRule>>> {
    let mut resolved = IndexMap::new();
    for (language, spec) in specs {
        let rules = match spec {
            PatternSpec::Rules(rules) => rules,
            PatternSpec::Common(key) => common_patterns()
                .get(key)
                .cloned()
                .ok_or_else(|| PipeLensError::MissingCommonPatterns(key.to_string()))?,
        };
        resolved.insert(language.to_string(), rules);
    }
    Ok(resolved)
}

/// Loads a pattern document: optional `source` override, a `patterns`
/// mapping of language to `{regex, severity}` entries, and an optional
/// `stage_patterns` list. Entries missing either field are dropped;
/// structural mismatches and bad severities or regexes are errors.
pub fn load_custom_patterns(path: &Path) -> Result<CustomPatterns> {
    let text = fs::read_to_string(path).map_err(|source| PipeLensError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_yaml::from_str(&text).map_err(|source| PipeLensError::ConfigSyntax {
        path: path.to_path_buf(),
        source,
    })?;

    if !doc.is_mapping() {
        return Err(PipeLensError::ConfigStructure(
            "top-level structure must be a mapping".to_string(),
        ));
    }

    let source = doc
        .get("source")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut patterns = IndexMap::new();
    if let Some(section) = doc.get("patterns") {
        let mapping = section.as_mapping().ok_or_else(|| {
            PipeLensError::ConfigStructure("'patterns' section must be a mapping".to_string())
        })?;
        for (key, value) in mapping {
            let Some(language) = key.as_str() else {
                continue;
            };
            let entries = value.as_sequence().ok_or_else(|| {
                PipeLensError::ConfigStructure(format!(
                    "expected a list of patterns for language '{language}'"
                ))
            })?;
            patterns.insert(language.to_string(), parse_rule_entries(entries)?);
        }
    }

    let stage_patterns = match doc.get("stage_patterns").and_then(Value::as_sequence) {
        Some(entries) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(compile_stage_pattern)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    debug!(
        "loaded pattern config {}: {} languages, {} stage patterns",
        path.display(),
        patterns.len(),
        stage_patterns.len()
    );

    Ok(CustomPatterns {
        source,
        patterns,
        stage_patterns,
    })
}

fn parse_rule_entries(entries: &[Value]) -> Result<Vec<LanguageRule>> {
    let mut rules = Vec::new();
    for entry in entries {
        let (Some(pattern), Some(severity)) = (
            entry.get("regex").and_then(Value::as_str),
            entry.get("severity").and_then(Value::as_str),
        ) else {
            continue;
        };
        let level: SeverityLevel = severity.parse()?;
        let compiled =
            Regex::new(&format!("(?i){pattern}")).map_err(|source| PipeLensError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        rules.push((compiled, level));
    }
    Ok(rules)
}

fn compile_stage_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i)^(?:{pattern})")).map_err(|source| PipeLensError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
