//! Jenkins: groovy rules of its own, shared pool for everything else.

use indexmap::IndexMap;
use regex::Regex;

use super::{anchored, rule, PatternSpec};
use crate::bundle::SeverityLevel::{Critical, Error};

pub(crate) fn specs() -> IndexMap<&'static str, PatternSpec> {
    let mut specs = IndexMap::new();
    specs.insert(
        "groovy",
        PatternSpec::Rules(vec![
            rule(r".*groovy\.lang\.MissingPropertyException.*", Error),
            rule(r".*unable to resolve class.*", Error),
            rule(r".*groovy\.lang\.MissingMethodException.*", Error),
            rule(r".*groovy\.lang\.GroovyRuntimeException.*", Error),
            rule(r".*java\.lang\.ClassCastException.*", Error),
            rule(r".*java\.lang\.NullPointerException.*", Critical),
            rule(r".*No such property:.*", Error),
            rule(r".*WorkflowScript.*", Error),
            rule(
                r".*org\.codehaus\.groovy\.control\.MultipleCompilationErrorsException.*",
                Critical,
            ),
            rule(r".*Cannot invoke method.*on null object.*", Error),
            rule(
                r".*groovy\.lang\.MissingMethodException: No signature of method.*",
                Error,
            ),
        ]),
    );
    specs.insert("python", PatternSpec::Common("python"));
    specs.insert("nodejs", PatternSpec::Common("nodejs"));
    specs.insert("java", PatternSpec::Common("java"));
    specs.insert("dotnet", PatternSpec::Common("dotnet"));
    specs.insert("shell", PatternSpec::Common("shell"));
    specs.insert("batch", PatternSpec::Common("batch"));
    specs.insert("docker", PatternSpec::Common("docker"));
    specs.insert("kubernetes", PatternSpec::Common("kubernetes"));
    specs.insert("make", PatternSpec::Common("make"));
    specs
}

pub(crate) fn stage_patterns() -> Vec<Regex> {
    vec![
        anchored(r"\[\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]?\d*\]\s+\[INFO\]\s+Stage:\s+(.+)"),
        anchored(r"^\s*\[\s*Pipeline\s*\]\s*\{\s*stage\s*\(.+?\)"),
        anchored(r"^\s*\[\s*Pipeline\s*\]\s*stage\s*\('(.+?)'\)"),
        anchored(r"\[jenkins\]\s+Running stage\s+'(.+?)'"),
        anchored(r"\[jenkins\]\s+Entering stage\s+'(.+?)'"),
        anchored(r"\[jenkins\]\s+(.+?)"),
        anchored(r"^\s*\[\s*Pipeline\s*\]\s*echo\s+.*Starting\s+stage:\s+(.+)"),
        // Bare bracket headers, e.g. "[Git] Cloning repository". Last so
        // the specific forms above keep precedence.
        anchored(r"\[(\w+)\]\s+.+"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_capture(line: &str) -> Option<String> {
        stage_patterns().iter().find_map(|pattern| {
            pattern
                .captures(line)
                .and_then(|captures| captures.get(1))
                .map(|capture| capture.as_str().to_string())
        })
    }

    #[test]
    fn test_pipeline_stage_directive_captures_name() {
        assert_eq!(
            first_capture("[Pipeline] stage ('Build')"),
            Some("Build".to_string())
        );
    }

    #[test]
    fn test_running_stage_form_captures_name() {
        assert_eq!(
            first_capture("[jenkins] Running stage 'Deploy'"),
            Some("Deploy".to_string())
        );
    }

    #[test]
    fn test_bracket_header_falls_through_to_generic_form() {
        assert_eq!(
            first_capture("[Maven] Building project"),
            Some("Maven".to_string())
        );
    }

    #[test]
    fn test_brace_stage_form_matches_without_capture() {
        let pattern = &stage_patterns()[1];
        let captures = pattern.captures("[Pipeline] { stage ('Build')").unwrap();
        assert!(captures.get(1).is_none());
    }

    #[test]
    fn test_groovy_rules_rank_null_pointer_critical() {
        let specs = specs();
        let PatternSpec::Rules(rules) = &specs["groovy"] else {
            panic!("groovy must carry literal rules");
        };
        let line = "java.lang.NullPointerException: Cannot get property on null";
        let hit = rules.iter().find(|(pattern, _)| pattern.is_match(line));
        assert_eq!(hit.map(|(_, level)| *level), Some(Critical));
    }
}
