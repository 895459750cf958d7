//! GitLab CI: shared pool wholesale, runner/section stage markers.

use indexmap::IndexMap;
use regex::Regex;

use super::{anchored, PatternSpec};

pub(crate) fn specs() -> IndexMap<&'static str, PatternSpec> {
    let mut specs = IndexMap::new();
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
        // Runner banner marks a boundary but names no stage.
        anchored(r"Running with gitlab-runner"),
        anchored(r#"Executing "(.+?)" stage of the job"#),
        anchored(r"section_(start|end):\d+:[a-zA-Z0-9_-]+"),
        anchored(r"\[gitlab\]\s+\{\s*\((.+?)\)\}"),
        anchored(r"\[gitlab\]\s+(.+)"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executing_stage_form_captures_name() {
        let captures = stage_patterns()[2]
            .captures(r#"Executing "build_script" stage of the job"#)
            .unwrap();
        assert_eq!(&captures[1], "build_script");
    }

    #[test]
    fn test_runner_banner_matches_without_capture() {
        let captures = stage_patterns()[1]
            .captures("Running with gitlab-runner 16.4.1")
            .unwrap();
        assert!(captures.get(1).is_none());
    }

    #[test]
    fn test_section_marker_captures_direction_token() {
        let captures = stage_patterns()[3]
            .captures("section_start:1700000000:install_deps")
            .unwrap();
        assert_eq!(&captures[1], "start");
    }
}
