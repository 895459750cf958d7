//! Azure DevOps: shared pool wholesale, `##[...]Starting:` stage markers.

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
        anchored(r"^##\[group\]Starting: (.+)"),
        anchored(r"^##\[section\]Starting: (.+)"),
        anchored(r"^##\[stage\]Starting: (.+)"),
        anchored(r"^##\[step\]Starting: (.+)"),
        anchored(r"^##\[task\] (.+)"),
        anchored(r"^\[command\] (.+)"),
        anchored(r"^Starting: (.+)"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_starting_form_captures_name() {
        let captures = stage_patterns()[1]
            .captures("##[section]Starting: Build solution")
            .unwrap();
        assert_eq!(&captures[1], "Build solution");
    }

    #[test]
    fn test_bare_starting_form_captures_name() {
        let captures = stage_patterns()[6]
            .captures("Starting: Publish artifacts")
            .unwrap();
        assert_eq!(&captures[1], "Publish artifacts");
    }
}
