//! GitHub Actions: shared pool wholesale, workflow-command stage markers.

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
        anchored(r"\[github\]\s+job\s+'(.+?)'"),
        anchored(r"\[github\]\s+step\s+'(.+?)'"),
        anchored(r"\[github\]\s+run\s+'(.+?)'"),
        anchored(r"\[github\]\s+Running\s+(?:job|step)\s+'(.+?)'"),
        anchored(r"::group::\s*(.+)"),
        anchored(r"##\[[a-z]+\]\s*Starting:\s*(.+)"),
        anchored(r"\[\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]?\d*\]\s+\[INFO\]\s+Stage:\s+(.+)"),
    ]
}
