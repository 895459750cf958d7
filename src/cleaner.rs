//! Stage-name normalization strategies, one per source with a generic
//! fallback. A `None` means the capture is not a usable stage name.

use std::sync::OnceLock;

use regex::Regex;

struct CleanerPatterns {
    github_group: Regex,
    github_run: Regex,
    gitlab_running_stage: Regex,
    gitlab_section_start: Regex,
    gitlab_trailing_bracket: Regex,
    jenkins_ordinal: Regex,
    jenkins_trailing_bracket: Regex,
}

fn cleaner_patterns() -> &'static CleanerPatterns {
    static PATTERNS: OnceLock<CleanerPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CleanerPatterns {
        github_group: Regex::new(r"(?i)^##\[group\]\s*").unwrap(),
        github_run: Regex::new(r"(?i)^Run\s+").unwrap(),
        gitlab_running_stage: Regex::new(r"(?i)^----->\s*Running stage:\s*").unwrap(),
        gitlab_section_start: Regex::new(r"(?i)^section_start:\d+:\s*").unwrap(),
        gitlab_trailing_bracket: Regex::new(r"(?i)\[.*\]$").unwrap(),
        jenkins_ordinal: Regex::new(r"^\d+[\.\)]\s*").unwrap(),
        jenkins_trailing_bracket: Regex::new(r"\s*\[.*?\]$").unwrap(),
    })
}

/// Applies the strategy registered for `source`, falling back to the
/// generic one for sources without a dedicated cleaner.
pub fn clean_stage_name(source: &str, raw: &str) -> Option<String> {
    match source {
        "github_actions" => github_actions(raw),
        "gitlab_ci" => gitlab_ci(raw),
        "jenkins" => jenkins(raw),
        _ => default(raw),
    }
}

fn default(raw: &str) -> Option<String> {
    accept(raw.trim())
}

fn github_actions(raw: &str) -> Option<String> {
    let patterns = cleaner_patterns();
    let name = raw.trim();
    let name = patterns.github_group.replace(name, "");
    let name = patterns.github_run.replace(&name, "");
    accept(&name)
}

fn gitlab_ci(raw: &str) -> Option<String> {
    let patterns = cleaner_patterns();
    let name = raw.trim();
    let name = patterns.gitlab_running_stage.replace(name, "");
    let name = patterns.gitlab_section_start.replace(&name, "");
    let name = patterns.gitlab_trailing_bracket.replace(&name, "");
    accept(&name)
}

fn jenkins(raw: &str) -> Option<String> {
    let patterns = cleaner_patterns();
    let name = raw.trim();
    if matches!(
        name.to_lowercase().as_str(),
        "user" | "admin" | "system" | "sh"
    ) {
        return None;
    }
    let name = patterns.jenkins_ordinal.replace(name, "");
    let name = patterns.jenkins_trailing_bracket.replace(&name, "");
    if name.is_empty() {
        return None;
    }
    // Single-character names pass here; only the generic strategies
    // enforce a minimum length.
    if name.eq_ignore_ascii_case("pipeline") {
        Some("Pipeline".to_string())
    } else {
        Some(name.into_owned())
    }
}

fn accept(name: &str) -> Option<String> {
    if name.chars().count() < 2 {
        None
    } else {
        Some(name.to_string())
    }
}
