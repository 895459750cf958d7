//! Shared per-language rules that sources reference by key.

use std::sync::OnceLock;

use indexmap::IndexMap;

use super::{rule, LanguageRule};
use crate::bundle::SeverityLevel::{Critical, Error, Warning};

static COMMON: OnceLock<IndexMap<&'static str, Vec<LanguageRule>>> = OnceLock::new();

pub fn common_patterns() -> &'static IndexMap<&'static str, Vec<LanguageRule>> {
    COMMON.get_or_init(|| {
        let mut pool = IndexMap::new();
        pool.insert(
            "python",
            vec![
                rule(r"Traceback \(most recent call last\):", Error),
                rule(r"MemoryError", Critical),
                rule(r"ModuleNotFoundError", Error),
                rule(r"SyntaxError:", Error),
            ],
        );
        pool.insert(
            "nodejs",
            vec![
                rule(r"UnhandledPromiseRejectionWarning", Error),
                rule(r"TypeError:", Error),
                rule(r"ReferenceError:", Error),
                rule(r"RangeError:", Error),
                rule(r"SyntaxError:", Error),
                rule(r"ENOENT: no such file or directory", Error),
                rule(r"ECONNREFUSED", Warning),
                rule(r"EADDRINUSE", Error),
                rule(r"Cannot find module", Error),
                rule(r"Error: listen EACCES", Error),
                rule(r"DeprecationWarning:", Warning),
                // Azure DevOps logging commands show up in node jobs too
                rule(r"##\[error\]", Error),
                rule(r"##\[warning\]", Warning),
                rule(r"error TS\d{4}:", Error),
                // ESLint summary and per-rule output
                rule(r"✖ \d+ problems? \(\d+ errors?, \d+ warnings?\)", Warning),
                rule(r"'.+' is defined but never used", Warning),
                rule(r"undefined is not a function", Error),
                rule(r"Cannot read properties of undefined", Error),
            ],
        );
        pool.insert(
            "java",
            vec![
                rule(r"Exception in thread", Critical),
                rule(r"java\.lang\.NullPointerException", Critical),
                rule(r"java\.lang\.OutOfMemoryError", Critical),
                rule(r"java\.lang\.ArrayIndexOutOfBoundsException", Error),
                rule(r"java\.lang\.IllegalArgumentException", Error),
                rule(r"java\.lang\.IllegalStateException", Error),
                rule(r"java\.lang\.ClassCastException", Error),
                rule(r"Caused by:", Error),
                rule(r"ExceptionMapper", Warning),
                rule(r"java\.sql\.SQLException", Error),
                rule(
                    r"org\.springframework\.beans\.factory\.BeanCreationException",
                    Critical,
                ),
                rule(r"org\.hibernate\.Exception", Error),
            ],
        );
        pool.insert(
            "dotnet",
            vec![
                rule(r"System\.NullReferenceException", Critical),
                rule(r"System\.OutOfMemoryException", Critical),
                rule(r"System\.InvalidOperationException", Error),
                rule(r"System\.ArgumentException", Error),
                rule(r"System\.IO\.IOException", Warning),
            ],
        );
        pool.insert(
            "shell",
            vec![
                rule(r"command not found", Error),
                rule(r"syntax error", Error),
                rule(r"permission denied", Error),
                rule(r"No such file or directory", Error),
                rule(r"operation not permitted", Error),
            ],
        );
        pool.insert(
            "batch",
            vec![
                rule(r"The system cannot find the file specified", Error),
                rule(r"Access is denied", Error),
                rule(r"Syntax error in command line", Error),
                rule(r"is not recognized as an internal or external command", Error),
            ],
        );
        pool.insert(
            "docker",
            vec![
                rule(r"no such file or directory", Error),
                rule(r"failed to build", Critical),
                rule(r"error response from daemon:", Critical),
                rule(r"manifest for .* not found", Error),
                rule(r"unauthorized: authentication required", Error),
                rule(r"pull access denied", Error),
            ],
        );
        pool.insert(
            "kubernetes",
            vec![
                rule(r"CrashLoopBackOff", Critical),
                rule(r"ImagePullBackOff", Critical),
                rule(r"Failed to pull image", Error),
                rule(r"MountVolume.SetUp failed", Error),
                rule(r"Back-off restarting failed container", Error),
                rule(r"liveness probe failed", Warning),
                rule(r"readiness probe failed", Warning),
            ],
        );
        pool.insert(
            "make",
            vec![
                rule(r"make: \*\*\* .* Error \d+", Error),
                rule(r"missing separator", Error),
                rule(r"recursive variable", Warning),
                rule(r"undefined reference to", Error),
            ],
        );
        pool
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::SeverityLevel;

    #[test]
    fn test_pool_languages_in_declaration_order() {
        let languages: Vec<&str> = common_patterns().keys().copied().collect();
        assert_eq!(
            languages,
            vec![
                "python",
                "nodejs",
                "java",
                "dotnet",
                "shell",
                "batch",
                "docker",
                "kubernetes",
                "make"
            ]
        );
    }

    #[test]
    fn test_python_traceback_is_error() {
        let rules = &common_patterns()["python"];
        let line = "Traceback (most recent call last):";
        let hit = rules.iter().find(|(pattern, _)| pattern.is_match(line));
        assert_eq!(hit.map(|(_, level)| *level), Some(SeverityLevel::Error));
    }

    #[test]
    fn test_rules_match_case_insensitively() {
        let rules = &common_patterns()["shell"];
        assert!(rules.iter().any(|(pattern, _)| pattern.is_match("bash: foo: COMMAND NOT FOUND")));
    }

    #[test]
    fn test_ordering_within_language_wins() {
        // "failed to build" outranks later docker rules on the same line.
        let rules = &common_patterns()["docker"];
        let line = "failed to build: pull access denied";
        let first = rules.iter().find(|(pattern, _)| pattern.is_match(line));
        assert_eq!(first.map(|(_, level)| *level), Some(SeverityLevel::Critical));
    }
}
