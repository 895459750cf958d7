//! The pipeline log segmentation engine: stage tracking, per-line
//! classification, severity filtering, deduplication, and bundle
//! assembly.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use regex::Regex;

use crate::bundle::{LogEntry, ParsedPipelineBundle, SeverityLevel, StageWindow};
use crate::cleaner;
use crate::error::{PipeLensError, Result};
use crate::extract::{self, DEFAULT_WINDOW_SIZE};
use crate::patterns::{self, LanguageRule};
use crate::resolver;

/// Name lines fall under before any stage header has been seen.
pub const DEFAULT_STAGE: &str = "Unknown";

/// Construction-time knobs for [`PipelineParser`].
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Built-in source whose patterns to load (`jenkins`,
    /// `github_actions`, `gitlab_ci`, `azure_devops`).
    pub source: Option<String>,
    /// Pattern document merged over the built-ins.
    pub config_file: Option<PathBuf>,
    /// Line window searched around an entry for a context id.
    pub window_size: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            source: None,
            config_file: None,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Segments raw CI/CD logs into severity-classified, stage-grouped
/// entries. Configuration is resolved once at construction; `parse` is
/// a pure function of its input after that.
#[derive(Debug)]
pub struct PipelineParser {
    source: String,
    patterns: IndexMap<String, Vec<LanguageRule>>,
    stage_patterns: Vec<Regex>,
    window_size: usize,
}

struct ParseState<'a> {
    lines: &'a [&'a str],
    current_stage: String,
    stages: IndexMap<String, StageWindow>,
    seen: HashSet<String>,
}

impl PipelineParser {
    pub fn new(options: ParserOptions) -> Result<Self> {
        let mut source = options
            .source
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let mut patterns = IndexMap::new();
        let mut stage_patterns = Vec::new();

        if let Some(name) = options.source.as_deref() {
            let specs = patterns::language_specs(name)
                .ok_or_else(|| PipeLensError::UnknownSource(name.to_string()))?;
            patterns = resolver::resolve_specs(specs)?;
            stage_patterns = patterns::stage_patterns(name)
                .ok_or_else(|| PipeLensError::UnknownSource(name.to_string()))?;
        }

        if let Some(path) = options.config_file.as_deref() {
            let custom = resolver::load_custom_patterns(path)?;
            if let Some(custom_source) = custom.source {
                source = custom_source;
            }
            for (language, rules) in custom.patterns {
                patterns.insert(language, rules);
            }
            stage_patterns.extend(custom.stage_patterns);
        }

        debug!(
            "parser ready: source={source}, {} languages, {} stage patterns",
            patterns.len(),
            stage_patterns.len()
        );

        Ok(Self {
            source,
            patterns,
            stage_patterns,
            window_size: options.window_size,
        })
    }

    /// Shorthand for a parser over one built-in source.
    pub fn for_source(source: &str) -> Result<Self> {
        Self::new(ParserOptions {
            source: Some(source.to_string()),
            ..ParserOptions::default()
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parses `data` into a stage-grouped bundle. Lines below
    /// `min_severity` are discarded; with `deduplicate`, repeats of an
    /// already-seen line are too. Empty input yields an empty bundle.
    pub fn parse(
        &self,
        data: &str,
        min_severity: SeverityLevel,
        deduplicate: bool,
    ) -> ParsedPipelineBundle {
        let lines: Vec<&str> = data.lines().collect();
        let mut state = ParseState {
            lines: &lines,
            current_stage: DEFAULT_STAGE.to_string(),
            stages: IndexMap::new(),
            seen: HashSet::new(),
        };

        for (index, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            self.process_line(line, index + 1, min_severity, deduplicate, &mut state);
        }

        // The stage left open at end of input runs to the last line.
        if let Some(open) = state.stages.get_mut(&state.current_stage) {
            open.end_line = open.end_line.max(lines.len());
        }

        let metadata = extract::metadata(data, Some(&self.source));
        debug!(
            "parsed {} stages, {} entries from {} lines",
            state.stages.len(),
            state.stages.values().map(|stage| stage.content.len()).sum::<usize>(),
            lines.len()
        );

        ParsedPipelineBundle {
            source: self.source.clone(),
            stages: state.stages.into_values().collect(),
            metadata: Some(metadata),
        }
    }

    /// Like [`parse`](Self::parse), for raw bytes that must be UTF-8.
    pub fn parse_bytes(
        &self,
        data: &[u8],
        min_severity: SeverityLevel,
        deduplicate: bool,
    ) -> Result<ParsedPipelineBundle> {
        let text = std::str::from_utf8(data)
            .map_err(|err| PipeLensError::Validation(format!("input is not valid UTF-8: {err}")))?;
        Ok(self.parse(text, min_severity, deduplicate))
    }

    /// Reads and parses a log file, normalizing CRLF line endings.
    pub fn parse_file(
        &self,
        path: &Path,
        min_severity: SeverityLevel,
        deduplicate: bool,
    ) -> Result<ParsedPipelineBundle> {
        let raw = fs::read(path)?;
        let text = String::from_utf8(raw)
            .map_err(|err| PipeLensError::Validation(format!("input is not valid UTF-8: {err}")))?;
        Ok(self.parse(&text.replace("\r\n", "\n"), min_severity, deduplicate))
    }

    fn process_line(
        &self,
        line: &str,
        line_number: usize,
        min_severity: SeverityLevel,
        deduplicate: bool,
        state: &mut ParseState<'_>,
    ) {
        if let Some(stage_name) = self.detect_stage(line) {
            if let Some(previous) = state.stages.get_mut(&state.current_stage) {
                previous.end_line = line_number - 1;
            }
            state
                .stages
                .entry(stage_name.clone())
                .or_insert_with(|| StageWindow {
                    name: stage_name.clone(),
                    start_line: line_number,
                    end_line: line_number,
                    content: Vec::new(),
                });
            state.current_stage = stage_name;
            return;
        }

        let language = self
            .detect_language(line)
            .unwrap_or("unknown")
            .to_string();
        let severity = self.classify_severity(&language, line);
        if severity < min_severity {
            return;
        }

        if deduplicate && state.seen.contains(line) {
            return;
        }
        state.seen.insert(line.to_string());

        let entry = LogEntry {
            timestamp: extract::timestamp(line),
            language: Some(language),
            severity,
            line: line_number,
            message: line.to_string(),
            context_id: extract::context_id(state.lines, line_number, self.window_size),
        };

        let stage = state
            .stages
            .entry(state.current_stage.clone())
            .or_insert_with(|| StageWindow {
                name: state.current_stage.clone(),
                start_line: line_number,
                end_line: line_number,
                content: Vec::new(),
            });
        stage.content.push(entry);
    }

    /// First stage pattern whose cleaned capture is usable wins. A hit
    /// without a capture group, or one the cleaner rejects, leaves the
    /// remaining patterns their chance.
    fn detect_stage(&self, line: &str) -> Option<String> {
        for pattern in &self.stage_patterns {
            let Some(captures) = pattern.captures(line) else {
                continue;
            };
            let Some(capture) = captures.get(1) else {
                continue;
            };
            if let Some(cleaned) = cleaner::clean_stage_name(&self.source, capture.as_str()) {
                return Some(cleaned);
            }
        }
        None
    }

    fn detect_language(&self, line: &str) -> Option<&str> {
        for (language, rules) in &self.patterns {
            if rules.iter().any(|(pattern, _)| pattern.is_match(line)) {
                return Some(language);
            }
        }
        None
    }

    /// The detected language's rules decide first; the baseline ladder
    /// backs them up; anything else is informational.
    fn classify_severity(&self, language: &str, line: &str) -> SeverityLevel {
        if let Some(rules) = self.patterns.get(language) {
            for (pattern, level) in rules {
                if pattern.is_match(line) {
                    return *level;
                }
            }
        }
        for (pattern, level) in patterns::baseline_severity_rules() {
            if pattern.is_match(line) {
                return *level;
            }
        }
        SeverityLevel::Info
    }
}
