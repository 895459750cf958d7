use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PipeLensError, Result};

/// Ordinal severity of a log line, least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Info => "info",
            SeverityLevel::Warning => "warning",
            SeverityLevel::Error => "error",
            SeverityLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = PipeLensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "info" => Ok(SeverityLevel::Info),
            "warning" => Ok(SeverityLevel::Warning),
            "error" => Ok(SeverityLevel::Error),
            "critical" => Ok(SeverityLevel::Critical),
            other => Err(PipeLensError::ConfigStructure(format!(
                "Unknown severity level: '{other}'"
            ))),
        }
    }
}

/// A single classified log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Option<NaiveDateTime>,
    pub language: Option<String>,
    pub severity: SeverityLevel,
    pub line: usize,
    pub message: String,
    pub context_id: Option<String>,
}

/// A contiguous logical phase of the pipeline run. Line numbers are
/// 1-based and inclusive; `end_line` stays provisional until the next
/// stage boundary or end of input overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageWindow {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub content: Vec<LogEntry>,
}

/// A metadata field harvested from the raw log. Timestamps keep their
/// type so they serialize as ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Timestamp(NaiveDateTime),
    Text(String),
}

/// The complete parse result for one log document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPipelineBundle {
    pub source: String,
    pub stages: Vec<StageWindow>,
    pub metadata: Option<IndexMap<String, MetadataValue>>,
}

impl ParsedPipelineBundle {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn total_entries(&self) -> usize {
        self.stages.iter().map(|stage| stage.content.len()).sum()
    }
}
