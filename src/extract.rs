//! Field extraction from raw log text: timestamps, nearby context ids,
//! and document-level metadata. Misses are absences, never errors.

use std::cmp::Reverse;
use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use regex::Regex;

use crate::bundle::MetadataValue;

/// Line-number window searched around an entry for a context id.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

const CONTEXT_KEYWORDS: [&str; 5] = ["fail", "error", "exception", "trace", "context"];

struct TimestampShape {
    pattern: Regex,
    formats: &'static [&'static str],
}

fn timestamp_shapes() -> &'static [TimestampShape] {
    static SHAPES: OnceLock<Vec<TimestampShape>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        vec![
            TimestampShape {
                pattern: Regex::new(
                    r"\b\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?\b",
                )
                .unwrap(),
                formats: &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"],
            },
            TimestampShape {
                pattern: Regex::new(r"\b\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}\b").unwrap(),
                formats: &["%d/%b/%Y:%H:%M:%S"],
            },
            TimestampShape {
                pattern: Regex::new(r"\b\d{2}:\d{2}:\d{2}\b").unwrap(),
                formats: &["%H:%M:%S"],
            },
            TimestampShape {
                pattern: Regex::new(r"\b\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}\b").unwrap(),
                formats: &["%Y/%m/%d %H:%M:%S"],
            },
        ]
    })
}

fn context_id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"\b([a-fA-F0-9]{8,}[-:]?[a-fA-F0-9]{4,})\b").unwrap(),
            Regex::new(r"(?i)\bcontext[-_]?id[:=\s]?([a-zA-Z0-9-]{6,})\b").unwrap(),
            Regex::new(r"(?i)\btrace[-_]?id[:=\s]?([a-zA-Z0-9-]{6,})\b").unwrap(),
            Regex::new(r"(?i)\bFAIL\b\s+(src/[a-zA-Z0-9_/.-]+)").unwrap(),
            Regex::new(r"(?i)\b(?:Exception|Error)[:=\s]+([a-zA-Z0-9_.-]+)").unwrap(),
        ]
    })
}

/// First timestamp found in `text`, trying each shape in order. A shape
/// whose regex hits but whose formats all fail to parse does not end
/// the search.
pub fn timestamp(text: &str) -> Option<NaiveDateTime> {
    for shape in timestamp_shapes() {
        let Some(found) = shape.pattern.find(text) else {
            continue;
        };
        let raw = found.as_str().replace(',', ".");
        for format in shape.formats {
            if *format == "%H:%M:%S" {
                // Time-only stamps take the current processing date.
                if let Ok(time) = NaiveTime::parse_from_str(&raw, format) {
                    return Some(Local::now().date_naive().and_time(time));
                }
            } else if let Ok(parsed) = NaiveDateTime::parse_from_str(&raw, format) {
                return Some(parsed);
            }
        }
    }
    None
}

/// Nearest identifiable context around `line_number` (1-based), searched
/// over `[line_number - window - 1, line_number + window)` clipped to the
/// input. Pattern hits rank by distance, then by longer value; when no
/// pattern hits, up to three keyword-bearing lines are joined instead.
pub fn context_id(lines: &[&str], line_number: usize, window: usize) -> Option<String> {
    let start = line_number.saturating_sub(window + 1);
    let end = (line_number.saturating_add(window)).min(lines.len());

    let mut matches: Vec<(usize, String)> = Vec::new();
    for (index, line) in lines.iter().enumerate().take(end).skip(start) {
        if let Some(value) = match_patterns(line.trim()) {
            matches.push((index, value));
        }
    }

    if !matches.is_empty() {
        matches.sort_by_key(|(index, value)| {
            (index.abs_diff(line_number), Reverse(value.len()))
        });
        let (_, best) = matches.swap_remove(0);
        return Some(best);
    }

    let context_lines = collect_context_lines(lines, start, end);
    if context_lines.is_empty() {
        None
    } else {
        Some(context_lines[..context_lines.len().min(3)].join(" | "))
    }
}

fn match_patterns(line: &str) -> Option<String> {
    static LOWER_WORD: OnceLock<Regex> = OnceLock::new();
    let lower_word = LOWER_WORD.get_or_init(|| Regex::new(r"^[a-z]{1,3}$").unwrap());

    for pattern in context_id_patterns() {
        let Some(captures) = pattern.captures(line) else {
            continue;
        };
        let value = captures[1].trim();
        if value.len() >= 6
            && !lower_word.is_match(value)
            && !value.contains(&['\'', '"', '(', ')'][..])
        {
            return Some(value.to_string());
        }
    }
    None
}

fn collect_context_lines(lines: &[&str], start: usize, end: usize) -> Vec<String> {
    static DATE_STAMP: OnceLock<Regex> = OnceLock::new();
    let date_stamp = DATE_STAMP.get_or_init(|| Regex::new(r"^\[\d{4}-\d{2}-\d{2}").unwrap());

    lines
        .iter()
        .take(end)
        .skip(start)
        .filter_map(|line| {
            let lowered = line.to_lowercase();
            let keyworded = CONTEXT_KEYWORDS.iter().any(|keyword| lowered.contains(keyword));
            if keyworded && !date_stamp.is_match(line) {
                Some(line.trim().to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Document-level metadata: build id, triggering user, branch, the
/// pipeline system when the source names one, and the first timestamp.
/// Absent fields are omitted.
pub fn metadata(data: &str, source: Option<&str>) -> IndexMap<String, MetadataValue> {
    static BUILD_ID: OnceLock<Regex> = OnceLock::new();
    static TRIGGERED_BY: OnceLock<Regex> = OnceLock::new();
    static BRANCH: OnceLock<Regex> = OnceLock::new();

    let build_id = BUILD_ID.get_or_init(|| Regex::new(r"BUILD_ID=(\S+)").unwrap());
    let triggered_by = TRIGGERED_BY.get_or_init(|| Regex::new(r"Started by user (.+)").unwrap());
    let branch = BRANCH.get_or_init(|| Regex::new(r"[Bb]ranch[:= ]+(\S+)").unwrap());

    let mut metadata = IndexMap::new();

    if let Some(captures) = build_id.captures(data) {
        metadata.insert(
            "build_id".to_string(),
            MetadataValue::Text(captures[1].to_string()),
        );
    }
    if let Some(captures) = triggered_by.captures(data) {
        metadata.insert(
            "triggered_by".to_string(),
            MetadataValue::Text(captures[1].to_string()),
        );
    }
    if let Some(captures) = branch.captures(data) {
        metadata.insert(
            "branch".to_string(),
            MetadataValue::Text(captures[1].to_string()),
        );
    }
    if let Some(source) = source {
        if source.to_lowercase().contains("pipeline") {
            metadata.insert(
                "pipeline_system".to_string(),
                MetadataValue::Text(source.to_lowercase()),
            );
        }
    }
    if let Some(start_time) = timestamp(data) {
        metadata.insert(
            "start_time".to_string(),
            MetadataValue::Timestamp(start_time),
        );
    }

    metadata
}
