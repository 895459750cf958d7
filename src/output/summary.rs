use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};
use pipelens::{LogEntry, ParsedPipelineBundle, SeverityLevel, StageWindow};

use super::styling::{bright, bright_green, bright_red, bright_yellow, cyan, dim, severity_label};
use super::tables::{create_cyan_header, create_table, error_count_cell, severity_cell};

/// Prints a human-readable summary of a parsed pipeline log to stdout.
///
/// Displays color-coded tables showing:
/// - Overview: Source, stage/entry counts, worst severity seen
/// - Stages: Line ranges, entry counts, and error totals per stage
/// - Top Problems: The first error and critical entries with their stages
/// - Metadata: Fields harvested from the raw log
/// - Next Steps: Flags that widen or narrow the view
///
/// Color coding:
/// - Magenta: Critical entries
/// - Red: Error entries and non-zero error counts
/// - Yellow: Warnings and neutral counts
/// - Green: Clean values (zero errors, info entries)
pub fn print_summary(bundle: &ParsedPipelineBundle) {
    println!("{}", render_summary(bundle));
}

// Helper functions

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn severity_totals(bundle: &ParsedPipelineBundle) -> (usize, usize, usize, usize) {
    let mut totals = (0, 0, 0, 0);
    for entry in bundle.stages.iter().flat_map(|stage| &stage.content) {
        match entry.severity {
            SeverityLevel::Critical => totals.0 += 1,
            SeverityLevel::Error => totals.1 += 1,
            SeverityLevel::Warning => totals.2 += 1,
            SeverityLevel::Info => totals.3 += 1,
        }
    }
    totals
}

fn worst_severity(stage: &StageWindow) -> Option<SeverityLevel> {
    stage.content.iter().map(|entry| entry.severity).max()
}

fn problem_entries(bundle: &ParsedPipelineBundle) -> Vec<(&str, &LogEntry)> {
    let mut problems: Vec<(&str, &LogEntry)> = bundle
        .stages
        .iter()
        .flat_map(|stage| {
            stage
                .content
                .iter()
                .filter(|entry| entry.severity >= SeverityLevel::Error)
                .map(move |entry| (stage.name.as_str(), entry))
        })
        .collect();
    // Stage order is first-seen order, so re-sort by line for document order
    problems.sort_by_key(|(_, entry)| entry.line);
    problems
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn metadata_text(value: &pipelens::MetadataValue) -> String {
    match value {
        pipelens::MetadataValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        pipelens::MetadataValue::Text(text) => text.clone(),
    }
}

#[allow(clippy::too_many_lines, clippy::format_push_string)]
fn render_summary(bundle: &ParsedPipelineBundle) -> String {
    let mut output = String::new();

    // Overview section
    add_section_header(&mut output, "📊", "Overview");

    let (criticals, errors, warnings, _infos) = severity_totals(bundle);
    let problem_count = criticals + errors;

    let problems_display = if problem_count == 0 {
        bright_green(problem_count)
    } else {
        bright_red(problem_count)
    };

    output.push_str(&format!(
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Source:"),
        cyan(&bundle.source),
        dim("Stages:"),
        bright_yellow(bundle.stages.len()),
        dim("Entries kept:"),
        bright_yellow(bundle.total_entries()),
        dim("Errors:"),
        problems_display,
        dim("Warnings:"),
        bright_yellow(warnings),
    ));

    if let Some(worst) = bundle.stages.iter().filter_map(worst_severity).max() {
        output.push_str(&format!(
            "  {} {}\n",
            dim("Worst severity:"),
            severity_label(worst)
        ));
    }
    output.push('\n');

    if bundle.stages.is_empty() {
        output.push_str(&format!(
            "{}\n",
            bright_yellow("No stages or entries recognized.")
        ));
        return output;
    }

    // Stages
    add_section_header(&mut output, "📋", "Stages");

    let mut stages_table = create_table();
    stages_table.set_header(create_cyan_header(&[
        "Stage", "Lines", "Entries", "Worst", "Errors",
    ]));

    for stage in bundle.stages.iter().take(10) {
        let worst_cell = worst_severity(stage).map_or_else(|| Cell::new("N/A"), severity_cell);
        let stage_errors = stage
            .content
            .iter()
            .filter(|entry| entry.severity >= SeverityLevel::Error)
            .count();

        stages_table.add_row(vec![
            Cell::new(&stage.name),
            Cell::new(format!("{}-{}", stage.start_line, stage.end_line)),
            Cell::new(stage.content.len()),
            worst_cell,
            error_count_cell(stage_errors),
        ]);
    }

    if bundle.stages.len() > 10 {
        let empty_cells = vec![Cell::new(""); 4];
        let mut row = vec![
            Cell::new(format!("... and {} more", bundle.stages.len() - 10)).fg(TableColor::DarkGrey),
        ];
        row.extend(empty_cells);
        stages_table.add_row(row);
    }

    output.push_str(&format!("{stages_table}\n\n"));

    // Top Problems
    add_section_header(&mut output, "❌", "Top Problems");

    let problems = problem_entries(bundle);
    if problems.is_empty() {
        output.push_str(&format!(
            "  {}\n\n",
            bright_green("No entries at error severity or above.")
        ));
    } else {
        let mut problems_table = create_table();
        problems_table.set_header(create_cyan_header(&[
            "#", "Line", "Stage", "Severity", "Message",
        ]));

        for (idx, (stage_name, entry)) in problems.iter().take(10).enumerate() {
            problems_table.add_row(vec![
                Cell::new(idx + 1),
                Cell::new(entry.line),
                Cell::new(*stage_name),
                severity_cell(entry.severity),
                Cell::new(truncate(&entry.message, 120)),
            ]);
        }

        if problems.len() > 10 {
            let empty_cells = vec![Cell::new(""); 4];
            let mut row = vec![
                Cell::new(format!("... and {} more", problems.len() - 10)).fg(TableColor::DarkGrey),
            ];
            row.extend(empty_cells);
            problems_table.add_row(row);
        }

        output.push_str(&format!("{problems_table}\n\n"));
    }

    // Metadata
    if let Some(metadata) = &bundle.metadata {
        if !metadata.is_empty() {
            add_section_header(&mut output, "🧾", "Metadata");

            let mut metadata_table = create_table();
            metadata_table.set_header(create_cyan_header(&["Field", "Value"]));
            for (key, value) in metadata {
                metadata_table.add_row(vec![Cell::new(key), Cell::new(metadata_text(value))]);
            }

            output.push_str(&format!("{metadata_table}\n\n"));
        }
    }

    // Next Steps
    add_section_header(&mut output, "💡", "Next Steps");
    output.push_str(&format!(
        "  {} Use {} to export the full parsed bundle\n\
         \x20 {} Lower {} to see the informational narrative\n\
         \x20 {} Register team patterns with {} to classify more lines\n",
        cyan("•"),
        bright_yellow("--format json"),
        cyan("•"),
        bright_yellow("--min-severity info"),
        cyan("•"),
        bright_yellow("--patterns <file>")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pipelens::MetadataValue;

    fn create_test_entry(line: usize, severity: SeverityLevel, message: &str) -> LogEntry {
        LogEntry {
            timestamp: None,
            language: Some("python".to_string()),
            severity,
            line,
            message: message.to_string(),
            context_id: None,
        }
    }

    fn create_test_stage(
        name: &str,
        start_line: usize,
        end_line: usize,
        content: Vec<LogEntry>,
    ) -> StageWindow {
        StageWindow {
            name: name.to_string(),
            start_line,
            end_line,
            content,
        }
    }

    #[test]
    fn test_render_summary_empty_bundle() {
        let bundle = ParsedPipelineBundle {
            source: "jenkins".to_string(),
            stages: vec![],
            metadata: None,
        };

        let output = render_summary(&bundle);

        assert!(output.contains("jenkins"));
        assert!(output.contains("Entries kept:"));
        assert!(output.contains("No stages or entries recognized."));
    }

    #[test]
    fn test_render_summary_with_stages() {
        let stages = vec![
            create_test_stage(
                "Build",
                1,
                4,
                vec![
                    create_test_entry(2, SeverityLevel::Warning, "deprecated flag"),
                    create_test_entry(3, SeverityLevel::Error, "compilation failed"),
                ],
            ),
            create_test_stage(
                "Deploy",
                5,
                9,
                vec![create_test_entry(7, SeverityLevel::Critical, "rollback issued")],
            ),
        ];

        let bundle = ParsedPipelineBundle {
            source: "gitlab_ci".to_string(),
            stages,
            metadata: None,
        };

        let output = render_summary(&bundle);

        assert!(output.contains("gitlab_ci"));
        assert!(output.contains("Build"));
        assert!(output.contains("Deploy"));
        assert!(output.contains("Top Problems"));
        assert!(output.contains("compilation failed"));
        assert!(output.contains("rollback issued"));
        assert!(output.contains("Next Steps"));
        assert!(output.contains("--format json"));
    }

    #[test]
    fn test_render_summary_without_problems() {
        let stages = vec![create_test_stage(
            "Test",
            1,
            3,
            vec![create_test_entry(2, SeverityLevel::Warning, "flaky assertion")],
        )];

        let bundle = ParsedPipelineBundle {
            source: "jenkins".to_string(),
            stages,
            metadata: None,
        };

        let output = render_summary(&bundle);

        assert!(output.contains("No entries at error severity or above."));
        assert!(output.contains("flaky assertion") || output.contains("Test"));
    }

    #[test]
    fn test_render_summary_truncates_stage_table() {
        let stages: Vec<StageWindow> = (0..12)
            .map(|i| {
                create_test_stage(
                    &format!("stage-{i:02}"),
                    i * 10 + 1,
                    i * 10 + 10,
                    vec![create_test_entry(i * 10 + 2, SeverityLevel::Info, "ok")],
                )
            })
            .collect();

        let bundle = ParsedPipelineBundle {
            source: "jenkins".to_string(),
            stages,
            metadata: None,
        };

        let output = render_summary(&bundle);

        assert!(output.contains("stage-00"));
        assert!(output.contains("stage-09"));
        assert!(output.contains("... and 2 more"));
        assert!(!output.contains("stage-11"));
    }

    #[test]
    fn test_render_summary_orders_problems_by_line() {
        // Stage order is first-seen order, which can disagree with line order
        let stages = vec![
            create_test_stage(
                "Deploy",
                8,
                12,
                vec![create_test_entry(9, SeverityLevel::Error, "second failure")],
            ),
            create_test_stage(
                "Build",
                1,
                7,
                vec![create_test_entry(3, SeverityLevel::Error, "first failure")],
            ),
        ];

        let bundle = ParsedPipelineBundle {
            source: "jenkins".to_string(),
            stages,
            metadata: None,
        };

        let output = render_summary(&bundle);

        let first = output.find("first failure").unwrap();
        let second = output.find("second failure").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_summary_truncates_long_messages() {
        let long_message = "x".repeat(150);
        let stages = vec![create_test_stage(
            "Build",
            1,
            3,
            vec![create_test_entry(2, SeverityLevel::Error, &long_message)],
        )];

        let bundle = ParsedPipelineBundle {
            source: "jenkins".to_string(),
            stages,
            metadata: None,
        };

        let output = render_summary(&bundle);

        assert!(output.contains("..."));
        assert!(!output.contains(&"x".repeat(130)));
    }

    #[test]
    fn test_render_summary_includes_metadata() {
        let ts: chrono::NaiveDateTime = "2024-03-15T10:00:00".parse().unwrap();
        let mut metadata = IndexMap::new();
        metadata.insert(
            "build_id".to_string(),
            MetadataValue::Text("build-7".to_string()),
        );
        metadata.insert("start_time".to_string(), MetadataValue::Timestamp(ts));

        let bundle = ParsedPipelineBundle {
            source: "jenkins".to_string(),
            stages: vec![create_test_stage(
                "Build",
                1,
                2,
                vec![create_test_entry(1, SeverityLevel::Info, "started")],
            )],
            metadata: Some(metadata),
        };

        let output = render_summary(&bundle);

        assert!(output.contains("Metadata"));
        assert!(output.contains("build-7"));
        assert!(output.contains("2024-03-15 10:00:00"));
    }
}
