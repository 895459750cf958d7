use comfy_table::Cell;
use pipelens::{LogEntry, ParsedPipelineBundle};

use super::styling::bright_yellow;
use super::tables::{create_cyan_header, create_table, severity_cell};

/// Prints every surviving entry as a single table, in document order.
pub fn print_entries(bundle: &ParsedPipelineBundle) {
    println!("{}", render_entries(bundle));
}

fn render_entries(bundle: &ParsedPipelineBundle) -> String {
    let mut rows: Vec<(&str, &LogEntry)> = bundle
        .stages
        .iter()
        .flat_map(|stage| {
            stage
                .content
                .iter()
                .map(move |entry| (stage.name.as_str(), entry))
        })
        .collect();
    rows.sort_by_key(|(_, entry)| entry.line);

    if rows.is_empty() {
        return format!(
            "{}\n",
            bright_yellow("No log entries matched the current filters.")
        );
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&[
        "Line",
        "Stage",
        "Severity",
        "Language",
        "Timestamp",
        "Message",
    ]));

    for (stage_name, entry) in rows {
        let timestamp = entry
            .timestamp
            .map_or_else(|| "-".to_string(), |ts| ts.format("%H:%M:%S").to_string());

        table.add_row(vec![
            Cell::new(entry.line),
            Cell::new(stage_name),
            severity_cell(entry.severity),
            Cell::new(entry.language.as_deref().unwrap_or("-")),
            Cell::new(timestamp),
            Cell::new(&entry.message),
        ]);
    }

    format!("{table}\n")
}
