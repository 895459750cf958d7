use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use pipelens::SeverityLevel;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn severity_cell(severity: SeverityLevel) -> Cell {
    let cell = Cell::new(severity.as_str());
    match severity {
        SeverityLevel::Critical => cell.fg(TableColor::Magenta),
        SeverityLevel::Error => cell.fg(TableColor::Red),
        SeverityLevel::Warning => cell.fg(TableColor::Yellow),
        SeverityLevel::Info => cell.fg(TableColor::Green),
    }
}

pub fn error_count_cell(count: usize) -> Cell {
    let text = count.to_string();
    if count == 0 {
        Cell::new(text).fg(TableColor::Green)
    } else {
        Cell::new(text).fg(TableColor::Red)
    }
}
