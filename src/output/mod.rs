mod entries;
mod styling;
mod summary;
mod tables;

pub use entries::print_entries;
pub use styling::{dim, magenta_bold};
pub use summary::print_summary;

/// Prints the `PipeLens` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔍 PipeLens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CI/CD Log Parsing Tool")
    );
}
