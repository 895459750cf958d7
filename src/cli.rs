use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use pipelens::{ParserOptions, ParserRegistry, PipelineParser, SeverityLevel, SOURCES};

use crate::config::{Config, OutputFormat};
use crate::output;

#[derive(Parser)]
#[command(name = "pipelens")]
#[command(author, version, about = "CI/CD Log Parsing Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a pipeline log into stages, entries, and metadata
    Analyze {
        /// Path to the log file
        file: PathBuf,

        /// Pipeline system the log came from
        #[arg(short, long, env = "PIPELENS_SOURCE")]
        source: Option<String>,

        /// YAML file with extra language and stage patterns
        #[arg(short = 'P', long)]
        patterns: Option<PathBuf>,

        /// Lowest severity to keep (info, warning, error, critical)
        #[arg(short, long)]
        min_severity: Option<String>,

        /// Keep repeated lines instead of deduplicating them
        #[arg(long, default_value_t = false)]
        duplicates: bool,

        /// Lines scanned on each side of an entry for a context id
        #[arg(short, long)]
        window_size: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List registered parsers and the sources they understand
    Sources,
}

impl Cli {
    #[allow(clippy::too_many_arguments)]
    fn execute_analyze(
        &self,
        file: &Path,
        source: Option<&str>,
        patterns: Option<&Path>,
        min_severity: Option<&str>,
        duplicates: bool,
        window_size: Option<usize>,
        format: Option<OutputFormat>,
        config: Option<&Path>,
    ) -> Result<()> {
        let config = Config::load(config)?;

        let source = source.map_or(config.parser.source, ToString::to_string);
        let patterns_file = patterns
            .map(Path::to_path_buf)
            .or_else(|| config.parser.patterns_file.as_ref().map(PathBuf::from));
        let window_size = window_size.unwrap_or(config.parser.window_size);
        let min_severity = match min_severity {
            Some(raw) => raw.parse::<SeverityLevel>()?,
            None => config.filter.min_severity,
        };
        let deduplicate = !duplicates && config.filter.deduplicate;
        let format = format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        info!("Parsing {} log: {}", source, file.display());

        let parser = PipelineParser::new(ParserOptions {
            source: Some(source),
            config_file: patterns_file,
            window_size,
        })?;
        let bundle = parser.parse_file(file, min_severity, deduplicate)?;

        match format {
            OutputFormat::Summary => output::print_summary(&bundle),
            OutputFormat::Entries => output::print_entries(&bundle),
            OutputFormat::Json => {
                let json_output = if pretty {
                    bundle.to_json()?
                } else {
                    serde_json::to_string(&bundle)?
                };

                if let Some(output_path) = &self.output {
                    std::fs::write(output_path, json_output)?;
                    info!("Parsed bundle written to: {}", output_path.display());
                } else {
                    println!("{}", json_output);
                }
            }
        }

        Ok(())
    }

    fn execute_sources(&self) -> Result<()> {
        let registry = ParserRegistry::with_builtins();

        println!("Registered parsers:");
        for name in registry.list() {
            println!("  {name}");
        }

        println!("\nSupported sources:");
        for source in SOURCES {
            println!("  {source}");
        }

        Ok(())
    }

    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Analyze {
                file,
                source,
                patterns,
                min_severity,
                duplicates,
                window_size,
                format,
                config,
            } => self.execute_analyze(
                file,
                source.as_deref(),
                patterns.as_deref(),
                min_severity.as_deref(),
                *duplicates,
                *window_size,
                *format,
                config.as_deref(),
            ),
            Commands::Sources => self.execute_sources(),
        }
    }
}
