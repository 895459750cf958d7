//! Pattern-driven parsing for CI/CD pipeline logs.
//!
//! Segments a raw log into pipeline stages, classifies each line by
//! originating language and severity, and harvests run metadata into a
//! single serializable bundle. Built-in pattern sets cover Jenkins,
//! GitHub Actions, GitLab CI, and Azure DevOps; a YAML document can
//! extend or override any of them.

pub mod bundle;
pub mod cleaner;
pub mod error;
pub mod extract;
pub mod parser;
pub mod patterns;
pub mod registry;
pub mod resolver;

// Re-export commonly used types
pub use crate::bundle::{
    LogEntry, MetadataValue, ParsedPipelineBundle, SeverityLevel, StageWindow,
};
pub use crate::error::{PipeLensError, Result};
pub use crate::extract::DEFAULT_WINDOW_SIZE;
pub use crate::parser::{ParserOptions, PipelineParser, DEFAULT_STAGE};
pub use crate::patterns::SOURCES;
pub use crate::registry::{LogParser, ParserFactory, ParserRegistry};
pub use crate::resolver::CustomPatterns;
