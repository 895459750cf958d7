//! Name-keyed construction of parsers. Registration is explicit; a
//! name registered twice keeps the newest factory.

use indexmap::IndexMap;

use crate::bundle::{ParsedPipelineBundle, SeverityLevel};
use crate::error::Result;
use crate::parser::{ParserOptions, PipelineParser};

/// Object-safe parse surface shared by registered parsers.
pub trait LogParser {
    fn parse(
        &self,
        data: &str,
        min_severity: SeverityLevel,
        deduplicate: bool,
    ) -> ParsedPipelineBundle;
}

impl LogParser for PipelineParser {
    fn parse(
        &self,
        data: &str,
        min_severity: SeverityLevel,
        deduplicate: bool,
    ) -> ParsedPipelineBundle {
        PipelineParser::parse(self, data, min_severity, deduplicate)
    }
}

/// Builds a parser from construction options.
pub type ParserFactory = fn(&ParserOptions) -> Result<Box<dyn LogParser>>;

#[derive(Default)]
pub struct ParserRegistry {
    factories: IndexMap<String, ParserFactory>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the stock pipeline parser under `"pipeline"`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("pipeline", pipeline_factory);
        registry
    }

    /// Registers `factory` under `name`. Re-registering a name replaces
    /// its factory and keeps its original position in [`Self::list`].
    pub fn register(&mut self, name: &str, factory: ParserFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn get(&self, name: &str) -> Option<ParserFactory> {
        self.factories.get(name).copied()
    }

    /// Registered names, in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

fn pipeline_factory(options: &ParserOptions) -> Result<Box<dyn LogParser>> {
    Ok(Box::new(PipelineParser::new(options.clone())?))
}
