use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use pipelens::{SeverityLevel, DEFAULT_WINDOW_SIZE};

/// Configuration file structure for PipeLens.
///
/// Allows users to save common parsing settings and reuse them across runs.
/// Configuration files are loaded from the current directory or specified path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Parser selection and pattern overrides
    #[serde(default)]
    pub parser: ParserConfig,

    /// Entry filtering preferences
    #[serde(default)]
    pub filter: FilterConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserConfig {
    /// Pipeline system the logs come from
    #[serde(default = "default_source")]
    pub source: String,

    /// Path to a YAML file with extra language and stage patterns
    pub patterns_file: Option<String>,

    /// Lines scanned on each side of an entry when hunting for a context id
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Lowest severity that makes it into the output
    #[serde(default = "default_min_severity")]
    pub min_severity: SeverityLevel,

    /// Drop repeated log lines, keeping the first occurrence
    #[serde(default = "default_deduplicate")]
    pub deduplicate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Overview plus per-stage tables
    #[default]
    Summary,
    /// Every surviving entry as a table
    Entries,
    /// The parsed bundle as JSON
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            patterns_file: None,
            window_size: default_window_size(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_severity: default_min_severity(),
            deduplicate: default_deduplicate(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty: false,
        }
    }
}

fn default_source() -> String {
    "jenkins".to_string()
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_min_severity() -> SeverityLevel {
    SeverityLevel::Warning
}

fn default_deduplicate() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./pipelens.toml
    /// 3. ./pipelens.json
    /// 4. ./pipelens.yaml
    /// 5. ./pipelens.yml
    ///
    /// Returns default configuration if none of the candidates exist.
    /// An explicitly specified path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        // Try common configuration file names
        let candidates = [
            "pipelens.toml",
            "pipelens.json",
            "pipelens.yaml",
            "pipelens.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parser.source, "jenkins");
        assert_eq!(config.parser.window_size, 20);
        assert!(config.parser.patterns_file.is_none());
        assert_eq!(config.filter.min_severity, SeverityLevel::Warning);
        assert!(config.filter.deduplicate);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[parser]
source = "github_actions"
patterns-file = "patterns/extra.yaml"
window-size = 5

[filter]
min-severity = "error"
deduplicate = false

[output]
format = "json"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.parser.source, "github_actions");
        assert_eq!(
            config.parser.patterns_file,
            Some("patterns/extra.yaml".to_string())
        );
        assert_eq!(config.parser.window_size, 5);
        assert_eq!(config.filter.min_severity, SeverityLevel::Error);
        assert!(!config.filter.deduplicate);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "parser": {
    "source": "gitlab_ci"
  },
  "output": {
    "format": "entries"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.parser.source, "gitlab_ci");
        assert_eq!(config.output.format, OutputFormat::Entries);
        // Untouched sections fall back to defaults
        assert_eq!(config.filter.min_severity, SeverityLevel::Warning);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        let yaml_content = "parser:\n  source: azure_devops\nfilter:\n  min-severity: critical\n";
        write!(temp_file, "{}", yaml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.parser.source, "azure_devops");
        assert_eq!(config.filter.min_severity, SeverityLevel::Critical);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = Config::load(Some(Path::new("does-not-exist.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("pipelens.toml");

        let config = Config {
            parser: ParserConfig {
                source: "gitlab_ci".to_string(),
                patterns_file: Some("team.yaml".to_string()),
                window_size: 10,
            },
            filter: FilterConfig {
                min_severity: SeverityLevel::Info,
                deduplicate: false,
            },
            output: OutputConfig {
                format: OutputFormat::Json,
                pretty: true,
            },
        };

        config.save(&config_path).unwrap();

        let reloaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(reloaded.parser.source, "gitlab_ci");
        assert_eq!(reloaded.parser.patterns_file, Some("team.yaml".to_string()));
        assert_eq!(reloaded.parser.window_size, 10);
        assert_eq!(reloaded.filter.min_severity, SeverityLevel::Info);
        assert!(!reloaded.filter.deduplicate);
        assert_eq!(reloaded.output.format, OutputFormat::Json);
        assert!(reloaded.output.pretty);
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(temp_file, "[filter]\nmin-severity = \"fatal\"\n").unwrap();

        let result = Config::load_from_path(temp_file.path());
        assert!(result.is_err());
    }
}
