//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Batch files to replay, one raw payload per file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub core: Vec<PathBuf>,
    #[serde(default)]
    pub av: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub include_events: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplayConfig {
    pub max_batches: Option<usize>,
    #[serde(default = "default_reuse_frame_buffers")]
    pub reuse_frame_buffers: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            max_batches: None,
            reuse_frame_buffers: default_reuse_frame_buffers(),
        }
    }
}

fn default_reuse_frame_buffers() -> bool {
    true
}

impl AppConfig {
    /// Check that every input file exists
    pub fn validate(&self) -> Result<()> {
        if self.input.core.is_empty() && self.input.av.is_empty() {
            bail!("No batch files to replay");
        }
        for path in self.input.core.iter().chain(&self.input.av) {
            if !path.is_file() {
                bail!("Batch file not found: {:?}", path);
            }
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            core = ["tick-0001.bin", "tick-0002.bin"]
            av = ["av-0001.bin"]

            [output]
            format = "json"
            include_events = true

            [replay]
            max_batches = 10
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.core.len(), 2);
        assert_eq!(config.input.av.len(), 1);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.include_events);
        assert_eq!(config.replay.max_batches, Some(10));
        assert!(config.replay.reuse_frame_buffers);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.input.core.is_empty());
        assert_eq!(config.output.format, OutputFormat::Txt);
        assert!(config.output.output_file.is_none());
        assert!(config.replay.reuse_frame_buffers);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[replay]\nreuse_frame_buffers = false").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(!config.replay.reuse_frame_buffers);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"html\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_missing_batch_file() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.input.core.push(PathBuf::from("/nonexistent/tick.bin"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tick.bin"));
    }
}
