//! Run Configuration
//!
//! Input directories, output path, and model settings as operator-tunable
//! TOML values. Every field carries a default matching the original fixed
//! constants, so behavior is unchanged when no config file is present.
//!
//! ## Loading Order
//!
//! 1. `VISIR_CONFIG` environment variable (path to TOML file)
//! 2. `visir_report.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded value is passed explicitly into the orchestrator and the
//! provider factory; there is no global configuration lookup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

/// Root configuration for one report-generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Image input directories
    #[serde(default)]
    pub inputs: InputConfig,

    /// HTML output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Vision-language model settings
    #[serde(default)]
    pub model: ModelConfig,
}

/// Image input directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory of RGB (visual) images
    #[serde(default = "default_rgb_dir")]
    pub rgb_dir: PathBuf,

    /// Directory of thermal images
    #[serde(default = "default_thermal_dir")]
    pub thermal_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rgb_dir: default_rgb_dir(),
            thermal_dir: default_thermal_dir(),
        }
    }
}

/// HTML output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output HTML file path (overwritten if present)
    #[serde(default = "default_html_path")]
    pub html_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_path: default_html_path(),
        }
    }
}

/// Vision-language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Hub model identifier
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Fixed generation budget per report
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            max_new_tokens: default_max_new_tokens(),
        }
    }
}

fn default_rgb_dir() -> PathBuf {
    PathBuf::from("ki-visir_dataset_v1/combined_images")
}

fn default_thermal_dir() -> PathBuf {
    PathBuf::from("ki-visir_dataset_v1/combined_thermal_images")
}

fn default_html_path() -> PathBuf {
    PathBuf::from("blade_inspection_reports.html")
}

fn default_model_id() -> String {
    "Qwen/Qwen2.5-VL-7B-Instruct".to_string()
}

fn default_max_new_tokens() -> usize {
    1024
}

impl ReportConfig {
    /// Load configuration using the standard search order:
    /// 1. `VISIR_CONFIG` environment variable
    /// 2. `./visir_report.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        Self::load_from(
            std::env::var("VISIR_CONFIG").ok(),
            Path::new("visir_report.toml"),
        )
    }

    /// Search-order loading with the env lookup and local path injected,
    /// so precedence is testable without mutating process-global state.
    fn load_from(env_path: Option<String>, local: &Path) -> Self {
        // 1. Check env var
        if let Some(path) = env_path {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded run config from VISIR_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from VISIR_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "VISIR_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./visir_report.toml
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded run config from local file");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load local config file, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No config file found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_original_constants() {
        let config = ReportConfig::default();
        assert_eq!(
            config.output.html_path,
            PathBuf::from("blade_inspection_reports.html")
        );
        assert_eq!(config.model.model_id, "Qwen/Qwen2.5-VL-7B-Instruct");
        assert_eq!(config.model.max_new_tokens, 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[inputs]\nrgb_dir = \"/data/rgb\"\n\n[model]\nmax_new_tokens = 256"
        )
        .unwrap();

        let config = ReportConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.inputs.rgb_dir, PathBuf::from("/data/rgb"));
        // untouched keys fall back to defaults
        assert_eq!(
            config.inputs.thermal_dir,
            PathBuf::from("ki-visir_dataset_v1/combined_thermal_images")
        );
        assert_eq!(config.model.max_new_tokens, 256);
        assert_eq!(config.model.model_id, "Qwen/Qwen2.5-VL-7B-Instruct");
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_env_config_wins_over_local_file() {
        let env_file = write_config("[output]\nhtml_path = \"from_env.html\"");
        let local_file = write_config("[output]\nhtml_path = \"from_local.html\"");

        let config = ReportConfig::load_from(
            Some(env_file.path().to_string_lossy().into_owned()),
            local_file.path(),
        );

        assert_eq!(config.output.html_path, PathBuf::from("from_env.html"));
    }

    #[test]
    fn test_missing_env_path_falls_back_to_local_file() {
        let local_file = write_config("[output]\nhtml_path = \"from_local.html\"");

        let config = ReportConfig::load_from(
            Some("/nonexistent/visir.toml".to_string()),
            local_file.path(),
        );

        assert_eq!(config.output.html_path, PathBuf::from("from_local.html"));
    }

    #[test]
    fn test_no_sources_falls_back_to_defaults() {
        let config = ReportConfig::load_from(None, Path::new("/nonexistent/visir_report.toml"));

        assert_eq!(
            config.output.html_path,
            PathBuf::from("blade_inspection_reports.html")
        );
        assert_eq!(config.model.model_id, "Qwen/Qwen2.5-VL-7B-Instruct");
    }

    #[test]
    fn test_malformed_env_config_falls_back_to_local_file() {
        let env_file = write_config("output = \"not a table\"");
        let local_file = write_config("[output]\nhtml_path = \"from_local.html\"");

        let config = ReportConfig::load_from(
            Some(env_file.path().to_string_lossy().into_owned()),
            local_file.path(),
        );

        assert_eq!(config.output.html_path, PathBuf::from("from_local.html"));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inputs = \"not a table\"").unwrap();

        let err = ReportConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_, _)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = ReportConfig::load_from_file(Path::new("/nonexistent/visir.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }
}
