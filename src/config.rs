//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/schoolnet/schoolnet.toml`
//! 3. Explicit config file (`--config <path>`)
//! 4. Environment variables: `SCHOOLNET_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub school: Option<String>,
    pub school_name: Option<String>,
    pub reconcile_layout: Option<bool>,
}

/// Unified configuration for schoolnet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding per-school rosters and layouts (default: ~/.schoolnet)
    pub data_dir: PathBuf,
    /// School id used when `--school` is not given
    pub school: String,
    /// Title printed above the chart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    /// Align saved layouts with roster changes on load
    pub reconcile_layout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: dirs_default_data_dir(),
            school: "default".into(),
            school_name: None,
            reconcile_layout: true,
        }
    }
}

/// Get the default data directory (~/.schoolnet).
fn dirs_default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".schoolnet"))
        .unwrap_or_else(|| PathBuf::from("~/.schoolnet"))
}

/// Get the XDG config directory for schoolnet.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "schoolnet").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("schoolnet.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    parse_raw_settings(&content).map_err(|message| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), message),
    })
}

fn parse_raw_settings(content: &str) -> Result<RawSettings, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

impl Settings {
    /// Display title for the chart.
    pub fn chart_title(&self, school_id: &str) -> String {
        format!(
            "{} 비상연락망",
            self.school_name.as_deref().unwrap_or(school_id)
        )
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Override the data directory (e.g. from `--data-dir`), expanding `~` and variables.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = dir.to_path_buf();
        self.expand_paths();
        self
    }

    /// Overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            school: overlay.school.clone().unwrap_or_else(|| self.school.clone()),
            school_name: overlay
                .school_name
                .clone()
                .or_else(|| self.school_name.clone()),
            reconcile_layout: overlay.reconcile_layout.unwrap_or(self.reconcile_layout),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, applied over the global one
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply SCHOOLNET_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(Environment::with_prefix("SCHOOLNET"));
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("school") {
            settings.school = val;
        }
        if let Ok(val) = config.get_string("school_name") {
            settings.school_name = Some(val);
        }
        if let Ok(val) = config.get_bool("reconcile_layout") {
            settings.reconcile_layout = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# schoolnet configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/schoolnet/schoolnet.toml
#   Explicit: --config <path>
#   Env:    SCHOOLNET_* environment variables (e.g. SCHOOLNET_SCHOOL=north-high)

# Where rosters and layouts are stored (schools/<id>/staff.json, layout.json)
# data_dir = "~/.schoolnet"

# School id used when --school is not given
# school = "default"

# Title printed above the chart
# school_name = "Hanbit Middle School"

# Align a saved layout with roster changes when loading it.
# When false, a saved layout is shown exactly as it was saved.
# reconcile_layout = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_reconcile_enabled() {
        let settings = Settings::default();
        assert!(settings.data_dir.to_string_lossy().contains(".schoolnet"));
        assert_eq!(settings.school, "default");
        assert!(settings.reconcile_layout);
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.schoolnet"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.data_dir.to_string_lossy();
        assert!(dir.starts_with(&home), "data_dir should start with home: {dir}");
        assert!(!dir.contains('~'));
    }

    #[test]
    fn given_tilde_data_dir_override_when_applied_then_expanded() {
        let settings = Settings::default().with_data_dir(Path::new("~/elsewhere"));

        let home = std::env::var("HOME").expect("HOME should be set");
        assert_eq!(settings.data_dir, PathBuf::from(home).join("elsewhere"));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let base = Settings {
            data_dir: PathBuf::from("/srv/schoolnet"),
            school: "north".into(),
            school_name: Some("North High".into()),
            reconcile_layout: true,
        };
        let raw = parse_raw_settings("school = \"south\"\nreconcile_layout = false\n").unwrap();

        let merged = base.merge_with(&raw);

        assert_eq!(merged.data_dir, PathBuf::from("/srv/schoolnet"));
        assert_eq!(merged.school, "south");
        assert_eq!(merged.school_name.as_deref(), Some("North High"));
        assert!(!merged.reconcile_layout);
    }

    #[test]
    fn given_invalid_toml_when_parsing_then_errors() {
        assert!(parse_raw_settings("reconcile_layout = \"maybe\"").is_err());
    }

    #[test]
    fn given_settings_when_rendering_title_then_prefers_school_name() {
        let mut settings = Settings::default();
        assert_eq!(settings.chart_title("north"), "north 비상연락망");
        settings.school_name = Some("North High".into());
        assert_eq!(settings.chart_title("north"), "North High 비상연락망");
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw = parse_raw_settings(&Settings::template()).unwrap();
        assert!(raw.data_dir.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
