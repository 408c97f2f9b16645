//! CLI configuration management.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file,
//! environment variables (a `.env` file is honoured).

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use turing_sandbox_automaton::RunConfig;

/// Relay port used when nothing else is configured.
pub const DEFAULT_RELAY_PORT: u16 = 7878;

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding saved machines and level progress.
    pub save_dir: PathBuf,

    /// Step cap for accept/reject runs.
    pub accept_step_cap: usize,

    /// Step cap for transform runs.
    pub transform_step_cap: usize,

    /// Delay between auto-run steps, in milliseconds.
    pub step_delay_ms: u64,

    /// Port the relay listens on.
    pub relay_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let save_dir = project_dirs()
            .map(|dirs| dirs.data_dir().join("machines"))
            .unwrap_or_else(|| std::env::temp_dir().join("turing-sandbox"));
        let run = RunConfig::default();

        Self {
            save_dir,
            accept_step_cap: run.accept_step_cap,
            transform_step_cap: run.transform_step_cap,
            step_delay_ms: run.step_delay_ms,
            relay_port: DEFAULT_RELAY_PORT,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                config = serde_json::from_str(&contents).with_context(|| {
                    format!("Failed to parse config file {}", config_path.display())
                })?;
            }
        }

        if let Ok(dir) = std::env::var("TSB_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        override_from_env("TSB_ACCEPT_STEP_CAP", &mut config.accept_step_cap)?;
        override_from_env("TSB_TRANSFORM_STEP_CAP", &mut config.transform_step_cap)?;
        override_from_env("TSB_STEP_DELAY_MS", &mut config.step_delay_ms)?;
        override_from_env("TSB_RELAY_PORT", &mut config.relay_port)?;

        Ok(config)
    }

    /// Path of the config file. `TSB_CONFIG` overrides the platform default.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TSB_CONFIG") {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Interpreter settings derived from this configuration.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            step_delay_ms: self.step_delay_ms,
            accept_step_cap: self.accept_step_cap,
            transform_step_cap: self.transform_step_cap,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "turing-sandbox", "tsb")
}

fn override_from_env<T: FromStr>(key: &str, slot: &mut T) -> Result<()>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Ok(raw) = std::env::var(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_run_config() {
        let config = Config::default();
        let run = config.run_config();
        assert_eq!(run.accept_step_cap, 200);
        assert_eq!(run.transform_step_cap, 400);
        assert_eq!(config.relay_port, DEFAULT_RELAY_PORT);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"relay_port": 9000}"#).unwrap();
        assert_eq!(config.relay_port, 9000);
        assert_eq!(config.accept_step_cap, 200);
    }
}
