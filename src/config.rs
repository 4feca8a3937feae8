use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::roles::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Delays for the simulated backend actions, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Donor food scan / freshness check (default: 2500)
    #[serde(default = "default_scan_delay")]
    pub scan_delay_ms: u64,
    /// Donor listing publication (default: 800)
    #[serde(default = "default_publish_delay")]
    pub publish_delay_ms: u64,
    /// Donor waits for an NGO to claim (default: 600)
    #[serde(default = "default_claim_delay")]
    pub claim_delay_ms: u64,
    /// Donor hands food to the volunteer (default: 600)
    #[serde(default = "default_pickup_delay")]
    pub pickup_delay_ms: u64,
    /// Volunteer accepts a pickup task (default: 600)
    #[serde(default = "default_accept_delay")]
    pub accept_delay_ms: u64,
    /// Sign-in round trip (default: 1200)
    #[serde(default = "default_sign_in_delay")]
    pub sign_in_delay_ms: u64,
    /// Upper bound on any backend call before it counts as failed (default: 10000)
    #[serde(default = "default_action_timeout")]
    pub action_timeout_ms: u64,
}

fn default_scan_delay() -> u64 {
    2500
}

fn default_publish_delay() -> u64 {
    800
}

fn default_claim_delay() -> u64 {
    600
}

fn default_pickup_delay() -> u64 {
    600
}

fn default_accept_delay() -> u64 {
    600
}

fn default_sign_in_delay() -> u64 {
    1200
}

fn default_action_timeout() -> u64 {
    10_000 // 10 seconds
}

impl SimulationConfig {
    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    pub fn publish_delay(&self) -> Duration {
        Duration::from_millis(self.publish_delay_ms)
    }

    pub fn claim_delay(&self) -> Duration {
        Duration::from_millis(self.claim_delay_ms)
    }

    pub fn pickup_delay(&self) -> Duration {
        Duration::from_millis(self.pickup_delay_ms)
    }

    pub fn accept_delay(&self) -> Duration {
        Duration::from_millis(self.accept_delay_ms)
    }

    pub fn sign_in_delay(&self) -> Duration {
        Duration::from_millis(self.sign_in_delay_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    /// Slowest of the simulated actions
    pub fn longest_delay_ms(&self) -> u64 {
        [
            self.scan_delay_ms,
            self.publish_delay_ms,
            self.claim_delay_ms,
            self.pickup_delay_ms,
            self.accept_delay_ms,
            self.sign_in_delay_ms,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
    }

    /// The timeout must outlast every simulated delay, otherwise that action
    /// can never succeed.
    pub fn validate(&self) -> Result<()> {
        let longest = self.longest_delay_ms();
        if self.action_timeout_ms <= longest {
            anyhow::bail!(
                "simulation.action_timeout_ms ({}) must be greater than the longest action delay ({} ms)",
                self.action_timeout_ms,
                longest
            );
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: default_scan_delay(),
            publish_delay_ms: default_publish_delay(),
            claim_delay_ms: default_claim_delay(),
            pickup_delay_ms: default_pickup_delay(),
            accept_delay_ms: default_accept_delay(),
            sign_in_delay_ms: default_sign_in_delay(),
            action_timeout_ms: default_action_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval for the terminal loop
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_ms: u64,
    /// Open this role's dashboard directly instead of the sign-in screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_role: Option<Role>,
}

fn default_refresh_rate() -> u64 {
    100
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate(),
            start_role: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and other local state
    #[serde(default = "default_state_path")]
    pub state: String,
    /// Optional TOML or JSON file replacing the built-in demo data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

fn default_state_path() -> String {
    ".zerowaste".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
            catalog: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Project-local config file, relative to the working directory
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".zerowaste/config.toml")
    }

    /// Per-user config file under the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zerowaste").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the dashboards run without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. ZEROWASTE__SIMULATION__SCAN_DELAY_MS=100
        builder = builder.add_source(
            config::Environment::with_prefix("ZEROWASTE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config
            .simulation
            .validate()
            .context("Invalid simulation settings")?;
        Ok(config)
    }

    /// Serialize as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Save config to the user config path
    pub fn save(&self) -> Result<PathBuf> {
        let config_path =
            Self::user_config_path().context("No config directory on this platform")?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(config_path, self.to_toml()?).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Catalog override, if one is configured
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.paths.catalog.as_ref().map(PathBuf::from)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            ui: UiConfig::default(),
            paths: PathsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
