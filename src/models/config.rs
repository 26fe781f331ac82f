use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::analyzer::DEFAULT_WINDOW_DAYS;
use crate::core::sweep::DEFAULT_GRACE_MINUTES;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub adherence: AdherenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Profile name used when `--profile` is not given.
    pub default: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdherenceConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,
    #[serde(default = "default_sweep_lookback_days")]
    pub sweep_lookback_days: u32,
    #[serde(default = "default_reminder_lead_minutes")]
    pub reminder_lead_minutes: i64,
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}
fn default_grace_minutes() -> i64 {
    DEFAULT_GRACE_MINUTES
}
fn default_sweep_lookback_days() -> u32 {
    7
}
fn default_reminder_lead_minutes() -> i64 {
    15
}

impl Default for AdherenceConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            grace_minutes: default_grace_minutes(),
            sweep_lookback_days: default_sweep_lookback_days(),
            reminder_lead_minutes: default_reminder_lead_minutes(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from the standard path, or return defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the standard path.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let contents = toml::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            let mut file = options.open(&path)?;
            file.write_all(contents.as_bytes())?;

            // mode() only applies on create; tighten a pre-existing file too
            let mut perms = file.metadata()?.permissions();
            if perms.mode() & 0o777 != 0o600 {
                perms.set_mode(0o600);
                fs::set_permissions(&path, perms)?;
            }
        }
        #[cfg(not(unix))]
        {
            std::fs::write(&path, contents)?;
        }

        Ok(())
    }

    /// Resolve a medication alias to its name, or return the input unchanged.
    pub fn resolve_alias(&self, input: &str) -> String {
        self.aliases
            .get(input)
            .cloned()
            .unwrap_or_else(|| input.to_string())
    }

    /// Set a single key. Keys: `profile`, `window_days`, `grace_minutes`,
    /// `sweep_lookback_days`, `reminder_lead_minutes`, `log_level`,
    /// `alias.<name>`.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "profile" => self.profile.default = Some(value.to_string()),
            "window_days" => {
                let days: u32 = value.parse()?;
                if days == 0 {
                    anyhow::bail!("window_days must be at least 1");
                }
                self.adherence.window_days = days;
            }
            "grace_minutes" => {
                let minutes: i64 = value.parse()?;
                if minutes < 0 {
                    anyhow::bail!("grace_minutes cannot be negative");
                }
                self.adherence.grace_minutes = minutes;
            }
            "sweep_lookback_days" => self.adherence.sweep_lookback_days = value.parse()?,
            "reminder_lead_minutes" => {
                let minutes: i64 = value.parse()?;
                if minutes < 0 {
                    anyhow::bail!("reminder_lead_minutes cannot be negative");
                }
                self.adherence.reminder_lead_minutes = minutes;
            }
            "log_level" => self.logging.level = value.to_string(),
            k if k.starts_with("alias.") => {
                let alias = &k["alias.".len()..];
                if alias.is_empty() {
                    anyhow::bail!("alias name cannot be empty");
                }
                self.aliases.insert(alias.to_string(), value.to_string());
            }
            _ => anyhow::bail!("unknown config key: {}", key),
        }
        Ok(())
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("MEDTRACK_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".medtrack")
    }

    pub fn path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn db_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }
}
