use chrono::Duration;
use config::{
    Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use crate::config::constants::{defaults, env};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("jwt.secret must be set and non-empty")]
    MissingJwtSecret,
    #[error("Invalid configuration value for {0}")]
    Invalid(&'static str),
}

/// Root of the configuration tree.
///
/// Sources, lowest precedence first: built-in defaults, an optional
/// `config/latchkey.json`, then `LATCHKEY__*` environment variables
/// (e.g. `LATCHKEY__JWT__SECRET`).
#[derive(Debug, Clone, Deserialize)]
pub struct LatchkeySettings {
    #[serde(default)]
    pub jwt: JwtSettings,
    #[serde(default)]
    pub hasher: HasherSettings,
    #[serde(default)]
    pub reset: ResetSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    #[serde(default = "empty_secret")]
    pub secret: Secret<String>,
    #[serde(default = "default_time_to_live")]
    pub time_to_live_in_seconds: i64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: empty_secret(),
            time_to_live_in_seconds: default_time_to_live(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HasherSettings {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_memory")]
    pub memory_in_kib: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HasherSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            memory_in_kib: default_memory(),
            parallelism: default_parallelism(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl DurationUnit {
    pub fn times(self, amount: i64) -> Option<Duration> {
        match self {
            DurationUnit::Minutes => Duration::try_minutes(amount),
            DurationUnit::Hours => Duration::try_hours(amount),
            DurationUnit::Days => Duration::try_days(amount),
            DurationUnit::Weeks => Duration::try_weeks(amount),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResetDuration {
    pub amount: i64,
    pub unit: DurationUnit,
}

impl Default for ResetDuration {
    fn default() -> Self {
        Self {
            amount: defaults::RESET_DURATION_AMOUNT,
            unit: DurationUnit::Days,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetSettings {
    #[serde(default)]
    pub duration: ResetDuration,
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_in_millis: u64,
}

impl Default for ResetSettings {
    fn default() -> Self {
        Self {
            duration: ResetDuration::default(),
            max_code_attempts: default_max_code_attempts(),
            retry_backoff_in_millis: default_retry_backoff(),
        }
    }
}

impl ResetSettings {
    pub fn lifetime(&self) -> Result<Duration, SettingsError> {
        self.duration
            .unit
            .times(self.duration.amount)
            .filter(|lifetime| *lifetime > Duration::zero())
            .ok_or(SettingsError::Invalid("reset.duration"))
    }

    pub fn retry_backoff(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.retry_backoff_in_millis)
    }
}

impl LatchkeySettings {
    /// Load from `.env`, the optional config file and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name(env::CONFIG_FILE).required(false))
            .add_source(environment());

        Self::from_builder(builder)
    }

    /// Parse a JSON document on top of the defaults. Environment variables are
    /// not consulted.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Self::from_builder(Config::builder().add_source(File::from_str(json, FileFormat::Json)))
    }

    pub(crate) fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<Self, SettingsError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.jwt.secret.expose_secret().trim().is_empty() {
            return Err(SettingsError::MissingJwtSecret);
        }
        if self.jwt.time_to_live_in_seconds <= 0 {
            return Err(SettingsError::Invalid("jwt.time_to_live_in_seconds"));
        }
        if self.hasher.iterations == 0 {
            return Err(SettingsError::Invalid("hasher.iterations"));
        }
        if self.reset.max_code_attempts == 0 {
            return Err(SettingsError::Invalid("reset.max_code_attempts"));
        }
        self.reset.lifetime()?;
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(env::ENV_PREFIX)
        .separator(env::ENV_SEPARATOR)
        .try_parsing(true)
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_time_to_live() -> i64 {
    defaults::JWT_TIME_TO_LIVE_IN_SECONDS
}

fn default_iterations() -> u32 {
    defaults::HASHER_ITERATIONS
}

fn default_memory() -> u32 {
    defaults::HASHER_MEMORY_IN_KIB
}

fn default_parallelism() -> u32 {
    defaults::HASHER_PARALLELISM
}

fn default_max_code_attempts() -> u32 {
    defaults::RESET_MAX_CODE_ATTEMPTS
}

fn default_retry_backoff() -> u64 {
    defaults::RESET_RETRY_BACKOFF_IN_MILLIS
}
