//! Application configuration.
//!
//! | variable | setting |
//! |---|---|
//! | `COUNTRIES_RESET_DELAY_MS` | [`CountriesConfig::reset_delay`] |
//! | `COUNTRIES_LATENCY_MS` | [`CountriesConfig::latency`] |
//! | `COUNTRIES_SEED_FILE` | [`CountriesConfig::seed_file`] |

use countries_mvi_runtime::ConfigError;
use countries_mvi_runtime::config::millis_var;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding [`CountriesConfig::reset_delay`] (milliseconds)
pub const RESET_DELAY_ENV: &str = "COUNTRIES_RESET_DELAY_MS";

/// Environment variable overriding [`CountriesConfig::latency`] (milliseconds)
pub const LATENCY_ENV: &str = "COUNTRIES_LATENCY_MS";

/// Environment variable setting [`CountriesConfig::seed_file`]
pub const SEED_FILE_ENV: &str = "COUNTRIES_SEED_FILE";

/// How long a favorite message stays visible by default
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(2);

/// Configuration of the countries screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountriesConfig {
    /// Delay between a favorite toggle's success and the reset hiding its message
    pub reset_delay: Duration,
    /// Artificial latency added to every repository call
    pub latency: Duration,
    /// JSON file to seed the repository from; the bundled data when `None`
    pub seed_file: Option<PathBuf>,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            latency: Duration::ZERO,
            seed_file: None,
        }
    }
}

impl CountriesConfig {
    /// Set the reset delay
    #[must_use]
    pub const fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    /// Set the repository latency
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the seed file
    #[must_use]
    pub fn with_seed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_file = Some(path.into());
        self
    }

    /// Default configuration with overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a duration variable is set
    /// but is not a whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(delay) = millis_var(RESET_DELAY_ENV, lookup(RESET_DELAY_ENV))? {
            self.reset_delay = delay;
        }
        if let Some(latency) = millis_var(LATENCY_ENV, lookup(LATENCY_ENV))? {
            self.latency = latency;
        }
        if let Some(path) = lookup(SEED_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            self.seed_file = Some(PathBuf::from(path));
        }
        Ok(self)
    }
}
