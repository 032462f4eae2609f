//! `ViewModel` configuration.
//!
//! Defaults suit an interactive screen. Each value can be overridden from
//! the environment:
//!
//! | variable | setting |
//! |---|---|
//! | `MVI_STATE_BUFFER` | [`ViewModelConfig::state_buffer`] |
//! | `MVI_SHUTDOWN_TIMEOUT_MS` | [`ViewModelConfig::shutdown_timeout`] |

use crate::error::ConfigError;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Name used when none was set
pub const DEFAULT_NAME: &str = "view_model";

/// Environment variable overriding [`ViewModelConfig::state_buffer`]
pub const STATE_BUFFER_ENV: &str = "MVI_STATE_BUFFER";

/// Environment variable overriding [`ViewModelConfig::shutdown_timeout`] (milliseconds)
pub const SHUTDOWN_TIMEOUT_ENV: &str = "MVI_SHUTDOWN_TIMEOUT_MS";

/// Configuration for `ViewModel` instances
///
/// # Example
///
/// ```
/// use countries_mvi_runtime::ViewModelConfig;
/// use std::time::Duration;
///
/// let config = ViewModelConfig::new("country_list")
///     .with_state_buffer(64)
///     .with_shutdown_timeout(Duration::from_millis(500));
///
/// assert_eq!(config.name(), "country_list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModelConfig {
    /// Name used in log fields and metric labels, [`DEFAULT_NAME`] when unset
    pub name: Option<String>,
    /// How many states a subscriber may lag behind before skipping
    pub state_buffer: usize,
    /// How long `shutdown()` waits for in-flight actions before cancelling them
    pub shutdown_timeout: Duration,
}

impl ViewModelConfig {
    /// Create a configuration with default values and the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the name unless one was already set
    #[must_use]
    pub fn or_name(mut self, name: impl Into<String>) -> Self {
        if self.name.is_none() {
            self.name = Some(name.into());
        }
        self
    }

    /// The effective name
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Set the state buffer size
    #[must_use]
    pub const fn with_state_buffer(mut self, state_buffer: usize) -> Self {
        self.state_buffer = state_buffer;
        self
    }

    /// Set the shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Default configuration with overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot
    /// be parsed, or if the state buffer is zero.
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
        if let Some(state_buffer) = parse_var::<usize>(STATE_BUFFER_ENV, lookup(STATE_BUFFER_ENV))? {
            if state_buffer == 0 {
                return Err(ConfigError::InvalidValue {
                    key: STATE_BUFFER_ENV.to_string(),
                    value: state_buffer.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            self.state_buffer = state_buffer;
        }
        if let Some(timeout) = millis_var(SHUTDOWN_TIMEOUT_ENV, lookup(SHUTDOWN_TIMEOUT_ENV))? {
            self.shutdown_timeout = timeout;
        }
        Ok(self)
    }
}

impl Default for ViewModelConfig {
    fn default() -> Self {
        Self {
            name: None,
            state_buffer: 128,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Parse an optional raw setting
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if `raw` is present and does not parse.
pub fn parse_var<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })
    })
    .transpose()
}

/// Parse an optional duration given in whole milliseconds
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if `raw` is present and is not an
/// unsigned integer.
pub fn millis_var(key: &str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_var::<u64>(key, raw)?.map(Duration::from_millis))
}
