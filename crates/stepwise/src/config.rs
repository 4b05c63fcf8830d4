//! Runner configuration parsed from environment variables.
//!
//! Every setting can be supplied through a `STEPWISE_` prefixed environment
//! variable and overridden programmatically afterwards.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::tags::TagExpression;

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "STEPWISE_LOG_LEVEL";
/// Environment variable enabling dry runs.
pub const DRY_RUN_ENV: &str = "STEPWISE_DRY_RUN";
/// Environment variable enabling strict mode.
pub const STRICT_ENV: &str = "STEPWISE_STRICT";
/// Environment variable enabling fail-fast mode.
pub const FAIL_FAST_ENV: &str = "STEPWISE_FAIL_FAST";
/// Environment variable holding the tag filter.
pub const TAGS_ENV: &str = "STEPWISE_TAGS";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so a plain run stays quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every event, including per-token and per-match traces.
    Trace,
    /// Parser recovery, registration and scenario lifecycle.
    Debug,
    /// Run-level progress.
    Info,
    /// Ambiguous steps and failing scenarios.
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                value: s.to_string(),
                expected: "one of trace, debug, info, warn, error",
            }),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub const fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Settings for a [`Runner`](crate::Runner).
///
/// # Environment Variables
///
/// - `STEPWISE_LOG_LEVEL`: trace, debug, info, warn or error
/// - `STEPWISE_DRY_RUN`: match steps without running them
/// - `STEPWISE_STRICT`: treat undefined steps as failures
/// - `STEPWISE_FAIL_FAST`: stop after the first failing scenario
/// - `STEPWISE_TAGS`: tag expression selecting scenarios, e.g.
///   `@smoke and not @slow`
///
/// Booleans accept `1`, `true`, `yes`, `on` and `0`, `false`, `no`, `off`.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Level passed to [`init_logging`](crate::logging::init_logging).
    pub log_level: LogLevel,
    /// Report which steps match without invoking handlers or hooks.
    pub dry_run: bool,
    /// Undefined steps make the run unsuccessful.
    pub strict: bool,
    /// Skip remaining scenarios once one fails.
    pub fail_fast: bool,
    /// Only scenarios whose tags satisfy the expression are run.
    pub tags: Option<TagExpression>,
}

/// Caller-supplied values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replacement log level.
    pub log_level: Option<LogLevel>,
    /// Replacement dry-run flag.
    pub dry_run: Option<bool>,
    /// Replacement strict flag.
    pub strict: Option<bool>,
    /// Replacement fail-fast flag.
    pub fail_fast: Option<bool>,
    /// Replacement tag filter.
    pub tags: Option<TagExpression>,
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when a variable holds a value outside its domain.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    ///
    /// # Examples
    ///
    /// ```
    /// use stepwise::{LogLevel, RunnerConfig};
    ///
    /// let config = RunnerConfig::from_lookup(|key| match key {
    ///     "STEPWISE_STRICT" => Some("yes".to_string()),
    ///     "STEPWISE_TAGS" => Some("@smoke".to_string()),
    ///     _ => None,
    /// })?;
    /// assert!(config.strict);
    /// assert_eq!(config.log_level, LogLevel::Warn);
    /// assert_eq!(config.tags.map(|t| t.to_string()).as_deref(), Some("@smoke"));
    /// # Ok::<(), stepwise::ConfigError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup(LOG_LEVEL_ENV)
            .map(|value| value.parse::<LogLevel>())
            .transpose()?
            .unwrap_or_default();
        let flag = |key: &'static str| -> Result<bool, ConfigError> {
            lookup(key).map_or(Ok(false), |value| parse_bool(key, &value))
        };
        let tags = lookup(TAGS_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(|value| TagExpression::parse(&value))
            .transpose()?;
        Ok(Self {
            log_level,
            dry_run: flag(DRY_RUN_ENV)?,
            strict: flag(STRICT_ENV)?,
            fail_fast: flag(FAIL_FAST_ENV)?,
            tags,
        })
    }

    /// Apply optional overrides to an existing configuration.
    #[must_use]
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(dry_run) = overrides.dry_run {
            self.dry_run = dry_run;
        }
        if let Some(strict) = overrides.strict {
            self.strict = strict;
        }
        if let Some(fail_fast) = overrides.fail_fast {
            self.fail_fast = fail_fast;
        }
        if let Some(tags) = overrides.tags {
            self.tags = Some(tags);
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Create a new configuration with dry runs switched on or off.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create a new configuration with strict mode switched on or off.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Create a new configuration with fail-fast switched on or off.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Create a new configuration filtering scenarios by `tags`.
    #[must_use]
    pub fn with_tags(mut self, tags: TagExpression) -> Self {
        self.tags = Some(tags);
        self
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a boolean (1/0, true/false, yes/no, on/off)",
        }),
    }
}
