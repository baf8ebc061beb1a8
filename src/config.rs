use crate::models::{Lookback, WindowGranularity, WindowPolicy};
use std::env;
use std::time::Duration;

/// Refresh scheduling configuration
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub adapter_timeout_secs: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub handle: String,
    pub window: WindowPolicy,
    pub refresh: RefreshConfig,
    pub codechef_fallback: bool,
    pub log_level: String,
    pub environment: String,
}

impl RefreshConfig {
    /// Create refresh config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let interval_secs = var_or("REFRESH_INTERVAL_SECS", 86_400, parse_secs)?; // 24 hours
        let adapter_timeout_secs = var_or("ADAPTER_TIMEOUT_SECS", 15, parse_secs)?;

        Ok(Self {
            interval_secs,
            adapter_timeout_secs,
        })
    }

    /// Get refresh interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Get per-adapter timeout as Duration
    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.adapter_timeout_secs)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 86_400,
            adapter_timeout_secs: 15,
        }
    }
}

/// Read an optional variable, parsing it when set
fn var_or<T>(name: &str, default: T, parse: fn(&str, &str) -> Result<T, String>) -> Result<T, String> {
    match env::var(name) {
        Ok(value) => parse(name, &value),
        Err(_) => Ok(default),
    }
}

/// Parse a positive number of seconds
pub fn parse_secs(name: &str, value: &str) -> Result<u64, String> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("Invalid {}: {}. Must be a number of seconds", name, value))?;

    if secs == 0 {
        return Err(format!("{} must be greater than 0", name));
    }
    Ok(secs)
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`)
pub fn parse_flag(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(format!("Invalid {}: {}. Must be true or false", name, value)),
    }
}

/// Parse a `LOOKBACK_DAYS` value: a day count or `all`
pub fn parse_lookback(value: &str) -> Result<Lookback, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("all") {
        return Ok(Lookback::All);
    }
    value
        .parse::<u32>()
        .map(Lookback::Days)
        .map_err(|_| format!("Invalid LOOKBACK_DAYS: {}. Must be a day count or \"all\"", value))
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let handle = env::var("DASHBOARD_HANDLE")
            .map_err(|_| "DASHBOARD_HANDLE environment variable is required")?;

        if handle.trim().is_empty() {
            return Err("DASHBOARD_HANDLE must not be empty".to_string());
        }

        let lookback = match env::var("LOOKBACK_DAYS") {
            Ok(v) => parse_lookback(&v)?,
            Err(_) => Lookback::Days(365),
        };

        let exclude_future = var_or("EXCLUDE_FUTURE", true, parse_flag)?;

        let granularity = match env::var("WINDOW_GRANULARITY") {
            Ok(v) => WindowGranularity::from_str(&v)?,
            Err(_) => WindowGranularity::Observed,
        };

        let window = WindowPolicy {
            lookback,
            exclude_future,
            granularity,
        };
        window.validate().map_err(|e| e.to_string())?;

        let refresh = RefreshConfig::from_env()?;

        let codechef_fallback = var_or("CODECHEF_FALLBACK", true, parse_flag)?;

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            handle: handle.trim().to_string(),
            window,
            refresh,
            codechef_fallback,
            log_level: log_level.to_lowercase(),
            environment: environment.to_lowercase(),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            handle: String::new(),
            window: WindowPolicy::default(),
            refresh: RefreshConfig::default(),
            codechef_fallback: true,
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}
