//! Configuration management for Slotwatch
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SlotwatchError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment prefix for per-session label overrides, e.g.
/// `SLOTWATCH_SESSION_LABEL_3="11:30 - 13:10"`
const SESSION_LABEL_ENV_PREFIX: &str = "SLOTWATCH_SESSION_LABEL_";

/// Main configuration structure for Slotwatch
///
/// This structure holds all configuration needed for the watcher,
/// including booking-site credentials, watch-window settings, and
/// notification channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Booking site connection and credentials
    #[serde(default)]
    pub booking: BookingConfig,

    /// Watch loop behavior
    #[serde(default)]
    pub watch: WatchConfig,

    /// Telegram notification settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Liveness listener settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Booking site configuration
///
/// Connection details and credentials for the driving school's legacy
/// booking frontend, plus the month/session/day combinations to request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Base URL of the booking site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Account identifier sent with listing and booking forms
    #[serde(default)]
    pub account_id: String,

    /// Login identifier (NRIC)
    #[serde(default)]
    pub nric: String,

    /// Login password
    #[serde(default)]
    pub password: String,

    /// Months to request, in the site's `YYYYMM`-style tokens
    #[serde(default)]
    pub wanted_months: Vec<String>,

    /// Session numbers to request
    #[serde(default)]
    pub wanted_sessions: Vec<String>,

    /// Weekday numbers to request
    #[serde(default)]
    pub wanted_days: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://www.bbdc.sg".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            account_id: String::new(),
            nric: String::new(),
            password: String::new(),
            wanted_months: Vec::new(),
            wanted_sessions: Vec::new(),
            wanted_days: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Watch loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Only slots strictly closer than this many days are booked
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,

    /// Slots whose midnight is not strictly more than this many hours away
    /// are skipped as too close to prepare for
    #[serde(default = "default_min_lead_hours")]
    pub min_lead_hours: i64,

    /// Lower bound of the randomized pause between poll cycles, in seconds
    #[serde(default = "default_min_delay")]
    pub min_delay_secs: u64,

    /// Upper bound of the randomized pause between poll cycles, in seconds
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,

    /// Human-readable labels per session number, used in notifications
    #[serde(default)]
    pub session_labels: HashMap<String, String>,
}

fn default_lookahead_days() -> i64 {
    10
}

fn default_min_lead_hours() -> i64 {
    12
}

fn default_min_delay() -> u64 {
    120
}

fn default_max_delay() -> u64 {
    419
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            lookahead_days: default_lookahead_days(),
            min_lead_hours: default_min_lead_hours(),
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
            session_labels: HashMap::new(),
        }
    }
}

impl WatchConfig {
    /// Label for a session number, falling back to `Session <n>` when no
    /// mapping is configured
    pub fn session_label(&self, session_number: &str) -> String {
        self.session_labels
            .get(session_number)
            .cloned()
            .unwrap_or_else(|| format!("Session {session_number}"))
    }
}

/// Telegram notification configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    #[serde(default)]
    pub token: String,

    /// Chat ids every notification is delivered to
    #[serde(default)]
    pub chat_ids: Vec<i64>,

    /// Optional API base URL for Telegram endpoints (useful for tests and local mocks)
    ///
    /// When set, this base is used to build Bot API endpoints (e.g. `/getMe`,
    /// `/sendMessage`) which allows tests to point the notifier at a mock
    /// server.
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Liveness listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port the liveness listener binds on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            booking: BookingConfig::default(),
            watch: WatchConfig::default(),
            telegram: TelegramConfig::default(),
            server: ServerConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SlotwatchError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SlotwatchError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Booking overrides
        if let Ok(base_url) = std::env::var("SLOTWATCH_BASE_URL") {
            self.booking.base_url = base_url;
        }

        if let Ok(account_id) = std::env::var("SLOTWATCH_ACCOUNT_ID") {
            self.booking.account_id = account_id;
        }

        if let Ok(nric) = std::env::var("SLOTWATCH_NRIC") {
            self.booking.nric = nric;
        }

        if let Ok(password) = std::env::var("SLOTWATCH_PASSWORD") {
            self.booking.password = password;
        }

        if let Ok(months) = std::env::var("SLOTWATCH_WANTED_MONTHS") {
            let values = split_list(&months);
            if !values.is_empty() {
                self.booking.wanted_months = values.clone();
                tracing::debug!(?values, "Env override: SLOTWATCH_WANTED_MONTHS");
            }
        }

        if let Ok(sessions) = std::env::var("SLOTWATCH_WANTED_SESSIONS") {
            let values = split_list(&sessions);
            if !values.is_empty() {
                self.booking.wanted_sessions = values.clone();
                tracing::debug!(?values, "Env override: SLOTWATCH_WANTED_SESSIONS");
            }
        }

        if let Ok(days) = std::env::var("SLOTWATCH_WANTED_DAYS") {
            let values = split_list(&days);
            if !values.is_empty() {
                self.booking.wanted_days = values.clone();
                tracing::debug!(?values, "Env override: SLOTWATCH_WANTED_DAYS");
            }
        }

        if let Ok(timeout) = std::env::var("SLOTWATCH_REQUEST_TIMEOUT_SECS") {
            if let Ok(value) = timeout.parse() {
                self.booking.request_timeout_secs = value;
            } else {
                tracing::warn!("Invalid SLOTWATCH_REQUEST_TIMEOUT_SECS: {}", timeout);
            }
        }

        // Watch overrides
        if let Ok(lookahead) = std::env::var("SLOTWATCH_LOOKAHEAD_DAYS") {
            if let Ok(value) = lookahead.parse() {
                self.watch.lookahead_days = value;
                tracing::debug!(lookahead_days = value, "Env override: SLOTWATCH_LOOKAHEAD_DAYS");
            } else {
                tracing::warn!("Invalid SLOTWATCH_LOOKAHEAD_DAYS: {}", lookahead);
            }
        }

        if let Ok(lead) = std::env::var("SLOTWATCH_MIN_LEAD_HOURS") {
            if let Ok(value) = lead.parse() {
                self.watch.min_lead_hours = value;
                tracing::debug!(min_lead_hours = value, "Env override: SLOTWATCH_MIN_LEAD_HOURS");
            } else {
                tracing::warn!("Invalid SLOTWATCH_MIN_LEAD_HOURS: {}", lead);
            }
        }

        if let Ok(min_delay) = std::env::var("SLOTWATCH_MIN_DELAY_SECS") {
            if let Ok(value) = min_delay.parse() {
                self.watch.min_delay_secs = value;
            } else {
                tracing::warn!("Invalid SLOTWATCH_MIN_DELAY_SECS: {}", min_delay);
            }
        }

        if let Ok(max_delay) = std::env::var("SLOTWATCH_MAX_DELAY_SECS") {
            if let Ok(value) = max_delay.parse() {
                self.watch.max_delay_secs = value;
            } else {
                tracing::warn!("Invalid SLOTWATCH_MAX_DELAY_SECS: {}", max_delay);
            }
        }

        // Session label overrides, one variable per session number
        for (key, value) in std::env::vars() {
            if let Some(session_number) = key.strip_prefix(SESSION_LABEL_ENV_PREFIX) {
                if !session_number.is_empty() {
                    self.watch
                        .session_labels
                        .insert(session_number.to_string(), value.clone());
                    tracing::debug!(session = session_number, label = %value, "Env override: session label");
                }
            }
        }

        // Telegram overrides
        if let Ok(token) = std::env::var("SLOTWATCH_TELEGRAM_TOKEN") {
            self.telegram.token = token;
        }

        if let Ok(chat_ids) = std::env::var("SLOTWATCH_CHAT_IDS") {
            let mut parsed = Vec::new();
            for token in split_list(&chat_ids) {
                match token.parse::<i64>() {
                    Ok(id) => parsed.push(id),
                    Err(_) => tracing::warn!("Invalid chat id in SLOTWATCH_CHAT_IDS: {}", token),
                }
            }
            if !parsed.is_empty() {
                tracing::debug!(?parsed, "Env override: SLOTWATCH_CHAT_IDS");
                self.telegram.chat_ids = parsed;
            }
        }

        if let Ok(api_base) = std::env::var("SLOTWATCH_TELEGRAM_API_BASE") {
            self.telegram.api_base = Some(api_base.clone());
            tracing::debug!(api_base = %api_base, "Env override: SLOTWATCH_TELEGRAM_API_BASE");
        }

        // Server overrides; PORT is also honored because container platforms
        // inject it without a prefix
        for var in ["SLOTWATCH_PORT", "PORT"] {
            if let Ok(port) = std::env::var(var) {
                match port.parse::<u16>() {
                    Ok(value) => {
                        self.server.port = value;
                        tracing::debug!(port = value, "Env override: {}", var);
                        break;
                    }
                    Err(_) => tracing::warn!("Invalid {}: {}", var, port),
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Returns
    ///
    /// Returns Ok if configuration is valid
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        match url::Url::parse(&self.booking.base_url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => {
                return Err(SlotwatchError::Config(format!(
                    "booking.base_url must use http or https, got {}",
                    parsed.scheme()
                ))
                .into());
            }
            Err(e) => {
                return Err(
                    SlotwatchError::Config(format!("booking.base_url is not a URL: {}", e)).into(),
                );
            }
        }

        if self.booking.account_id.is_empty() {
            return Err(
                SlotwatchError::Config("booking.account_id cannot be empty".to_string()).into(),
            );
        }

        if self.booking.nric.is_empty() {
            return Err(SlotwatchError::Config("booking.nric cannot be empty".to_string()).into());
        }

        if self.booking.password.is_empty() {
            return Err(
                SlotwatchError::Config("booking.password cannot be empty".to_string()).into(),
            );
        }

        if self.booking.wanted_months.is_empty() {
            return Err(SlotwatchError::Config(
                "booking.wanted_months cannot be empty".to_string(),
            )
            .into());
        }

        if self.booking.wanted_sessions.is_empty() {
            return Err(SlotwatchError::Config(
                "booking.wanted_sessions cannot be empty".to_string(),
            )
            .into());
        }

        if self.booking.wanted_days.is_empty() {
            return Err(
                SlotwatchError::Config("booking.wanted_days cannot be empty".to_string()).into(),
            );
        }

        if self.booking.request_timeout_secs == 0 || self.booking.request_timeout_secs > 300 {
            return Err(SlotwatchError::Config(
                "booking.request_timeout_secs must be between 1 and 300".to_string(),
            )
            .into());
        }

        if self.watch.lookahead_days < 1 || self.watch.lookahead_days > 365 {
            return Err(SlotwatchError::Config(
                "watch.lookahead_days must be between 1 and 365".to_string(),
            )
            .into());
        }

        if self.watch.min_lead_hours < 0 || self.watch.min_lead_hours > 168 {
            return Err(SlotwatchError::Config(
                "watch.min_lead_hours must be between 0 and 168".to_string(),
            )
            .into());
        }

        if self.watch.min_delay_secs == 0 {
            return Err(SlotwatchError::Config(
                "watch.min_delay_secs must be greater than 0".to_string(),
            )
            .into());
        }

        if self.watch.min_delay_secs > self.watch.max_delay_secs {
            return Err(SlotwatchError::Config(
                "watch.min_delay_secs cannot exceed watch.max_delay_secs".to_string(),
            )
            .into());
        }

        if self.telegram.token.is_empty() {
            return Err(
                SlotwatchError::Config("telegram.token cannot be empty".to_string()).into(),
            );
        }

        if self.telegram.chat_ids.is_empty() {
            return Err(
                SlotwatchError::Config("telegram.chat_ids cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
