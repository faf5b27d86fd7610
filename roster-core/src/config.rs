//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/roster/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/roster/` (~/.config/roster/)
//! - Data: `$XDG_DATA_HOME/roster/` (~/.local/share/roster/)
//! - State/Logs: `$XDG_STATE_HOME/roster/` (~/.local/state/roster/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Record store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Directory endpoint settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Histogram settings
    #[serde(default)]
    pub chart: ChartConfig,

    /// Reading report settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    /// Override for the database file (defaults to the XDG data dir)
    pub path: Option<PathBuf>,

    /// Delete every record when the interactive shell exits
    #[serde(default)]
    pub clear_on_exit: bool,
}

/// Remote directory configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Endpoint returning the JSON array of directory entries
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Request timeout; unset means the fetch runs to completion or failure
    pub timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: None,
        }
    }
}

fn default_source_url() -> String {
    "https://jsonplaceholder.typicode.com/users".to_string()
}

/// Histogram rendering configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    /// Number of equal-width bins
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Width in characters of the longest bar
    #[serde(default = "default_bar_width")]
    pub width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            width: default_bar_width(),
        }
    }
}

fn default_bins() -> usize {
    5
}

fn default_bar_width() -> usize {
    40
}

/// Reading report configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Plain-text book to analyze
    #[serde(default = "default_text_url")]
    pub text_url: String,

    /// Prefix identifying the title line (case-insensitive)
    #[serde(default = "default_title_hint")]
    pub title_hint: String,

    /// Substring identifying the author line (case-insensitive)
    #[serde(default = "default_author_hint")]
    pub author_hint: String,

    /// Heading that opens the analyzed chapter
    #[serde(default = "default_chapter_marker")]
    pub chapter_marker: String,

    /// Heading that closes the analyzed chapter
    #[serde(default = "default_next_chapter_marker")]
    pub next_chapter_marker: String,

    /// Chapter title removed from the analyzed text
    #[serde(default = "default_chapter_title")]
    pub chapter_title: String,

    /// Name printed as the report author
    #[serde(default = "default_report_author")]
    pub report_author: String,

    /// Output document path
    #[serde(default = "default_report_output")]
    pub output: PathBuf,

    /// Open the document with the system handler once written
    #[serde(default = "default_open_after")]
    pub open_after: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            text_url: default_text_url(),
            title_hint: default_title_hint(),
            author_hint: default_author_hint(),
            chapter_marker: default_chapter_marker(),
            next_chapter_marker: default_next_chapter_marker(),
            chapter_title: default_chapter_title(),
            report_author: default_report_author(),
            output: default_report_output(),
            open_after: default_open_after(),
        }
    }
}

fn default_text_url() -> String {
    "https://www.gutenberg.org/files/11/11-0.txt".to_string()
}

fn default_title_hint() -> String {
    "alice".to_string()
}

fn default_author_hint() -> String {
    "lewis carroll".to_string()
}

fn default_chapter_marker() -> String {
    "CHAPTER I.".to_string()
}

fn default_next_chapter_marker() -> String {
    "CHAPTER II.".to_string()
}

fn default_chapter_title() -> String {
    "Down the Rabbit-Hole".to_string()
}

fn default_report_author() -> String {
    "roster".to_string()
}

fn default_report_output() -> PathBuf {
    PathBuf::from("reading_report.md")
}

fn default_open_after() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.chart.bins == 0 {
            return Err(Error::Config("chart.bins must be at least 1".to_string()));
        }
        if self.source.url.trim().is_empty() {
            return Err(Error::Config("source.url must not be empty".to_string()));
        }
        if self.report.text_url.trim().is_empty() {
            return Err(Error::Config(
                "report.text_url must not be empty".to_string(),
            ));
        }
        if self.report.chapter_marker.is_empty() {
            return Err(Error::Config(
                "report.chapter_marker must not be empty".to_string(),
            ));
        }
        crate::logging::level_filter(&self.logging.level)?;
        Ok(())
    }

    /// Resolved database path, honoring `store.path`
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(Self::database_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/roster/config.toml` (~/.config/roster/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("roster").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/roster/` (~/.local/share/roster/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("roster")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/roster/` (~/.local/state/roster/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("roster")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/roster/data.db` (~/.local/share/roster/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }
}
