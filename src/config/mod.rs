use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::utils::DateRange;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Left unset, reqwest's own default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    #[serde(default)]
    pub skip_db: bool,
}

/// Export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://www.forebet.com/en/football-predictions/under-over-25-goals/".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/58.0.3029.110 Safari/537.3"
        .to_string()
}
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap_or_default()
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 19).unwrap_or_default()
}
fn default_output_path() -> PathBuf {
    PathBuf::from("football_predictions.xlsx")
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            skip_db: false,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

impl PipelineConfig {
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("FOREBET").separator("__"))
            .build()?;

        cfg.try_deserialize()
            .context("Invalid configuration (dates must be YYYY-MM-DD)")
    }
}

// ── Database ─────────────────────────────────────────────────────────────────

/// PostgreSQL connection parameters, read from `DB_NAME`, `DB_USER`,
/// `DB_PASSWORD`, `DB_HOST` and `DB_PORT`.
///
/// Every field is optional here; a missing one is reported when the
/// persister tries to connect.
#[derive(Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        config::Config::builder()
            .add_source(config::Environment::with_prefix("DB"))
            .build()?
            .try_deserialize()
            .context("Failed to read DB_* environment variables")
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
