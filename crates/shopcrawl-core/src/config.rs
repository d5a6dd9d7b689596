//! Environment-backed application configuration.
//!
//! All knobs have defaults so a bare `shopcrawl scrape` works out of the
//! box; overrides come from `SHOPCRAWL_*` environment variables (loaded
//! through `.env` via `dotenvy` when present).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime configuration for a scrape run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Per-request timeout for page fetches.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential retry backoff: `base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    /// Courtesy pause between listing pages of one source.
    pub inter_page_delay_ms: u64,
    /// Courtesy pause between detail-page fetches within one listing page.
    pub inter_item_delay_ms: u64,
    /// Safety bound on the open-ended pagination loop.
    pub max_pages: u32,
    /// Directory for per-source JSON output files.
    pub output_dir: PathBuf,
    pub log_level: String,
}

/// Load configuration from environment variables, reading `.env` first.
///
/// # Errors
///
/// Returns [`ConfigError`] if a set variable fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from variables already in the process environment.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns [`ConfigError`] if a set variable fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// The parsing logic is decoupled from the real environment so tests can
/// drive it with a plain `HashMap` lookup — no `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    Ok(AppConfig {
        request_timeout_secs: parse_u64("SHOPCRAWL_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default(
            "SHOPCRAWL_USER_AGENT",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/131.0.0.0 Safari/537.36",
        ),
        max_retries: parse_u32("SHOPCRAWL_MAX_RETRIES", "3")?,
        retry_backoff_base_secs: parse_u64("SHOPCRAWL_RETRY_BACKOFF_BASE_SECS", "5")?,
        inter_page_delay_ms: parse_u64("SHOPCRAWL_INTER_PAGE_DELAY_MS", "2000")?,
        inter_item_delay_ms: parse_u64("SHOPCRAWL_INTER_ITEM_DELAY_MS", "1000")?,
        max_pages: parse_u32("SHOPCRAWL_MAX_PAGES", "200")?,
        output_dir: PathBuf::from(or_default("SHOPCRAWL_OUTPUT_DIR", "./output")),
        log_level: or_default("SHOPCRAWL_LOG_LEVEL", "info"),
    })
}
