use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::catalog::ProductLine;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str| -> Result<bool, ConfigError> {
        match or_default(var, "false").as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got '{other}'"),
            }),
        }
    };

    let store_number = require("PICKWATCH_STORE_NUMBER")?;
    if store_number.trim().is_empty() {
        return Err(ConfigError::Validation(
            "PICKWATCH_STORE_NUMBER must be non-empty".to_string(),
        ));
    }

    let country = or_default("PICKWATCH_COUNTRY", "US").trim().to_uppercase();
    if country.is_empty() {
        return Err(ConfigError::Validation(
            "PICKWATCH_COUNTRY must be non-empty".to_string(),
        ));
    }

    let product_line_raw = or_default("PICKWATCH_PRODUCT_LINE", "phone");
    let product_line =
        product_line_raw
            .parse::<ProductLine>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: "PICKWATCH_PRODUCT_LINE".to_string(),
                reason,
            })?;

    let preferred_skus = parse_sku_list(&or_default("PICKWATCH_PREFERRED_SKUS", ""));

    let custom_sku = lookup("PICKWATCH_CUSTOM_SKU")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let custom_sku_nickname = lookup("PICKWATCH_CUSTOM_SKU_NICKNAME")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let filter_preferred_only = parse_bool("PICKWATCH_FILTER_PREFERRED_ONLY")?;
    let notify_preferred_only = parse_bool("PICKWATCH_NOTIFY_PREFERRED_ONLY")?;

    // The remote endpoint is not ours; one minute is the floor.
    let poll_interval_mins = parse_u64("PICKWATCH_POLL_INTERVAL_MINS", "1")?.max(1);

    let local_version = or_default("PICKWATCH_LOCAL_VERSION", env!("CARGO_PKG_VERSION"));
    let release_repo = or_default("PICKWATCH_RELEASE_REPO", "pickwatch/pickwatch");
    let catalog_path = PathBuf::from(or_default(
        "PICKWATCH_CATALOG_PATH",
        "./config/catalog.yaml",
    ));
    let request_timeout_secs = parse_u64("PICKWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "PICKWATCH_USER_AGENT",
        "pickwatch/0.1 (pickup-availability)",
    );
    let log_level = or_default("PICKWATCH_LOG_LEVEL", "info");

    Ok(AppConfig {
        country,
        product_line,
        store_number,
        preferred_skus,
        custom_sku,
        custom_sku_nickname,
        filter_preferred_only,
        notify_preferred_only,
        poll_interval_mins,
        local_version,
        release_repo,
        catalog_path,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

/// Split a comma-separated SKU list, trimming whitespace and dropping empties.
fn parse_sku_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
