use std::path::PathBuf;

use crate::catalog::ProductLine;

/// Full application configuration, assembled from environment variables.
///
/// The poller reads a fresh clone of this at the start of every cycle, so
/// interval or preference changes take effect on the next poll without a
/// restart.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// ISO country code, normalised to uppercase (e.g. `US`, `JP`).
    pub country: String,
    pub product_line: ProductLine,
    /// Retail store number to query pickup availability for (e.g. `R032`).
    pub store_number: String,
    /// SKUs the user actually wants, in configuration order.
    pub preferred_skus: Vec<String>,
    /// A SKU outside the shipped catalog, queried in addition to it.
    pub custom_sku: Option<String>,
    pub custom_sku_nickname: Option<String>,
    /// When set, the poll result only keeps parts from the preferred set.
    pub filter_preferred_only: bool,
    /// When set, notifications fire only when a preferred SKU is in stock.
    pub notify_preferred_only: bool,
    /// Minutes between polls. Coerced to a minimum of 1 at load time.
    pub poll_interval_mins: u64,
    /// Version string of this build, compared against published release tags.
    pub local_version: String,
    /// `owner/repo` whose tags are checked for newer releases.
    pub release_repo: String,
    pub catalog_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}
