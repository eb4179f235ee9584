//! One poll cycle: build the query, fetch, parse, filter, publish, notify.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pickwatch_core::{AppConfig, CatalogFile, SkuCatalog};
use tokio::sync::watch;

use crate::error::PollerError;
use crate::filter::filter_stores;
use crate::notify::{notification_for, summarize, NotificationSink};
use crate::parse::parse_fulfillment;
use crate::query::parts_query;
use crate::types::{PollResult, PollState};

const DEFAULT_HOST: &str = "https://www.apple.com";
const FULFILLMENT_PATH: &str = "shop/fulfillment-messages";

/// Locale-specific URL fragment between host and `shop/`: the US storefront
/// lives at the bare host, China on its own TLD, everywhere else under a
/// country segment.
#[must_use]
pub fn country_path(country: &str) -> String {
    match country.to_uppercase().as_str() {
        "US" => "/".to_string(),
        "CN" => ".cn/".to_string(),
        other => format!("/{other}/"),
    }
}

/// Fetches pickup availability and publishes [`PollState`] snapshots.
///
/// Owns the HTTP client and the state channel; observers subscribe via
/// [`AvailabilityFetcher::subscribe`] and only ever see complete snapshots.
/// Notifications go through the injected [`NotificationSink`].
pub struct AvailabilityFetcher {
    client: reqwest::Client,
    base_host: String,
    state: watch::Sender<PollState>,
    sink: Arc<dyn NotificationSink>,
}

impl AvailabilityFetcher {
    /// Creates a fetcher pointed at the production storefront host.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, PollerError> {
        Self::with_base_host(timeout_secs, user_agent, sink, DEFAULT_HOST)
    }

    /// Creates a fetcher with a custom host (for testing with wiremock).
    /// The country path segment is still appended to the host.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_host(
        timeout_secs: u64,
        user_agent: &str,
        sink: Arc<dyn NotificationSink>,
        base_host: &str,
    ) -> Result<Self, PollerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let (state, _) = watch::channel(PollState::default());

        Ok(Self {
            client,
            base_host: base_host.trim_end_matches('/').to_string(),
            state,
            sink,
        })
    }

    /// Subscribe to published poll snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// Run one complete poll cycle against a fresh configuration snapshot.
    ///
    /// On success the new [`PollResult`] replaces the published one and the
    /// composed notification is forwarded to the sink, unless
    /// `notify_preferred_only` is set and nothing preferred was hit. On
    /// failure the published error is set and the previous result is left
    /// untouched. The loading flag is cleared on both paths.
    ///
    /// # Errors
    ///
    /// Returns the [`PollerError`] that aborted the cycle, after it has been
    /// published; callers driving a recurring schedule can ignore it.
    pub async fn run_cycle(
        &self,
        config: &AppConfig,
        catalog: &CatalogFile,
    ) -> Result<PollResult, PollerError> {
        self.state.send_modify(|s| s.loading = true);

        match self.poll(config, catalog).await {
            Ok((result, skus)) => {
                self.state.send_modify(|s| {
                    s.result = Some(result.clone());
                    s.error = None;
                    s.loading = false;
                });

                let preferred: HashSet<String> = config.preferred_skus.iter().cloned().collect();
                let summary = summarize(
                    &result.stores,
                    &skus,
                    &preferred,
                    config.custom_sku.as_deref(),
                    config.custom_sku_nickname.as_deref(),
                );
                tracing::info!(
                    stores = result.stores.len(),
                    summary = %summary.line,
                    "poll cycle complete"
                );

                if !config.notify_preferred_only || summary.preferred_hit {
                    self.sink.notify(&notification_for(&summary));
                }

                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "poll cycle failed");
                self.state.send_modify(|s| {
                    s.error = Some(e.user_message().to_string());
                    s.loading = false;
                });
                Err(e)
            }
        }
    }

    async fn poll(
        &self,
        config: &AppConfig,
        catalog: &CatalogFile,
    ) -> Result<(PollResult, SkuCatalog), PollerError> {
        let skus = catalog
            .sku_catalog(&config.country, config.product_line)
            .ok_or_else(|| PollerError::InvalidCatalog {
                reason: format!(
                    "no SKU table for country '{}' product line '{}'",
                    config.country, config.product_line
                ),
            })?;

        let query = parts_query(
            skus.ordered_skus(),
            config.custom_sku.as_deref(),
            &config.store_number,
        );
        let raw_url = format!(
            "{}{}{FULFILLMENT_PATH}?{query}",
            self.base_host,
            country_path(&config.country)
        );
        let url = reqwest::Url::parse(&raw_url).map_err(|e| PollerError::Url {
            reason: format!("'{raw_url}': {e}"),
        })?;

        tracing::debug!(%url, "fetching pickup availability");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;

        let stores = parse_fulfillment(&body)?;

        // The filter set is the user's wanted SKUs: the preferred set plus
        // the custom SKU when one is configured.
        let filter_set: Option<HashSet<String>> = if config.filter_preferred_only {
            Some(
                config
                    .preferred_skus
                    .iter()
                    .cloned()
                    .chain(config.custom_sku.clone())
                    .collect(),
            )
        } else {
            None
        };

        let filtered = filter_stores(stores, filter_set.as_ref());

        Ok((
            PollResult {
                checked_at: Utc::now(),
                stores: filtered,
            },
            skus,
        ))
    }
}
