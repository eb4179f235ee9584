//! Release-staleness checking against published repository tags.

use std::cmp::Ordering;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;

use crate::error::PollerError;
use crate::types::VersionState;

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Compare two dotted numeric version strings.
///
/// Components are compared as integers left to right; a missing trailing
/// component counts as 0, so `"1.2" == "1.2.0"`. Non-numeric components also
/// count as 0.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<u64> = split_components(a);
    let right: Vec<u64> = split_components(b);

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

fn split_components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|c| c.trim().parse::<u64>().unwrap_or(0))
        .collect()
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Fetches release tags and publishes a [`VersionState`].
///
/// Advisory only: any transport or parse failure leaves the previously
/// published state unchanged, and the check never blocks polling.
pub struct VersionChecker {
    client: reqwest::Client,
    base_url: String,
    repo: String,
    local_version: String,
    state: watch::Sender<VersionState>,
}

impl VersionChecker {
    /// Creates a checker pointed at the production tags API.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        repo: &str,
        local_version: &str,
    ) -> Result<Self, PollerError> {
        Self::with_base_url(timeout_secs, user_agent, repo, local_version, DEFAULT_BASE_URL)
    }

    /// Creates a checker with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        repo: &str,
        local_version: &str,
        base_url: &str,
    ) -> Result<Self, PollerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Until a check succeeds, the local build is assumed current.
        let (state, _) = watch::channel(VersionState {
            local: local_version.to_string(),
            latest_known: local_version.to_string(),
            is_current: true,
        });

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            local_version: local_version.to_string(),
            state,
        })
    }

    /// Subscribe to published version states.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VersionState> {
        self.state.subscribe()
    }

    /// Fetch the latest published tag and refresh the published state.
    /// Failures are logged and leave the previous state in place.
    pub async fn check(&self) {
        match self.fetch_latest().await {
            Ok(Some(latest)) => {
                let is_current =
                    compare_versions(&self.local_version, &latest) != Ordering::Less;
                if !is_current {
                    tracing::info!(local = %self.local_version, %latest, "newer release available");
                }
                let local = self.local_version.clone();
                self.state.send_replace(VersionState {
                    local,
                    latest_known: latest,
                    is_current,
                });
            }
            Ok(None) => {
                tracing::debug!("no usable release tags published");
            }
            Err(e) => {
                tracing::warn!(error = %e, "version check failed");
            }
        }
    }

    async fn fetch_latest(&self) -> Result<Option<String>, PollerError> {
        let url = format!("{}/repos/{}/tags", self.base_url, self.repo);
        let tags: Vec<Tag> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut names: Vec<String> = tags
            .into_iter()
            .map(|t| t.name)
            .filter(|name| !name.starts_with('v'))
            .collect();
        names.sort_by(|a, b| compare_versions(b, a));

        Ok(names.into_iter().next())
    }
}
