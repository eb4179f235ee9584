use thiserror::Error;

/// Everything that can abort a poll cycle.
///
/// Per-record problems inside a well-formed `stores` array are not errors;
/// the parser drops those records silently. These variants cover failures
/// that invalidate the whole cycle.
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("could not construct request URL: {reason}")]
    Url { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("response is missing expected structure at {path}")]
    UnexpectedStructure { path: &'static str },

    #[error("no stores found for this store and country combination")]
    NoStoresFound,

    #[error("local catalog is unusable: {reason}")]
    InvalidCatalog { reason: String },
}

impl PollerError {
    /// Fixed human-readable message for surfacing in the published error state.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            PollerError::Url { .. } => "Could not build the store availability request.",
            PollerError::Http(_) => "Could not reach the store availability service.",
            PollerError::MalformedJson(_) => {
                "The availability service returned an unreadable response."
            }
            PollerError::UnexpectedStructure { .. } => {
                "The availability service response has changed shape; an update may be required."
            }
            PollerError::NoStoresFound => {
                "No stores were found for this store and country combination."
            }
            PollerError::InvalidCatalog { .. } => {
                "The local product catalog has no entries for this configuration."
            }
        }
    }
}
