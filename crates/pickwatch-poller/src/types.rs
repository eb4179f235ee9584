//! Domain types for pickup availability polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tri-state pickup availability for one SKU at one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
    Ineligible,
}

impl Availability {
    /// Map the wire `pickupDisplay` value. Unknown values are a parse miss,
    /// not an error; the caller drops the part.
    #[must_use]
    pub fn from_pickup_display(raw: &str) -> Option<Self> {
        match raw {
            "available" => Some(Availability::Available),
            "unavailable" => Some(Availability::Unavailable),
            "ineligible" => Some(Availability::Ineligible),
            _ => None,
        }
    }
}

/// One SKU's pickup status at a store. `part_number` is the natural key
/// within a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartAvailability {
    pub part_number: String,
    pub title: String,
    pub availability: Availability,
}

/// A store as reported by the fulfillment endpoint, with its per-SKU
/// availability records in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub store_number: String,
    pub city: String,
    pub state: Option<String>,
    pub parts: Vec<PartAvailability>,
}

/// Outcome of one successful poll cycle. Replaced wholesale each cycle,
/// never merged with the previous result. Only stores with at least one
/// qualifying part are retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResult {
    pub checked_at: DateTime<Utc>,
    pub stores: Vec<Store>,
}

/// The published snapshot observers subscribe to.
///
/// A failed cycle sets `error` but leaves `result` untouched — stale data
/// is preferred over blanking the display.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    pub loading: bool,
    pub result: Option<PollResult>,
    pub error: Option<String>,
}

/// Where the local build stands relative to published release tags.
#[derive(Debug, Clone)]
pub struct VersionState {
    pub local: String,
    pub latest_known: String,
    pub is_current: bool,
}
