//! Notification composition: aggregates a filtered poll result into a
//! one-line summary and decides whether a preferred model was hit.

use std::collections::HashSet;

use pickwatch_core::SkuCatalog;

use crate::types::Store;

/// Fixed summary line for a cycle that found nothing.
pub const NO_INVENTORY: &str = "No Inventory Found";

/// Title used when a preferred (or custom) SKU is in stock.
pub const PREFERRED_TITLE: &str = "Preferred Model Found!";

/// Title used when something is in stock but nothing preferred.
pub const GENERIC_TITLE: &str = "Pickup Available";

/// A `(title, body)` pair handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Delivery capability, implemented by the hosting process (OS notification
/// center, log line, test recorder). The composer never knows who listens.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Aggregated view of one poll result.
#[derive(Debug, Clone)]
pub struct InventorySummary {
    /// `"<name>: <count> found"` fragments joined by `", "`, or
    /// [`NO_INVENTORY`] when nothing qualified.
    pub line: String,
    /// True when any counted SKU is preferred or equals the custom SKU.
    pub preferred_hit: bool,
}

/// Count occurrences per part number across all stores (a SKU present at two
/// stores counts 2) and render the summary line. Counting order is first
/// encounter across the store sequence.
#[must_use]
pub fn summarize(
    stores: &[Store],
    catalog: &SkuCatalog,
    preferred: &HashSet<String>,
    custom_sku: Option<&str>,
    custom_nickname: Option<&str>,
) -> InventorySummary {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for part in stores.iter().flat_map(|s| s.parts.iter()) {
        match counts.iter_mut().find(|(sku, _)| *sku == part.part_number) {
            Some((_, n)) => *n += 1,
            None => counts.push((part.part_number.clone(), 1)),
        }
    }

    if counts.is_empty() {
        return InventorySummary {
            line: NO_INVENTORY.to_string(),
            preferred_hit: false,
        };
    }

    let preferred_hit = counts
        .iter()
        .any(|(sku, _)| preferred.contains(sku) || custom_sku == Some(sku.as_str()));

    let line = counts
        .iter()
        .map(|(sku, count)| {
            let name = display_name(sku, catalog, custom_sku, custom_nickname);
            format!("{name}: {count} found")
        })
        .collect::<Vec<_>>()
        .join(", ");

    InventorySummary {
        line,
        preferred_hit,
    }
}

/// Build the notification for a summary.
#[must_use]
pub fn notification_for(summary: &InventorySummary) -> Notification {
    let title = if summary.preferred_hit {
        PREFERRED_TITLE
    } else {
        GENERIC_TITLE
    };
    Notification {
        title: title.to_string(),
        body: summary.line.clone(),
    }
}

/// Catalog name for a SKU, with custom-SKU labelling and a raw-SKU fallback.
fn display_name(
    sku: &str,
    catalog: &SkuCatalog,
    custom_sku: Option<&str>,
    custom_nickname: Option<&str>,
) -> String {
    if custom_sku == Some(sku) {
        return match custom_nickname {
            Some(nick) => format!("{nick} (custom SKU)"),
            None => format!("{sku} (custom SKU)"),
        };
    }
    catalog
        .name_for(sku)
        .map_or_else(|| sku.to_string(), str::to_string)
}
