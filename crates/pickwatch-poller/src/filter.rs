//! Reduces parsed stores to relevant, in-stock parts.

use std::collections::HashSet;

use crate::types::{Availability, Store};

/// Keep only parts that are available for pickup and, when a preferred set
/// is supplied, whose part number is a member of it. Stores left with no
/// parts are dropped. Store order is preserved.
#[must_use]
pub fn filter_stores(stores: Vec<Store>, preferred: Option<&HashSet<String>>) -> Vec<Store> {
    stores
        .into_iter()
        .filter_map(|mut store| {
            store.parts.retain(|part| {
                part.availability == Availability::Available
                    && preferred.is_none_or(|set| set.contains(&part.part_number))
            });
            if store.parts.is_empty() {
                None
            } else {
                Some(store)
            }
        })
        .collect()
}
