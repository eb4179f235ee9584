//! Fulfillment response parsing.
//!
//! Strict above the `stores` array — a missing or malformed level there means
//! the API shape changed (or the store/country pair has no data) and the whole
//! cycle fails with a distinct error kind. Tolerant below it: any store or
//! part record missing required fields is silently dropped.

use serde_json::Value;

use crate::error::PollerError;
use crate::types::{Availability, PartAvailability, Store};

/// Parse raw fulfillment response bytes into stores, in source order.
///
/// # Errors
///
/// - [`PollerError::MalformedJson`] — body is empty or not valid JSON.
/// - [`PollerError::UnexpectedStructure`] — JSON parses but the nested
///   `body.content.pickupMessage` path is missing or not an object.
/// - [`PollerError::NoStoresFound`] — `pickupMessage` is present but carries
///   no `stores` list.
pub fn parse_fulfillment(body: &[u8]) -> Result<Vec<Store>, PollerError> {
    let root: Value = serde_json::from_slice(body).map_err(PollerError::MalformedJson)?;

    let pickup_message = require_object(&root, "body")
        .and_then(|b| require_object(b, "content"))
        .and_then(|c| require_object(c, "pickupMessage"))?;

    // An empty array is a valid shape with zero stores; a missing or
    // non-array value means the endpoint knows nothing for this query.
    let stores = pickup_message
        .get("stores")
        .and_then(Value::as_array)
        .ok_or(PollerError::NoStoresFound)?;

    Ok(stores.iter().filter_map(map_store).collect())
}

fn require_object<'a>(parent: &'a Value, key: &'static str) -> Result<&'a Value, PollerError> {
    parent
        .get(key)
        .filter(|v| v.is_object())
        .ok_or(PollerError::UnexpectedStructure { path: key })
}

fn map_store(store: &Value) -> Option<Store> {
    let name = non_empty_str(store.get("storeName")?)?;
    let store_number = value_as_string(store.get("storeNumber")?)?;
    let city = non_empty_str(store.get("city")?)?;
    let state = store.get("state").and_then(non_empty_str);

    let parts_availability = store.get("partsAvailability")?.as_object()?;
    let parts = parts_availability.values().filter_map(map_part).collect();

    Some(Store {
        name,
        store_number,
        city,
        state,
        parts,
    })
}

fn map_part(part: &Value) -> Option<PartAvailability> {
    let part_number = value_as_string(part.get("partNumber")?)?;
    let title = non_empty_str(part.get("storePickupProductTitle")?)?;
    let availability = part
        .get("pickupDisplay")
        .and_then(Value::as_str)
        .and_then(Availability::from_pickup_display)?;

    Some(PartAvailability {
        part_number,
        title,
        availability,
    })
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn value_as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string).or_else(|| {
        if value.is_number() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
