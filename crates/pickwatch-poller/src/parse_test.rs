use serde_json::json;

use super::*;

fn wrap_stores(stores: serde_json::Value) -> Vec<u8> {
    json!({
        "body": { "content": { "pickupMessage": { "stores": stores } } }
    })
    .to_string()
    .into_bytes()
}

fn store_json(number: &str, name: &str) -> serde_json::Value {
    json!({
        "storeName": name,
        "storeNumber": number,
        "city": "New York",
        "state": "NY",
        "partsAvailability": {
            "MQ8K3LL/A": {
                "partNumber": "MQ8K3LL/A",
                "storePickupProductTitle": "14 Pro Max 256GB Silver",
                "pickupDisplay": "available"
            }
        }
    })
}

// -----------------------------------------------------------------------
// structural errors
// -----------------------------------------------------------------------

#[test]
fn empty_body_is_malformed_json() {
    let err = parse_fulfillment(b"").unwrap_err();
    assert!(matches!(err, PollerError::MalformedJson(_)));
}

#[test]
fn non_json_body_is_malformed_json() {
    let err = parse_fulfillment(b"<html>rate limited</html>").unwrap_err();
    assert!(matches!(err, PollerError::MalformedJson(_)));
}

#[test]
fn missing_body_key_is_unexpected_structure() {
    let err = parse_fulfillment(br#"{"status": "ok"}"#).unwrap_err();
    assert!(matches!(
        err,
        PollerError::UnexpectedStructure { path: "body" }
    ));
}

#[test]
fn missing_pickup_message_is_unexpected_structure() {
    let body = json!({"body": {"content": {}}}).to_string();
    let err = parse_fulfillment(body.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        PollerError::UnexpectedStructure {
            path: "pickupMessage"
        }
    ));
}

#[test]
fn non_object_level_is_unexpected_structure() {
    let body = json!({"body": {"content": "gone"}}).to_string();
    let err = parse_fulfillment(body.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        PollerError::UnexpectedStructure { path: "content" }
    ));
}

#[test]
fn missing_stores_key_is_no_stores_found() {
    let body = json!({"body": {"content": {"pickupMessage": {}}}}).to_string();
    let err = parse_fulfillment(body.as_bytes()).unwrap_err();
    assert!(matches!(err, PollerError::NoStoresFound));
}

#[test]
fn non_array_stores_is_no_stores_found() {
    let body = json!({"body": {"content": {"pickupMessage": {"stores": "nope"}}}}).to_string();
    let err = parse_fulfillment(body.as_bytes()).unwrap_err();
    assert!(matches!(err, PollerError::NoStoresFound));
}

// -----------------------------------------------------------------------
// store-level tolerance
// -----------------------------------------------------------------------

#[test]
fn empty_stores_array_is_ok_and_empty() {
    let stores = parse_fulfillment(&wrap_stores(json!([]))).unwrap();
    assert!(stores.is_empty());
}

#[test]
fn well_formed_store_parses_fully() {
    let stores = parse_fulfillment(&wrap_stores(json!([store_json("R032", "Fifth Avenue")])))
        .unwrap();
    assert_eq!(stores.len(), 1);
    let store = &stores[0];
    assert_eq!(store.name, "Fifth Avenue");
    assert_eq!(store.store_number, "R032");
    assert_eq!(store.city, "New York");
    assert_eq!(store.state.as_deref(), Some("NY"));
    assert_eq!(store.parts.len(), 1);
    assert_eq!(store.parts[0].part_number, "MQ8K3LL/A");
    assert_eq!(store.parts[0].availability, Availability::Available);
}

#[test]
fn store_missing_city_is_dropped_not_an_error() {
    let mut broken = store_json("R113", "The Grove");
    broken.as_object_mut().unwrap().remove("city");

    let stores = parse_fulfillment(&wrap_stores(json!([
        store_json("R032", "Fifth Avenue"),
        broken,
        store_json("R075", "Michigan Avenue"),
    ])))
    .unwrap();

    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].store_number, "R032");
    assert_eq!(stores[1].store_number, "R075");
}

#[test]
fn store_missing_parts_availability_is_dropped() {
    let mut broken = store_json("R113", "The Grove");
    broken.as_object_mut().unwrap().remove("partsAvailability");

    let stores = parse_fulfillment(&wrap_stores(json!([broken]))).unwrap();
    assert!(stores.is_empty());
}

#[test]
fn store_missing_state_is_kept() {
    let mut store = store_json("R224", "Ginza");
    store.as_object_mut().unwrap().remove("state");

    let stores = parse_fulfillment(&wrap_stores(json!([store]))).unwrap();
    assert_eq!(stores.len(), 1);
    assert!(stores[0].state.is_none());
}

#[test]
fn numeric_store_number_is_accepted() {
    let mut store = store_json("R032", "Fifth Avenue");
    store["storeNumber"] = json!(32);

    let stores = parse_fulfillment(&wrap_stores(json!([store]))).unwrap();
    assert_eq!(stores[0].store_number, "32");
}

#[test]
fn source_order_is_preserved() {
    let stores = parse_fulfillment(&wrap_stores(json!([
        store_json("R075", "Michigan Avenue"),
        store_json("R032", "Fifth Avenue"),
        store_json("R113", "The Grove"),
    ])))
    .unwrap();

    let numbers: Vec<_> = stores.iter().map(|s| s.store_number.as_str()).collect();
    assert_eq!(numbers, vec!["R075", "R032", "R113"]);
}

// -----------------------------------------------------------------------
// part-level tolerance
// -----------------------------------------------------------------------

#[test]
fn part_with_unknown_pickup_display_is_dropped() {
    let mut store = store_json("R032", "Fifth Avenue");
    store["partsAvailability"]["MQ913LL/A"] = json!({
        "partNumber": "MQ913LL/A",
        "storePickupProductTitle": "14 Pro Max 512GB Space Black",
        "pickupDisplay": "mystery"
    });

    let stores = parse_fulfillment(&wrap_stores(json!([store]))).unwrap();
    assert_eq!(stores[0].parts.len(), 1);
    assert_eq!(stores[0].parts[0].part_number, "MQ8K3LL/A");
}

#[test]
fn part_missing_part_number_is_dropped() {
    let mut store = store_json("R032", "Fifth Avenue");
    store["partsAvailability"]["broken"] = json!({
        "storePickupProductTitle": "Mystery Device",
        "pickupDisplay": "available"
    });

    let stores = parse_fulfillment(&wrap_stores(json!([store]))).unwrap();
    assert_eq!(stores[0].parts.len(), 1);
}

#[test]
fn part_missing_title_is_dropped_store_survives() {
    let mut store = store_json("R032", "Fifth Avenue");
    store["partsAvailability"] = json!({
        "only": {
            "partNumber": "MQ913LL/A",
            "pickupDisplay": "available"
        }
    });

    let stores = parse_fulfillment(&wrap_stores(json!([store]))).unwrap();
    assert_eq!(stores.len(), 1);
    assert!(stores[0].parts.is_empty());
}

#[test]
fn unavailable_and_ineligible_parse_as_such() {
    let mut store = store_json("R032", "Fifth Avenue");
    store["partsAvailability"] = json!({
        "a": {
            "partNumber": "A",
            "storePickupProductTitle": "Model A",
            "pickupDisplay": "unavailable"
        },
        "b": {
            "partNumber": "B",
            "storePickupProductTitle": "Model B",
            "pickupDisplay": "ineligible"
        }
    });

    let stores = parse_fulfillment(&wrap_stores(json!([store]))).unwrap();
    let mut kinds: Vec<_> = stores[0].parts.iter().map(|p| p.availability).collect();
    kinds.sort_by_key(|a| format!("{a:?}"));
    assert_eq!(
        kinds,
        vec![Availability::Ineligible, Availability::Unavailable]
    );
}
