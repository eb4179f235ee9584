//! Fulfillment query construction.

/// Build the query string for the fulfillment endpoint:
/// `parts.<i>=<sku>&...&searchNearby=true&store=<store_number>`.
///
/// `i` is each SKU's zero-based position in the combined list (catalog SKUs
/// followed by the custom SKU, if any). Empty-string entries are skipped but
/// do NOT renumber later entries: the remote API binds the index to a slot,
/// so `["A", "", "B"]` emits `parts.0=A&parts.2=B`.
///
/// An empty SKU list yields just `searchNearby=true&store=<store_number>`.
#[must_use]
pub fn parts_query<'a, I>(ordered_skus: I, custom_sku: Option<&'a str>, store_number: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pairs: Vec<String> = ordered_skus
        .into_iter()
        .chain(custom_sku)
        .enumerate()
        .filter(|(_, sku)| !sku.is_empty())
        .map(|(i, sku)| format!("parts.{i}={sku}"))
        .collect();

    pairs.push("searchNearby=true".to_string());
    pairs.push(format!("store={store_number}"));
    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_catalog_order() {
        let query = parts_query(["A", "B"], None, "R032");
        assert_eq!(query, "parts.0=A&parts.1=B&searchNearby=true&store=R032");
    }

    #[test]
    fn empty_entries_are_skipped_without_renumbering() {
        let query = parts_query(["A", "", "B"], None, "R032");
        assert_eq!(query, "parts.0=A&parts.2=B&searchNearby=true&store=R032");
    }

    #[test]
    fn custom_sku_takes_the_next_slot() {
        let query = parts_query(["A", "B"], Some("C"), "R113");
        assert_eq!(
            query,
            "parts.0=A&parts.1=B&parts.2=C&searchNearby=true&store=R113"
        );
    }

    #[test]
    fn custom_sku_index_counts_skipped_slots() {
        let query = parts_query(["A", ""], Some("C"), "R113");
        assert_eq!(query, "parts.0=A&parts.2=C&searchNearby=true&store=R113");
    }

    #[test]
    fn empty_catalog_yields_minimal_query() {
        let query = parts_query(std::iter::empty(), None, "R032");
        assert_eq!(query, "searchNearby=true&store=R032");
    }

    #[test]
    fn custom_sku_alone_is_slot_zero() {
        let query = parts_query(std::iter::empty(), Some("C"), "R032");
        assert_eq!(query, "parts.0=C&searchNearby=true&store=R032");
    }
}
