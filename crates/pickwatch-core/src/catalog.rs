use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Product family whose SKU table is polled.
///
/// An explicit enum keeps SKU-list selection a plain match instead of
/// key-by-name lookups scattered through the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductLine {
    Phone,
    Tablet,
    Laptop,
    Watch,
}

impl std::fmt::Display for ProductLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductLine::Phone => write!(f, "phone"),
            ProductLine::Tablet => write!(f, "tablet"),
            ProductLine::Laptop => write!(f, "laptop"),
            ProductLine::Watch => write!(f, "watch"),
        }
    }
}

impl std::str::FromStr for ProductLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phone" => Ok(ProductLine::Phone),
            "tablet" => Ok(ProductLine::Tablet),
            "laptop" => Ok(ProductLine::Laptop),
            "watch" => Ok(ProductLine::Watch),
            other => Err(format!(
                "unknown product line '{other}'; expected phone, tablet, laptop, or watch"
            )),
        }
    }
}

/// One catalog row: a queryable SKU and its human-readable product name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuEntry {
    pub sku: String,
    pub name: String,
}

/// A retail store known to carry the catalog's products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    pub store_number: String,
    pub name: String,
    pub city: String,
}

/// Per-country slice of the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCatalog {
    pub stores: Vec<StoreEntry>,
    /// SKU tables keyed by product line. List order is significant: it fixes
    /// each SKU's positional index in the pickup query.
    pub product_lines: BTreeMap<ProductLine, Vec<SkuEntry>>,
}

/// The whole static catalog, loaded once at startup and treated as immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub countries: BTreeMap<String, CountryCatalog>,
}

/// Ordered SKU table for one (country, product line) pair.
///
/// Order is preserved end-to-end from the YAML file because it defines the
/// query's positional index.
#[derive(Debug, Clone)]
pub struct SkuCatalog {
    entries: Vec<SkuEntry>,
}

impl SkuCatalog {
    #[must_use]
    pub fn new(entries: Vec<SkuEntry>) -> Self {
        Self { entries }
    }

    /// SKUs in catalog order.
    pub fn ordered_skus(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.sku.as_str())
    }

    /// Product name for a SKU, if the catalog knows it.
    #[must_use]
    pub fn name_for(&self, sku: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.sku == sku)
            .map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl CatalogFile {
    /// SKU table for a country and product line, or `None` if the catalog
    /// has no entry for the pair.
    #[must_use]
    pub fn sku_catalog(&self, country: &str, line: ProductLine) -> Option<SkuCatalog> {
        self.countries
            .get(country)
            .and_then(|c| c.product_lines.get(&line))
            .map(|entries| SkuCatalog::new(entries.clone()))
    }

    /// Stores listed for a country.
    #[must_use]
    pub fn stores(&self, country: &str) -> &[StoreEntry] {
        self.countries
            .get(country)
            .map_or(&[], |c| c.stores.as_slice())
    }
}

/// Load and validate the static catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    if catalog.countries.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must list at least one country".to_string(),
        ));
    }

    for (country, entry) in &catalog.countries {
        if country.trim().is_empty() {
            return Err(ConfigError::Validation(
                "country code must be non-empty".to_string(),
            ));
        }

        let mut seen_stores = HashSet::new();
        for store in &entry.stores {
            if store.store_number.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "country '{country}' has a store with an empty store number"
                )));
            }
            if !seen_stores.insert(store.store_number.clone()) {
                return Err(ConfigError::Validation(format!(
                    "country '{country}' lists store '{}' twice",
                    store.store_number
                )));
            }
        }

        for (line, skus) in &entry.product_lines {
            let mut seen_skus = HashSet::new();
            for sku_entry in skus {
                if sku_entry.sku.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "country '{country}' line '{line}' has an entry with an empty SKU"
                    )));
                }
                if !seen_skus.insert(sku_entry.sku.clone()) {
                    return Err(ConfigError::Validation(format!(
                        "country '{country}' line '{line}' lists SKU '{}' twice",
                        sku_entry.sku
                    )));
                }
            }
        }
    }

    Ok(())
}
