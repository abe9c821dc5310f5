use serde::{Deserialize, Serialize};

/// Output document of the `map-config` pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

/// A shipping product and the origins it is sold from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub origins: Vec<ProductOrigin>,
}

impl Product {
    /// Creates a product with an identifier derived from its display name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: product_id(&name),
            name,
            origins: Vec::new(),
        }
    }
}

/// Destinations a product reaches from one origin sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOrigin {
    pub origin_type: String,
    /// Destination column labels marked as available, in column order.
    pub destinations: Vec<String>,
    #[serde(rename = "mapConfig")]
    pub map_config: Vec<DestinConfig>,
}

/// Destination zones priced under one baremo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinConfig {
    pub baremo_code: String,
    pub destin_zones: Vec<String>,
}

/// `"Paq 24 (Hoy)"` becomes `"PAQ_24_HOY"`.
pub fn product_id(name: &str) -> String {
    name.replace(' ', "_")
        .replace(['(', ')'], "")
        .to_uppercase()
}
