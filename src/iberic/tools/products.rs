//! Extraction of the product/destination matrix from the portfolio workbook.
//!
//! Each origin sheet lists products in column F from row 11 onwards and
//! destination categories as column headers on row 6. A mark in a cell means
//! the product ships from that origin to that destination.

use calamine::{DataType, Range};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::iberic::tools::io::excel_read::cell_to_string;
use crate::iberic::tools::model::products::{DestinConfig, Product, ProductCatalog, ProductOrigin};

/// Origin types and the sheets describing them, in processing order.
pub const ORIGIN_SHEETS: [(&str, &str); 4] = [
    ("peninsula", "Origen Península"),
    ("canarias", "Origen Canarias"),
    ("baleares", "Origen Baleares"),
    ("islas_portugal", "Origen Islas Portugal"),
];

/// Zero-based row holding the destination headers.
const HEADER_ROW: u32 = 5;
/// Zero-based row of the first product.
const FIRST_PRODUCT_ROW: u32 = 10;
/// Zero-based column holding product names (column F).
const PRODUCT_NAME_COLUMN: u32 = 5;

const AVAILABLE_MARKS: [&str; 4] = ["☑", "✓", "x", "X"];
const SKIPPED_PRODUCT_PREFIX: &str = "servicios";
const ORIGIN_LABEL_PREFIX: &str = "Origen\n";

/// Destination category → zones and baremo code, per origin type.
#[derive(Debug, Clone)]
pub struct DestinationCatalog {
    zones: IndexMap<&'static str, IndexMap<&'static str, Vec<&'static str>>>,
    baremos: IndexMap<&'static str, &'static str>,
}

impl DestinationCatalog {
    /// Zones covered by `destination` when shipping from `origin_type`.
    pub fn zones(&self, origin_type: &str, destination: &str) -> &[&'static str] {
        self.zones
            .get(origin_type)
            .and_then(|destinations| destinations.get(destination))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Baremo code of a destination label; the `"Origen\n"` prefix some
    /// island sheets carry is ignored.
    pub fn baremo_code(&self, destination: &str) -> &'static str {
        let label = destination
            .strip_prefix(ORIGIN_LABEL_PREFIX)
            .unwrap_or(destination);
        self.baremos.get(label).copied().unwrap_or_default()
    }

    /// Resolves available destinations into map configuration entries.
    /// Destinations with no known zones are left out.
    pub fn map_config(&self, origin_type: &str, destinations: &[String]) -> Vec<DestinConfig> {
        destinations
            .iter()
            .filter_map(|destination| {
                let zones = self.zones(origin_type, destination);
                if zones.is_empty() {
                    return None;
                }
                Some(DestinConfig {
                    baremo_code: self.baremo_code(destination).to_string(),
                    destin_zones: zones.iter().map(|zone| zone.to_string()).collect(),
                })
            })
            .collect()
    }
}

impl Default for DestinationCatalog {
    fn default() -> Self {
        let peninsula = IndexMap::from([
            ("Provincial", vec![]),
            ("Regional", vec![]),
            (
                "Peninsular",
                vec![
                    "ES-A", "ES-AB", "ES-AL", "ES-AV", "ES-B", "ES-BA", "ES-BI", "ES-BU", "ES-C",
                    "ES-CA", "ES-CC", "ES-CO", "ES-CR", "ES-CS", "ES-CU", "ES-GI", "ES-GR",
                    "ES-GU", "ES-H", "ES-HU", "ES-J", "ES-L", "ES-LE", "ES-LO", "ES-LU", "ES-M",
                    "ES-MA", "ES-MU", "ES-NA", "ES-O", "ES-OR", "ES-P", "ES-PO", "ES-S", "ES-SA",
                    "ES-SE", "ES-SG", "ES-SO", "ES-SS", "ES-T", "ES-TE", "ES-TO", "ES-V", "ES-VA",
                    "ES-VI", "ES-Z", "ES-ZA",
                ],
            ),
            ("Peninsular Plus", vec![]),
            (
                "Portugal",
                vec![
                    "PT-AV", "PT-BE", "PT-BG", "PT-BR", "PT-CB", "PT-CO", "PT-EV", "PT-FA",
                    "PT-GU", "PT-LE", "PT-LI", "PT-PA", "PT-PO", "PT-SA", "PT-SE", "PT-VC",
                    "PT-VI", "PT-VR",
                ],
            ),
            ("Isla Mayor", vec!["ES-GC-LA", "ES-TF-TF", "ES-PM-MA", "ES-PM-IB"]),
            (
                "Isla Menor",
                vec![
                    "ES-GC-FU", "ES-GC-LZ", "ES-TF-GO", "ES-TF-HI", "ES-TF-LP", "ES-PM-ME",
                    "ES-PM-FO",
                ],
            ),
            ("InterIslas", vec![]),
            ("Madeira", vec!["PT-MA-MA", "PT-MA-PS"]),
            (
                "Azores",
                vec![
                    "PT-AZ-CO", "PT-AZ-FA", "PT-AZ-FL", "PT-AZ-GR", "PT-AZ-PI", "PT-AZ-SA",
                    "PT-AZ-SJ", "PT-AZ-SM", "PT-AZ-TE",
                ],
            ),
            ("Ceuta / Melilla / Gibraltar / Andorra", vec!["ES-CE", "ES-ML"]),
        ]);
        let canarias = IndexMap::from([
            ("Origen\nIsla Mayor", vec!["ES-GC-LA", "ES-TF-TF"]),
            (
                "Origen\nIsla Menor",
                vec!["ES-GC-FU", "ES-GC-LZ", "ES-TF-GO", "ES-TF-HI", "ES-TF-LP"],
            ),
            ("InterIslas Mayores", vec![]),
            ("InterIslas \nResto de Islas", vec![]),
            ("Misma Isla Mayor", vec![]),
        ]);
        let baleares = IndexMap::from([
            ("Origen\nIsla Mayor", vec!["ES-PM-MA", "ES-PM-IB"]),
            ("Origen\nIsla Menor", vec!["ES-PM-ME", "ES-PM-FO"]),
            ("InterIslas", vec![]),
            ("Misma Isla", vec![]),
        ]);
        let islas_portugal: IndexMap<&str, Vec<&str>> =
            IndexMap::from([("Azores-Madeira / Madeira - Azores", vec![])]);

        let baremos = IndexMap::from([
            ("Provincial", "PRO"),
            ("Regional", "REG"),
            ("Peninsular", "PEN"),
            ("Peninsular Plus", "PEL"),
            ("Portugal", "PTC"),
            ("Isla Mayor", "CAM"),
            ("Isla Menor", "BAM"),
            ("InterIslas", "PEN"),
            ("Madeira", "PTI"),
            ("Azores", "PTI"),
            ("Ceuta / Melilla / Gibraltar / Andorra", "CEU"),
            ("Misma Isla", "PRO"),
            ("Misma Isla Mayor", "PRO"),
        ]);

        Self {
            zones: IndexMap::from([
                ("peninsula", peninsula),
                ("canarias", canarias),
                ("baleares", baleares),
                ("islas_portugal", islas_portugal),
            ]),
            baremos,
        }
    }
}

/// Products found on one origin sheet, with the destinations marked for
/// each, in row order.
pub fn extract_sheet_products(range: &Range<DataType>) -> IndexMap<String, Vec<String>> {
    let mut products: IndexMap<String, Vec<String>> = IndexMap::new();
    let Some((last_row, last_col)) = range.end() else {
        return products;
    };
    let first_col = range.start().map(|(_, col)| col).unwrap_or(0);

    let headers: Vec<(u32, String)> = (first_col..=last_col)
        .filter_map(|col| {
            let header = cell_to_string(range.get_value((HEADER_ROW, col)));
            let header = header.trim();
            (!header.is_empty()).then(|| (col, header.to_string()))
        })
        .collect();
    debug!(header_count = headers.len(), "read destination headers");

    for row in FIRST_PRODUCT_ROW..=last_row {
        let name = cell_to_string(range.get_value((row, PRODUCT_NAME_COLUMN)));
        let name = name.trim();
        if name.is_empty() || name.starts_with(SKIPPED_PRODUCT_PREFIX) {
            continue;
        }

        let destinations = products.entry(name.to_string()).or_default();
        for (col, header) in &headers {
            let mark = cell_to_string(range.get_value((row, *col)));
            if AVAILABLE_MARKS.contains(&mark.trim()) && !destinations.contains(header) {
                destinations.push(header.clone());
            }
        }
    }

    products
}

/// Merges per-origin products into one catalog, keeping first-seen product
/// order across origins.
pub fn build_catalog<'a, I>(origins: I, catalog: &DestinationCatalog) -> ProductCatalog
where
    I: IntoIterator<Item = (&'a str, IndexMap<String, Vec<String>>)>,
{
    let mut products: IndexMap<String, Product> = IndexMap::new();

    for (origin_type, sheet_products) in origins {
        info!(origin_type, product_count = sheet_products.len(), "extracted origin sheet");
        for (name, destinations) in sheet_products {
            let map_config = catalog.map_config(origin_type, &destinations);
            let product = products
                .entry(name.clone())
                .or_insert_with(|| Product::new(name));
            product.origins.push(ProductOrigin {
                origin_type: origin_type.to_string(),
                destinations,
                map_config,
            });
        }
    }

    ProductCatalog {
        products: products.into_values().collect(),
    }
}
