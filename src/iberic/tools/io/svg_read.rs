use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::iberic::tools::error::{Result, ToolError};
use crate::iberic::tools::model::{MapZoneRecord, MapZoneTable};

/// An `id` attribute followed, within the same tag, by a `data-name`.
static ZONE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)id="([^"]+)"[^>]*?data-name="([^"]*)""#)
        .expect("valid zone element pattern")
});

const ZONE_PREFIXES: [&str; 2] = ["ES-", "PT-"];
const BACKGROUND_PREFIX: &str = "cuadrado_";

/// Reads the SVG map at `path` and collects its zone elements.
#[instrument(level = "info", skip_all, fields(input = %path.display()))]
pub fn read_map_zones(path: &Path) -> Result<MapZoneTable> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let markup = fs::read_to_string(path)?;
    let zones = scan_map_zones(&markup);
    info!(zone_count = zones.len(), "loaded zones from map");
    Ok(zones)
}

/// Scans raw SVG markup for zone declarations in document order. The scan is
/// textual; the markup is never parsed as XML.
pub fn scan_map_zones(markup: &str) -> MapZoneTable {
    let mut zones = MapZoneTable::new();

    for captures in ZONE_ELEMENT.captures_iter(markup) {
        let (_, [svg_id, svg_name]) = captures.extract();
        if !is_zone_id(svg_id) {
            continue;
        }
        if zones.contains_key(svg_id) {
            debug!(svg_id, "duplicate map element replaces earlier one");
        }
        zones.insert(svg_id.to_string(), MapZoneRecord::new(svg_id, svg_name));
    }

    zones
}

fn is_zone_id(id: &str) -> bool {
    !id.starts_with(BACKGROUND_PREFIX) && ZONE_PREFIXES.iter().any(|prefix| id.starts_with(prefix))
}
