use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::iberic::tools::error::{Result, ToolError};

pub mod products;

/// Zone code such as `ES-M` or `PT-LI`. Kept as a plain string so it can be
/// used directly as a JSON object key.
pub type ZoneCode = String;

/// Zones read from the workbook, keyed by `zone_code` in sheet order.
pub type ZoneTable = IndexMap<ZoneCode, ZoneRecord>;

/// Zones declared in the SVG map, keyed by `svg_id` in document order.
pub type MapZoneTable = IndexMap<ZoneCode, MapZoneRecord>;

/// Reconciled zones keyed by their canonical code.
pub type ZonesMaster = IndexMap<ZoneCode, MasterZoneRecord>;

/// Country prefixes accepted on both sides of the reconciliation.
pub const ACCEPTED_COUNTRIES: [&str; 2] = ["ES", "PT"];

/// One pricing zone row from the `zones` sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub zone_code: ZoneCode,
    pub zone_name: String,
    pub country_code: String,
    pub zone_ccaa: String,
    pub zone_group: String,
    pub zone_expreg: String,
}

impl ZoneRecord {
    /// Whether the record belongs to one of the [`ACCEPTED_COUNTRIES`].
    pub fn is_iberian(&self) -> bool {
        ACCEPTED_COUNTRIES.contains(&self.country_code.as_str())
    }
}

/// A region element declared in the SVG map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapZoneRecord {
    pub svg_id: ZoneCode,
    pub svg_name: String,
}

impl MapZoneRecord {
    pub fn new(svg_id: impl Into<ZoneCode>, svg_name: impl Into<String>) -> Self {
        Self {
            svg_id: svg_id.into(),
            svg_name: svg_name.into(),
        }
    }

    /// Country prefix of the identifier, i.e. everything before the first `-`.
    pub fn country_code(&self) -> &str {
        self.svg_id.split('-').next().unwrap_or_default()
    }
}

/// Classification of a reconciled zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    /// Present in both sources under the same code.
    Ok,
    /// Present in both sources, but matched through the alias table.
    Warning,
    /// Declared in the map with no workbook data.
    SvgOnly,
    /// Present in the workbook but not drawable on the map.
    ExcelOnly,
}

impl ZoneStatus {
    pub const ALL: [ZoneStatus; 4] = [
        ZoneStatus::Ok,
        ZoneStatus::Warning,
        ZoneStatus::SvgOnly,
        ZoneStatus::ExcelOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneStatus::Ok => "ok",
            ZoneStatus::Warning => "warning",
            ZoneStatus::SvgOnly => "svg_only",
            ZoneStatus::ExcelOnly => "excel_only",
        }
    }

    /// Whether the zone needs a manual look before the map can render it.
    pub fn needs_review(self) -> bool {
        matches!(self, ZoneStatus::Warning | ZoneStatus::SvgOnly)
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reconciled, status-annotated view of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterZoneRecord {
    pub zone_code: ZoneCode,
    pub zone_name: String,
    pub country_code: String,
    pub zone_ccaa: String,
    pub zone_group: String,
    pub zone_expreg: String,
    pub in_svg: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_name: Option<String>,
    pub status: ZoneStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_equivalent: Option<ZoneCode>,
}

/// Hand-curated pairs of map codes and the workbook codes used for the same
/// zone. The reverse direction is always derived from the forward entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    forward: IndexMap<ZoneCode, ZoneCode>,
    reverse: IndexMap<ZoneCode, ZoneCode>,
}

impl AliasTable {
    /// Builds a table from `(map_code, spreadsheet_code)` pairs, rejecting
    /// pairs that would make the reverse direction ambiguous.
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ZoneCode>,
        V: Into<ZoneCode>,
    {
        let mut forward: IndexMap<ZoneCode, ZoneCode> = IndexMap::new();
        for (map_code, sheet_code) in pairs {
            let (map_code, sheet_code) = (map_code.into(), sheet_code.into());
            if let Some((other, _)) = forward
                .iter()
                .find(|(key, target)| **target == sheet_code && **key != map_code)
            {
                return Err(ToolError::InvalidAliasTable(format!(
                    "'{map_code}' and '{other}' both map to '{sheet_code}'"
                )));
            }
            forward.insert(map_code, sheet_code);
        }
        Ok(Self::from_forward(forward))
    }

    /// Builds a table without checking that targets are unique. When two map
    /// codes share a target, the reverse direction keeps the last one.
    pub fn from_pairs_unchecked<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ZoneCode>,
        V: Into<ZoneCode>,
    {
        let forward = pairs
            .into_iter()
            .map(|(map_code, sheet_code)| (map_code.into(), sheet_code.into()))
            .collect();
        Self::from_forward(forward)
    }

    fn from_forward(forward: IndexMap<ZoneCode, ZoneCode>) -> Self {
        let reverse = forward
            .iter()
            .map(|(map_code, sheet_code)| (sheet_code.clone(), map_code.clone()))
            .collect();
        Self { forward, reverse }
    }

    /// Workbook code aliased by a map code.
    pub fn spreadsheet_code(&self, map_code: &str) -> Option<&str> {
        self.forward.get(map_code).map(String::as_str)
    }

    /// Map code that aliases a workbook code.
    pub fn map_code(&self, spreadsheet_code: &str) -> Option<&str> {
        self.reverse.get(spreadsheet_code).map(String::as_str)
    }

    /// Whether some forward entry targets `spreadsheet_code`.
    pub fn is_alias_target(&self, spreadsheet_code: &str) -> bool {
        self.reverse.contains_key(spreadsheet_code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward
            .iter()
            .map(|(map_code, sheet_code)| (map_code.as_str(), sheet_code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl Default for AliasTable {
    /// Known mismatches between `iberian_map.svg` and the zones workbook.
    fn default() -> Self {
        Self::from_pairs_unchecked([
            ("ES-AC", "ES-C"),  // A Coruña
            ("ES-ME", "ES-ML"), // Melilla
            ("ES-PA", "ES-P"),  // Palencia
        ])
    }
}

/// Number of master records per status, ordered by status name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub counts: BTreeMap<&'static str, usize>,
}

impl StatusSummary {
    pub fn from_master(master: &ZonesMaster) -> Self {
        let mut counts = BTreeMap::new();
        for record in master.values() {
            *counts.entry(record.status.as_str()).or_insert(0) += 1;
        }
        Self {
            total: master.len(),
            counts,
        }
    }

    pub fn count(&self, status: ZoneStatus) -> usize {
        self.counts.get(status.as_str()).copied().unwrap_or(0)
    }
}
