use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::iberic::tools::error::{Result, ToolError};
use crate::iberic::tools::model::{ZoneRecord, ZoneTable};

/// Name of the sheet holding one row per pricing zone.
pub const ZONES_SHEET: &str = "zones";

/// One raw data row of the zones sheet, header → cell value.
pub type SheetRow = IndexMap<String, Value>;

pub type Workbook = Xlsx<BufReader<File>>;

/// Opens an `.xlsx`/`.xlsm` workbook, failing early when the file is missing.
pub fn open(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    Ok(open_workbook(path)?)
}

/// Reads the zone records of `sheet`, keeping only Spanish and Portuguese
/// zones. Later rows with a repeated `zone_code` replace earlier ones.
#[instrument(level = "info", skip_all, fields(input = %path.display(), sheet = %sheet))]
pub fn read_zone_records(path: &Path, sheet: &str) -> Result<ZoneTable> {
    let mut workbook = open(path)?;
    let range = read_required_sheet(&mut workbook, sheet)?;
    let zones = zone_records_from_range(&range)?;
    Ok(zones)
}

/// Reads every data row of `sheet` as a header-keyed object.
#[instrument(level = "info", skip_all, fields(input = %path.display(), sheet = %sheet))]
pub fn read_sheet_rows(path: &Path, sheet: &str) -> Result<Vec<SheetRow>> {
    let mut workbook = open(path)?;
    let range = read_required_sheet(&mut workbook, sheet)?;
    Ok(sheet_rows_from_range(&range))
}

pub fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::MissingSheet {
            sheet: name.to_string(),
            available: workbook.sheet_names().to_vec(),
        })?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

pub(crate) fn zone_records_from_range(range: &Range<DataType>) -> Result<ZoneTable> {
    let headers = header_row(range);
    if !headers.iter().any(|header| header == "zone_code") {
        return Err(ToolError::InvalidWorkbook(
            "zones sheet has no 'zone_code' header".into(),
        ));
    }

    let mut zones = ZoneTable::new();
    for row in range.rows().skip(1) {
        if cell_to_string(row.first()).is_empty() {
            continue;
        }

        let mut fields: IndexMap<&str, String> = IndexMap::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if !header.is_empty() {
                fields.insert(header.as_str(), cell_to_string(Some(cell)));
            }
        }

        let mut take = |name: &str| fields.swap_remove(name).unwrap_or_default();
        let record = ZoneRecord {
            zone_code: take("zone_code"),
            zone_name: take("zone_name"),
            country_code: take("country_code"),
            zone_ccaa: take("zone_ccaa"),
            zone_group: take("zone_group"),
            zone_expreg: take("zone_expreg"),
        };
        if record.zone_code.is_empty() {
            continue;
        }
        if zones.contains_key(&record.zone_code) {
            debug!(zone_code = %record.zone_code, "duplicate zone row replaces earlier one");
        }
        zones.insert(record.zone_code.clone(), record);
    }

    let loaded = zones.len();
    zones.retain(|_, record| record.is_iberian());
    info!(
        zone_count = loaded,
        iberian_count = zones.len(),
        "loaded zones from workbook"
    );
    Ok(zones)
}

pub(crate) fn sheet_rows_from_range(range: &Range<DataType>) -> Vec<SheetRow> {
    let headers = header_row(range);
    let mut rows = Vec::new();

    for row in range.rows().skip(1) {
        if cell_to_string(row.first()).is_empty() {
            continue;
        }
        let entry: SheetRow = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell_to_json(cell)))
            .collect();
        rows.push(entry);
    }

    info!(row_count = rows.len(), "read rows from sheet");
    rows
}

fn header_row(range: &Range<DataType>) -> Vec<String> {
    match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    }
}

pub(crate) fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn cell_to_json(cell: &DataType) -> Value {
    match cell {
        DataType::String(value) => Value::String(value.clone()),
        DataType::Float(value) if is_integral(*value) => Value::from(*value as i64),
        DataType::Float(value) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        DataType::Int(value) => Value::from(*value),
        DataType::Bool(value) => Value::Bool(*value),
        DataType::Empty => Value::Null,
        other => Value::String(other.to_string()),
    }
}

/// Whole numbers within `i64` range; calamine reports every numeric cell as
/// a float.
fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}
