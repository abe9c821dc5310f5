use std::path::Path;

use tracing::{info, instrument, warn};

use crate::iberic::tools::error::Result;
use crate::iberic::tools::io::excel_read::{self, SheetRow};
use crate::iberic::tools::io::json_write::write_json;
use crate::iberic::tools::io::svg_read;
use crate::iberic::tools::model::products::ProductCatalog;
use crate::iberic::tools::model::{AliasTable, ZonesMaster};
use crate::iberic::tools::products::{self, DestinationCatalog, ORIGIN_SHEETS};
use crate::iberic::tools::reconcile;

/// Column names the zone dump reports as row identifiers.
const ID_COLUMNS: [&str; 3] = ["id", "zone_id", "ID"];

/// Reconciles the zones sheet of `excel` against the map at `svg` and writes
/// the master table to `output`. Both inputs are loaded before anything is
/// written.
#[instrument(
    level = "info",
    skip_all,
    fields(excel = %excel.display(), svg = %svg.display(), output = %output.display())
)]
pub fn zones_master(
    excel: &Path,
    svg: &Path,
    output: &Path,
    sheet: &str,
    aliases: &AliasTable,
) -> Result<ZonesMaster> {
    let excel_zones = excel_read::read_zone_records(excel, sheet)?;
    let svg_zones = svg_read::read_map_zones(svg)?;
    let master = reconcile::reconcile(&excel_zones, &svg_zones, aliases);

    for record in reconcile::warnings(&master) {
        warn!(
            zone_code = %record.zone_code,
            status = %record.status,
            reason = record.warning_reason.as_deref().unwrap_or_default(),
            "zone needs review"
        );
    }

    write_json(output, &master)?;
    info!(zone_count = master.len(), "wrote zones master");
    Ok(master)
}

/// Dumps every row of the zones sheet as a JSON array.
#[instrument(
    level = "info",
    skip_all,
    fields(excel = %excel.display(), output = %output.display())
)]
pub fn zones_dump(excel: &Path, output: &Path, sheet: &str) -> Result<Vec<SheetRow>> {
    let rows = excel_read::read_sheet_rows(excel, sheet)?;
    let identified = rows
        .iter()
        .filter(|row| {
            ID_COLUMNS
                .iter()
                .any(|column| row.get(*column).is_some_and(|value| !value.is_null()))
        })
        .count();
    info!(row_count = rows.len(), identified, "read zones sheet");

    write_json(output, &rows)?;
    Ok(rows)
}

/// Extracts the product/destination matrix of every origin sheet and writes
/// the resulting catalog to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(excel = %excel.display(), output = %output.display())
)]
pub fn map_config(
    excel: &Path,
    output: &Path,
    catalog: &DestinationCatalog,
) -> Result<ProductCatalog> {
    let mut workbook = excel_read::open(excel)?;

    let mut origins = Vec::with_capacity(ORIGIN_SHEETS.len());
    for (origin_type, sheet) in ORIGIN_SHEETS {
        let range = excel_read::read_required_sheet(&mut workbook, sheet)?;
        origins.push((origin_type, products::extract_sheet_products(&range)));
    }

    let product_catalog = products::build_catalog(origins, catalog);
    write_json(output, &product_catalog)?;
    info!(
        product_count = product_catalog.products.len(),
        "wrote product map configuration"
    );
    Ok(product_catalog)
}
