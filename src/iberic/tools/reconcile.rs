//! Reconciliation of workbook zones against the zones drawn on the map.
//!
//! Every map element yields one master record keyed by its `svg_id`,
//! matched against the workbook either directly or through the
//! [`AliasTable`]. Workbook zones that no map element claimed are appended
//! afterwards as `excel_only`.

use std::fmt::Write;

use tracing::{debug, info, instrument};

use crate::iberic::tools::model::{
    AliasTable, MapZoneRecord, MapZoneTable, MasterZoneRecord, StatusSummary, ZoneRecord,
    ZoneStatus, ZoneTable, ZonesMaster,
};

const SVG_ONLY_REASON: &str = "zone has no data in spreadsheet";
const EXCEL_ONLY_REASON: &str = "zone not present in map (not renderable)";

/// Builds the master zone table from both sources.
///
/// Workbook codes that are the target of any alias entry are never emitted
/// as `excel_only`, whether or not a map element actually resolved to them.
#[instrument(
    level = "info",
    skip_all,
    fields(excel_zones = excel.len(), svg_zones = svg.len(), aliases = aliases.len())
)]
pub fn reconcile(excel: &ZoneTable, svg: &MapZoneTable, aliases: &AliasTable) -> ZonesMaster {
    let mut master = ZonesMaster::with_capacity(svg.len() + excel.len());

    for (svg_id, map_zone) in svg {
        let record = match excel.get(svg_id) {
            Some(zone) => matched(zone, map_zone, ZoneStatus::Ok, None),
            None => match aliases
                .spreadsheet_code(svg_id)
                .and_then(|code| excel.get_key_value(code))
            {
                Some((code, zone)) => matched(zone, map_zone, ZoneStatus::Warning, Some(code)),
                None => svg_only(map_zone),
            },
        };
        debug!(zone_code = %svg_id, status = %record.status, "classified map zone");
        master.insert(svg_id.clone(), record);
    }

    for (code, zone) in excel {
        if aliases.is_alias_target(code) || master.contains_key(code) {
            continue;
        }
        master.insert(code.clone(), excel_only(code, zone));
    }

    info!(zone_count = master.len(), "reconciled zones master");
    master
}

/// Records that need a manual look, in master order.
pub fn warnings(master: &ZonesMaster) -> impl Iterator<Item = &MasterZoneRecord> {
    master
        .values()
        .filter(|record| record.status.needs_review())
}

/// Human-readable run summary: totals, per-status counts and the zones that
/// need review with their reasons.
pub fn summary_report(master: &ZonesMaster) -> String {
    let summary = StatusSummary::from_master(master);
    let mut report = String::new();
    let _ = writeln!(report, "Total zones in master: {}", summary.total);
    let _ = writeln!(report, "Status breakdown:");
    for (status, count) in &summary.counts {
        let _ = writeln!(report, "  - {status}: {count}");
    }

    let flagged: Vec<&MasterZoneRecord> = warnings(master).collect();
    if !flagged.is_empty() {
        let _ = writeln!(report, "{} zones with warnings:", flagged.len());
        for zone in flagged {
            let reason = zone.warning_reason.as_deref().unwrap_or_default();
            let _ = writeln!(report, "  - {}: {reason}", zone.zone_code);
        }
    }

    let unrenderable = summary.count(ZoneStatus::ExcelOnly);
    if unrenderable > 0 {
        let _ = writeln!(
            report,
            "{unrenderable} spreadsheet zones cannot be drawn on the map"
        );
    }
    report
}

fn matched(
    zone: &ZoneRecord,
    map_zone: &MapZoneRecord,
    status: ZoneStatus,
    alias_target: Option<&String>,
) -> MasterZoneRecord {
    MasterZoneRecord {
        zone_code: map_zone.svg_id.clone(),
        zone_name: zone.zone_name.to_uppercase(),
        country_code: zone.country_code.clone(),
        zone_ccaa: zone.zone_ccaa.clone(),
        zone_group: zone.zone_group.clone(),
        zone_expreg: zone.zone_expreg.clone(),
        in_svg: true,
        svg_id: Some(map_zone.svg_id.clone()),
        svg_name: Some(map_zone.svg_name.clone()),
        status,
        warning_reason: alias_target
            .map(|code| format!("code inconsistent with spreadsheet ({code})")),
        excel_equivalent: alias_target.cloned(),
    }
}

fn svg_only(map_zone: &MapZoneRecord) -> MasterZoneRecord {
    MasterZoneRecord {
        zone_code: map_zone.svg_id.clone(),
        zone_name: map_zone.svg_name.to_uppercase(),
        country_code: map_zone.country_code().to_string(),
        zone_ccaa: String::new(),
        zone_group: String::new(),
        zone_expreg: String::new(),
        in_svg: true,
        svg_id: Some(map_zone.svg_id.clone()),
        svg_name: Some(map_zone.svg_name.clone()),
        status: ZoneStatus::SvgOnly,
        warning_reason: Some(SVG_ONLY_REASON.to_string()),
        excel_equivalent: None,
    }
}

fn excel_only(code: &str, zone: &ZoneRecord) -> MasterZoneRecord {
    MasterZoneRecord {
        zone_code: code.to_string(),
        zone_name: zone.zone_name.to_uppercase(),
        country_code: zone.country_code.clone(),
        zone_ccaa: zone.zone_ccaa.clone(),
        zone_group: zone.zone_group.clone(),
        zone_expreg: zone.zone_expreg.clone(),
        in_svg: false,
        svg_id: None,
        svg_name: None,
        status: ZoneStatus::ExcelOnly,
        warning_reason: Some(EXCEL_ONLY_REASON.to_string()),
        excel_equivalent: None,
    }
}
