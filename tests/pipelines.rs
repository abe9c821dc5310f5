use std::fs;
use std::path::Path;

use iberic_map_tools::ToolError;
use iberic_map_tools::generate;
use iberic_map_tools::model::{AliasTable, ZoneStatus};
use iberic_map_tools::products::{DestinationCatalog, ORIGIN_SHEETS};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

const ZONE_HEADERS: [&str; 6] = [
    "zone_code",
    "zone_name",
    "country_code",
    "zone_ccaa",
    "zone_group",
    "zone_expreg",
];

const MAP_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <rect id="cuadrado_canarias" data-name="Canarias box" x="0" y="0"/>
  <path id="ES-M" data-name="Madrid" d="M10 10"/>
  <path id="ES-AC" class="zone" data-name="A Coruña" d="M20 20"/>
  <path id="ES-ZZ" data-name="Zeta" d="M30 30"/>
  <path id="PT-LI" data-name="Lisboa" d="M40 40"/>
  <path id="AD-AD" data-name="Andorra" d="M50 50"/>
</svg>"#;

fn write_zones_workbook(path: &Path, sheet_name: &str, rows: &[[&str; 6]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).expect("sheet named");
    for (col_idx, header) in ZONE_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *header)
            .expect("header written");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                worksheet
                    .write_string((row_idx + 1) as u32, col_idx as u16, *cell)
                    .expect("cell written");
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

fn zone_rows() -> Vec<[&'static str; 6]> {
    vec![
        ["ES-M", "Madrid", "ES", "Madrid", "Centro", "R1"],
        ["ES-C", "A Coruña", "ES", "Galicia", "Norte", "R2"],
        ["ES-XX", "Equis", "ES", "", "", ""],
        ["PT-LI", "Lisboa", "PT", "", "Portugal", ""],
        ["FR-75", "Paris", "FR", "", "", ""],
        ["ES-ML", "Melilla", "ES", "Melilla", "", ""],
    ]
}

#[test]
fn zones_master_classifies_every_zone() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("zones.xlsx");
    let svg_path = temp_dir.path().join("map.svg");
    let output_path = temp_dir.path().join("public/data/zones-master.json");
    write_zones_workbook(&xlsx_path, "zones", &zone_rows());
    fs::write(&svg_path, MAP_SVG).expect("SVG written");

    let master = generate::zones_master(
        &xlsx_path,
        &svg_path,
        &output_path,
        "zones",
        &AliasTable::default(),
    )
    .expect("zones master generated");

    let keys: Vec<&str> = master.keys().map(String::as_str).collect();
    assert_eq!(keys, ["ES-M", "ES-AC", "ES-ZZ", "PT-LI", "ES-XX"]);
    assert_eq!(master["ES-M"].status, ZoneStatus::Ok);
    assert_eq!(master["ES-AC"].status, ZoneStatus::Warning);
    assert_eq!(master["ES-AC"].excel_equivalent.as_deref(), Some("ES-C"));
    assert_eq!(master["ES-AC"].zone_ccaa, "Galicia");
    assert_eq!(master["ES-ZZ"].status, ZoneStatus::SvgOnly);
    assert_eq!(master["ES-XX"].status, ZoneStatus::ExcelOnly);
    assert!(!master.contains_key("FR-75"));
    assert!(!master.contains_key("ES-ML"));

    let written = fs::read_to_string(&output_path).expect("output read");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("JSON parsed");
    assert_eq!(parsed["ES-AC"]["status"], "warning");
    assert_eq!(parsed["ES-AC"]["zone_name"], "A CORUÑA");
    assert_eq!(parsed["ES-XX"]["in_svg"], false);
    assert!(parsed["ES-M"].get("warning_reason").is_none());
    assert!(written.contains("A Coruña"));
}

#[test]
fn zones_master_is_byte_identical_across_runs() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("zones.xlsx");
    let svg_path = temp_dir.path().join("map.svg");
    write_zones_workbook(&xlsx_path, "zones", &zone_rows());
    fs::write(&svg_path, MAP_SVG).expect("SVG written");

    let first_path = temp_dir.path().join("first.json");
    let second_path = temp_dir.path().join("second.json");
    for output in [&first_path, &second_path] {
        generate::zones_master(&xlsx_path, &svg_path, output, "zones", &AliasTable::default())
            .expect("zones master generated");
    }

    let first = fs::read(&first_path).expect("first output read");
    let second = fs::read(&second_path).expect("second output read");
    assert_eq!(first, second);
}

#[test]
fn missing_zones_sheet_aborts_without_output() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("zones.xlsx");
    let svg_path = temp_dir.path().join("map.svg");
    let output_path = temp_dir.path().join("zones-master.json");
    write_zones_workbook(&xlsx_path, "zonas", &zone_rows());
    fs::write(&svg_path, MAP_SVG).expect("SVG written");

    let error = generate::zones_master(
        &xlsx_path,
        &svg_path,
        &output_path,
        "zones",
        &AliasTable::default(),
    )
    .expect_err("missing sheet rejected");

    match error {
        ToolError::MissingSheet { sheet, available } => {
            assert_eq!(sheet, "zones");
            assert_eq!(available, ["zonas"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output_path.exists());
}

#[test]
fn missing_svg_aborts_without_output() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("zones.xlsx");
    let output_path = temp_dir.path().join("zones-master.json");
    write_zones_workbook(&xlsx_path, "zones", &zone_rows());

    let error = generate::zones_master(
        &xlsx_path,
        &temp_dir.path().join("absent.svg"),
        &output_path,
        "zones",
        &AliasTable::default(),
    )
    .expect_err("missing SVG rejected");

    assert!(matches!(error, ToolError::MissingInput(_)));
    assert!(!output_path.exists());
}

#[test]
fn zones_dump_keeps_every_country() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("zones.xlsx");
    let output_path = temp_dir.path().join("zones_from_excel.json");
    write_zones_workbook(&xlsx_path, "zones", &zone_rows());

    let rows = generate::zones_dump(&xlsx_path, &output_path, "zones").expect("zones dumped");
    assert_eq!(rows.len(), 6);

    let written = fs::read_to_string(&output_path).expect("output read");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("JSON parsed");
    let entries = parsed.as_array().expect("array output");
    assert_eq!(entries[4]["country_code"], "FR");
    assert_eq!(entries[2]["zone_ccaa"], serde_json::Value::Null);
}

fn write_portfolio_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    for (origin_type, sheet_name) in ORIGIN_SHEETS {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).expect("sheet named");
        let headers: &[&str] = match origin_type {
            "peninsula" => &["Peninsular", "Portugal", "Madeira"],
            "canarias" => &["Origen\nIsla Mayor", "InterIslas Mayores"],
            _ => &["InterIslas"],
        };
        for (offset, header) in headers.iter().enumerate() {
            worksheet
                .write_string(5, 7 + offset as u16, *header)
                .expect("header written");
        }
        worksheet.write_string(10, 5, "Paq 24 (Hoy)").expect("product written");
        worksheet.write_string(10, 7, "☑").expect("mark written");
        worksheet.write_string(11, 5, "servicios adicionales").expect("row written");
        worksheet.write_string(11, 7, "X").expect("mark written");
        if origin_type == "peninsula" {
            worksheet.write_string(12, 5, "Paq 72").expect("product written");
            worksheet.write_string(12, 8, "x").expect("mark written");
            worksheet.write_string(12, 9, "✓").expect("mark written");
        }
    }
    workbook.save(path).expect("workbook saved");
}

#[test]
fn map_config_merges_products_across_origins() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("portfolio.xlsx");
    let output_path = temp_dir.path().join("map-config-extracted.json");
    write_portfolio_workbook(&xlsx_path);

    let catalog =
        generate::map_config(&xlsx_path, &output_path, &DestinationCatalog::default())
            .expect("map config generated");

    let ids: Vec<&str> = catalog.products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["PAQ_24_HOY", "PAQ_72"]);

    let express = &catalog.products[0];
    assert_eq!(express.origins.len(), 4);
    assert_eq!(express.origins[0].destinations, ["Peninsular"]);
    assert_eq!(express.origins[0].map_config[0].baremo_code, "PEN");
    assert_eq!(express.origins[1].map_config[0].baremo_code, "CAM");
    assert!(express.origins[3].map_config.is_empty());

    let economy = &catalog.products[1];
    assert_eq!(economy.origins.len(), 1);
    assert_eq!(economy.origins[0].destinations, ["Portugal", "Madeira"]);

    let written = fs::read_to_string(&output_path).expect("output read");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("JSON parsed");
    assert_eq!(parsed["products"][0]["origins"][0]["mapConfig"][0]["baremo_code"], "PEN");
}

#[test]
fn map_config_requires_every_origin_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("portfolio.xlsx");
    let output_path = temp_dir.path().join("map-config.json");
    write_zones_workbook(&xlsx_path, "Origen Península", &[]);

    let error = generate::map_config(&xlsx_path, &output_path, &DestinationCatalog::default())
        .expect_err("missing origin sheet rejected");

    assert!(matches!(error, ToolError::MissingSheet { ref sheet, .. } if sheet == "Origen Canarias"));
    assert!(!output_path.exists());
}

#[test]
fn zones_dump_writes_whole_numbers_as_integers() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("zones.xlsx");
    let output_path = temp_dir.path().join("zones_from_excel.json");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("zones").expect("sheet named");
    for (col_idx, header) in ["zone_code", "id", "surcharge"].iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *header)
            .expect("header written");
    }
    worksheet.write_string(1, 0, "ES-M").expect("code written");
    worksheet.write_number(1, 1, 28.0).expect("id written");
    worksheet.write_number(1, 2, 1.5).expect("surcharge written");
    workbook.save(&xlsx_path).expect("workbook saved");

    generate::zones_dump(&xlsx_path, &output_path, "zones").expect("zones dumped");

    let written = fs::read_to_string(&output_path).expect("output read");
    assert!(written.contains("\"id\": 28,"), "{written}");
    assert!(written.contains("\"surcharge\": 1.5"), "{written}");
}
