use std::path::PathBuf;

use clap::{Parser, Subcommand};
use iberic_map_tools::generate;
use iberic_map_tools::io::excel_read::ZONES_SHEET;
use iberic_map_tools::model::AliasTable;
use iberic_map_tools::products::DestinationCatalog;
use iberic_map_tools::reconcile;
use iberic_map_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::ZonesMaster(args) => execute_zones_master(args),
        Command::ZonesDump(args) => execute_zones_dump(args),
        Command::MapConfig(args) => execute_map_config(args),
    }
}

fn execute_zones_master(args: ZonesMasterArgs) -> Result<()> {
    let master = generate::zones_master(
        &args.excel,
        &args.svg,
        &args.output,
        &args.sheet,
        &AliasTable::default(),
    )?;

    print!("{}", reconcile::summary_report(&master));
    println!("Saved to {}", args.output.display());
    Ok(())
}

fn execute_zones_dump(args: ZonesDumpArgs) -> Result<()> {
    let rows = generate::zones_dump(&args.excel, &args.output, &args.sheet)?;
    println!("Total zones found: {}", rows.len());
    println!("Saved to {}", args.output.display());
    Ok(())
}

fn execute_map_config(args: MapConfigArgs) -> Result<()> {
    let catalog = generate::map_config(&args.excel, &args.output, &DestinationCatalog::default())?;
    println!("Generated {}", args.output.display());
    println!("Total products: {}", catalog.products.len());
    for product in catalog.products.iter().take(10) {
        println!("  - {} ({} origins)", product.name, product.origins.len());
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate the Iberian map data files from the pricing workbook and SVG map."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile workbook zones with the zones drawn on the SVG map.
    ZonesMaster(ZonesMasterArgs),
    /// Dump every row of the zones sheet to JSON.
    ZonesDump(ZonesDumpArgs),
    /// Extract the product/destination matrix from the portfolio workbook.
    MapConfig(MapConfigArgs),
}

#[derive(clap::Args)]
struct ZonesMasterArgs {
    /// Workbook holding the zones sheet.
    #[arg(long, default_value = "customIbericMap_v28.xlsm")]
    excel: PathBuf,

    /// SVG map declaring the zone elements.
    #[arg(long, default_value = "public/assets/iberian_map.svg")]
    svg: PathBuf,

    /// Output file path.
    #[arg(long, default_value = "public/data/zones-master.json")]
    output: PathBuf,

    /// Name of the zones sheet.
    #[arg(long, default_value = ZONES_SHEET)]
    sheet: String,
}

#[derive(clap::Args)]
struct ZonesDumpArgs {
    /// Workbook holding the zones sheet.
    #[arg(long, default_value = "customIbericMap_v28.xlsm")]
    excel: PathBuf,

    /// Output file path.
    #[arg(long, default_value = "scripts/zones_from_excel.json")]
    output: PathBuf,

    /// Name of the zones sheet.
    #[arg(long, default_value = ZONES_SHEET)]
    sheet: String,
}

#[derive(clap::Args)]
struct MapConfigArgs {
    /// Portfolio workbook with one sheet per origin.
    #[arg(long, default_value = "Portfolio ES-PT- IBÉRICO 24.09.2025 (v12).xlsx")]
    excel: PathBuf,

    /// Output file path.
    #[arg(long, default_value = "scripts/map-config-extracted.json")]
    output: PathBuf,
}
