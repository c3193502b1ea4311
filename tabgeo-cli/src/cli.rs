//! Définition et implémentation des commandes CLI
//!
//! - `convert`: CSV → GeoJSON (X/Y ou WKT, reprojection EPSG)
//! - `crs`: liste des CRS courants

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use tabgeo::detect::{detect_wkt_column, detect_xy_columns};
use tabgeo::reproject::SmartRegistry;
use tabgeo::{BuildError, ConversionConfig, Crs, GeometryMode, RecordSet};
use tracing::info;

use crate::input::{parse_delimiter, read_csv};
use crate::report::ConversionReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV table to GeoJSON (EPSG:4326)
    Convert(ConvertArgs),

    /// List common coordinate reference systems
    Crs,
}

/// Mode de construction des géométries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Points from X/Y columns
    Xy,
    /// Points, lines or polygons from a WKT column
    Wkt,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input CSV file (with header row)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON config file (flags override its values)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Geometry source (défaut : xy)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// X / Longitude / Easting column (auto-detected if omitted)
    #[arg(long)]
    pub x_column: Option<String>,

    /// Y / Latitude / Northing column (auto-detected if omitted)
    #[arg(long)]
    pub y_column: Option<String>,

    /// WKT geometry column (auto-detected if omitted)
    #[arg(long)]
    pub wkt_column: Option<String>,

    /// Input CRS EPSG code (défaut : 4326)
    #[arg(long, env = "TABGEO_SOURCE_EPSG")]
    pub source_epsg: Option<u32>,

    /// Output CRS EPSG code (défaut : 4326)
    #[arg(long, env = "TABGEO_TARGET_EPSG")]
    pub target_epsg: Option<u32>,

    /// CSV delimiter (single character or 'tab')
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Keep the geometry source columns as properties
    #[arg(long)]
    pub keep_source_columns: bool,

    /// Write a JSON conversion report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Fail when no row produces a geometry
    #[arg(long)]
    pub strict: bool,
}

/// Exécute la commande convert
pub fn cmd_convert(args: &ConvertArgs) -> Result<ConversionReport> {
    let start = Instant::now();
    info!(
        "Convert: input={}, output={}",
        args.input.display(),
        args.output.display()
    );

    let records = read_csv(&args.input, args.delimiter)?;
    if records.is_empty() {
        bail!("No data found in {}", args.input.display());
    }
    info!(
        "Loaded {} rows, {} columns",
        records.len(),
        records.columns().len()
    );

    let base = args
        .config
        .as_deref()
        .map(ConversionConfig::load)
        .transpose()
        .context("Failed to load config file")?;
    let config = resolve_config(args, base, &records)?;

    info!(
        mode = ?config.mode,
        backend = SmartRegistry::description(config.source_crs(), Crs::WGS84),
        "EPSG:{} -> EPSG:{}",
        config.source_epsg,
        config.target_epsg
    );

    let conversion = tabgeo::convert(&records, &config)?;
    if args.strict && conversion.feature_count() == 0 {
        return Err(BuildError::EmptyResult {
            input_rows: conversion.input_rows,
        }
        .into());
    }

    write_output(&args.output, &conversion.geojson)?;

    let report = ConversionReport::new(
        &args.input,
        &args.output,
        config.source_epsg,
        config.target_epsg,
        &conversion,
        start.elapsed(),
    );
    report.print_summary();
    if let Some(path) = &args.report {
        report.save_json(path)?;
    }

    Ok(report)
}

/// Fusionne fichier de config, flags et détection automatique des colonnes
pub fn resolve_config(
    args: &ConvertArgs,
    base: Option<ConversionConfig>,
    records: &RecordSet,
) -> Result<ConversionConfig> {
    let base_mode = base.as_ref().map(|c| &c.mode);
    let kind = args.mode.unwrap_or(match base_mode {
        Some(GeometryMode::Wkt { .. }) => ModeArg::Wkt,
        _ => ModeArg::Xy,
    });

    let mode = match kind {
        ModeArg::Xy => {
            let (base_x, base_y) = match base_mode {
                Some(GeometryMode::Xy { x_column, y_column }) => {
                    (Some(x_column.as_str()), Some(y_column.as_str()))
                }
                _ => (None, None),
            };
            let (guess_x, guess_y) = detect_xy_columns(records.columns());
            let x = args.x_column.as_deref().or(base_x).or(guess_x);
            let y = args.y_column.as_deref().or(base_y).or(guess_y);
            match (x, y) {
                (Some(x), Some(y)) => GeometryMode::xy(x, y),
                _ => bail!(
                    "X/Y columns not given and not detected among: {}",
                    records.columns().join(", ")
                ),
            }
        }
        ModeArg::Wkt => {
            let base_wkt = match base_mode {
                Some(GeometryMode::Wkt { wkt_column }) => Some(wkt_column.as_str()),
                _ => None,
            };
            let column = args
                .wkt_column
                .as_deref()
                .or(base_wkt)
                .or_else(|| detect_wkt_column(records.columns()));
            match column {
                Some(c) => GeometryMode::wkt(c),
                None => bail!(
                    "WKT column not given and not detected among: {}",
                    records.columns().join(", ")
                ),
            }
        }
    };

    let mut config = ConversionConfig::new(mode);
    if let Some(base) = &base {
        config.source_epsg = base.source_epsg;
        config.target_epsg = base.target_epsg;
        config.keep_source_columns = base.keep_source_columns;
    }
    if let Some(epsg) = args.source_epsg {
        config.source_epsg = epsg;
    }
    if let Some(epsg) = args.target_epsg {
        config.target_epsg = epsg;
    }
    config.keep_source_columns |= args.keep_source_columns;

    config.validate()?;
    Ok(config)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).context(format!("Failed to write file: {}", path.display()))
}

/// Exécute la commande crs
pub fn cmd_crs() {
    for (label, epsg) in tabgeo::crs::COMMON_CRS {
        println!("{:>6}  {}", epsg, label);
    }
}
