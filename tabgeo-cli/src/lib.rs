//! # tabgeo-cli
//!
//! Conversion de fichiers CSV en GeoJSON en ligne de commande.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Points depuis des colonnes lon/lat détectées automatiquement
//! tabgeo convert --input sites.csv --output sites.geojson
//!
//! # Polygones WKT en CH LV95, séparateur point-virgule
//! tabgeo convert -i parcels.csv -o parcels.geojson --mode wkt --wkt-column geom \
//!     --source-epsg 2056 --delimiter ';' --report report.json
//! ```

pub mod cli;
pub mod input;
pub mod report;

pub use report::{ConversionReport, ConversionStatus};
