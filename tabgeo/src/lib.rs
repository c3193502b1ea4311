//! # tabgeo
//!
//! Conversion de données tabulaires (tableur, CSV) en features géographiques
//! encodées en GeoJSON.
//!
//! ## Features
//!
//! - Construction de points depuis deux colonnes X/Y, ou de géométries depuis une colonne WKT
//! - Lignes invalides écartées et comptées, jamais fatales
//! - Reprojection EPSG avec PROJ (feature `reproject`) ou Web Mercator en Rust pur
//! - Encodage GeoJSON RFC 7946 déterministe
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabgeo::{convert, ConversionConfig, GeometryMode, RecordSet};
//!
//! let table = RecordSet::new(["name", "E", "N"])
//!     .with_row(vec!["Bern".into(), "2600000".into(), "1200000".into()]);
//!
//! let mut config = ConversionConfig::new(GeometryMode::xy("E", "N"));
//! config.source_epsg = 2056;
//!
//! let conversion = convert(&table, &config)?;
//! println!("{} features, {} dropped", conversion.feature_count(), conversion.dropped);
//! std::fs::write("data.geojson", &conversion.geojson)?;
//! ```

pub mod build;
pub mod config;
pub mod crs;
pub mod detect;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod reproject;
pub mod types;

pub use build::{build, BuildOptions, BuildOutput, GeometryMode};
pub use config::ConversionConfig;
pub use crs::assign;
pub use encode::encode;
pub use error::{BuildError, ConfigError, EncodeError, Error, ReprojectionError};
pub use pipeline::{convert, convert_with, Conversion};
pub use reproject::{CoordTransform, GeodeticRegistry, Reprojector};
pub use types::{Crs, Feature, FeatureCollection, RecordSet, Value};
