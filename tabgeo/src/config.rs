//! Configuration d'une conversion

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::build::{BuildOptions, GeometryMode};
use crate::error::ConfigError;
use crate::types::Crs;

/// Paramètres d'une conversion table → GeoJSON
///
/// ```json
/// {"mode": "xy", "x_column": "lon", "y_column": "lat", "source_epsg": 2056}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Mode de construction et colonnes associées
    #[serde(flatten)]
    pub mode: GeometryMode,

    /// CRS déclaré des données source
    #[serde(default = "default_epsg")]
    pub source_epsg: u32,

    /// CRS cible de la reprojection
    #[serde(default = "default_epsg")]
    pub target_epsg: u32,

    /// Garder les colonnes sources de la géométrie dans les attributs
    #[serde(default)]
    pub keep_source_columns: bool,
}

fn default_epsg() -> u32 {
    4326
}

impl ConversionConfig {
    pub fn new(mode: GeometryMode) -> Self {
        Self {
            mode,
            source_epsg: default_epsg(),
            target_epsg: default_epsg(),
            keep_source_columns: false,
        }
    }

    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse et valide une configuration JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Vérifie codes EPSG et noms de colonnes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_epsg == 0 {
            return Err(ConfigError::InvalidEpsg {
                field: "source_epsg",
            });
        }
        if self.target_epsg == 0 {
            return Err(ConfigError::InvalidEpsg {
                field: "target_epsg",
            });
        }

        let columns: Vec<(&'static str, &str)> = match &self.mode {
            GeometryMode::Xy { x_column, y_column } => {
                vec![("x_column", x_column.as_str()), ("y_column", y_column.as_str())]
            }
            GeometryMode::Wkt { wkt_column } => vec![("wkt_column", wkt_column.as_str())],
        };
        for (field, column) in columns {
            if column.trim().is_empty() {
                return Err(ConfigError::EmptyColumn { field });
            }
        }

        Ok(())
    }

    pub fn source_crs(&self) -> Crs {
        Crs::new(self.source_epsg)
    }

    pub fn target_crs(&self) -> Crs {
        Crs::new(self.target_epsg)
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            keep_source_columns: self.keep_source_columns,
        }
    }
}
