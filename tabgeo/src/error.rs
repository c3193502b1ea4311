//! Types d'erreurs pour le crate tabgeo
//!
//! Une erreur par frontière d'étape (construction, reprojection, encodage,
//! configuration). Les échecs ligne par ligne ne sont jamais des erreurs :
//! la ligne est simplement écartée et comptée.

use thiserror::Error;

/// Erreurs de construction des géométries
#[derive(Debug, Error)]
pub enum BuildError {
    /// Colonne demandée absente du schéma (vérifié avant toute ligne)
    #[error("Column not found: '{column}'")]
    ColumnNotFound { column: String },

    /// Aucune ligne n'a produit de géométrie
    #[error("No valid geometry in {input_rows} input rows")]
    EmptyResult { input_rows: usize },
}

/// Erreurs de reprojection
///
/// En cas d'erreur, la collection d'origine n'est jamais modifiée.
#[derive(Debug, Error)]
pub enum ReprojectionError {
    /// La collection n'a pas de CRS source déclaré
    #[error("Collection has no CRS assigned; assign a source EPSG code first")]
    MissingCrs,

    /// Code EPSG invalide (0)
    #[error("Invalid EPSG code: {epsg}")]
    InvalidCode { epsg: u32 },

    /// Couple de CRS inconnu ou non supporté par le registre géodésique
    #[error("Unsupported transformation EPSG:{source_epsg} -> EPSG:{target_epsg}: {reason}")]
    Unsupported {
        source_epsg: u32,
        target_epsg: u32,
        reason: String,
    },

    /// Coordonnée hors du domaine de validité du CRS source
    #[error("Coordinate ({x}, {y}) outside the domain of EPSG:{source_epsg} (target EPSG:{target_epsg})")]
    OutOfDomain {
        source_epsg: u32,
        target_epsg: u32,
        x: f64,
        y: f64,
    },
}

impl ReprojectionError {
    /// Crée une erreur de transformation non supportée avec contexte
    pub fn unsupported(source_epsg: u32, target_epsg: u32, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            source_epsg,
            target_epsg,
            reason: reason.into(),
        }
    }
}

/// Erreurs d'encodage GeoJSON
#[derive(Debug, Error)]
pub enum EncodeError {
    /// La collection n'a pas de CRS
    #[error("Collection has no CRS assigned; GeoJSON output requires EPSG:4326")]
    MissingCrs,

    /// La collection n'est pas en WGS84
    #[error("GeoJSON output requires EPSG:4326, collection is EPSG:{epsg}; reproject first")]
    WrongCrs { epsg: u32 },

    /// Erreur d'écriture
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur d'écriture d'une géométrie
    #[error("Geometry encoding failed: {0}")]
    Geometry(#[from] geozero::error::GeozeroError),

    /// Erreur de sérialisation d'un attribut
    #[error("Property encoding failed: {0}")]
    Property(#[from] serde_json::Error),
}

/// Erreurs de configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Code EPSG invalide
    #[error("Invalid {field}: EPSG code must be a positive integer")]
    InvalidEpsg { field: &'static str },

    /// Nom de colonne vide
    #[error("Missing column name for '{field}'")]
    EmptyColumn { field: &'static str },

    /// JSON illisible
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Fichier illisible
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Erreur globale du pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Reprojection(#[from] ReprojectionError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
