//! Registre intelligent : Rust pur en priorité, fallback sur PROJ
//!
//! Utilise automatiquement la meilleure option disponible.

use super::{CoordTransform, GeodeticRegistry, MercatorRegistry};
use crate::error::ReprojectionError;
use crate::types::Crs;

/// Registre par défaut
#[derive(Debug, Default, Clone, Copy)]
pub struct SmartRegistry;

impl SmartRegistry {
    /// Décrit le backend retenu pour un couple de CRS
    pub fn description(source: Crs, target: Crs) -> &'static str {
        if source == target {
            "identity (pas de reprojection)"
        } else if MercatorRegistry::supports(source, target) {
            "mercator (pure Rust)"
        } else if cfg!(feature = "reproject") {
            "proj (PROJ library)"
        } else {
            "unavailable (build with --features reproject)"
        }
    }
}

impl GeodeticRegistry for SmartRegistry {
    fn transformer(
        &self,
        source: Crs,
        target: Crs,
    ) -> Result<Box<dyn CoordTransform>, ReprojectionError> {
        if MercatorRegistry::supports(source, target) {
            return MercatorRegistry.transformer(source, target);
        }
        fallback(source, target)
    }
}

#[cfg(feature = "reproject")]
fn fallback(source: Crs, target: Crs) -> Result<Box<dyn CoordTransform>, ReprojectionError> {
    super::ProjRegistry.transformer(source, target)
}

#[cfg(not(feature = "reproject"))]
fn fallback(source: Crs, target: Crs) -> Result<Box<dyn CoordTransform>, ReprojectionError> {
    Err(ReprojectionError::unsupported(
        source.epsg(),
        target.epsg(),
        "only EPSG:4326 <-> EPSG:3857 is available without the 'reproject' feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_first() {
        assert_eq!(
            SmartRegistry::description(Crs::WGS84, Crs::WEB_MERCATOR),
            "mercator (pure Rust)"
        );
        assert!(SmartRegistry
            .transformer(Crs::WEB_MERCATOR, Crs::WGS84)
            .is_ok());
    }

    #[test]
    fn test_identity_description() {
        assert_eq!(
            SmartRegistry::description(Crs::new(2056), Crs::new(2056)),
            "identity (pas de reprojection)"
        );
    }

    #[cfg(feature = "reproject")]
    #[test]
    fn test_proj_fallback() {
        assert!(SmartRegistry.transformer(Crs::new(2056), Crs::WGS84).is_ok());
        assert!(SmartRegistry.transformer(Crs::new(99999), Crs::WGS84).is_err());
    }
}
