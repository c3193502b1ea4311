//! Registre géodésique PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

use ::proj::Proj;

use super::{CoordTransform, GeodeticRegistry};
use crate::error::ReprojectionError;
use crate::types::Crs;

/// Registre s'appuyant sur la base EPSG de PROJ
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjRegistry;

impl GeodeticRegistry for ProjRegistry {
    fn transformer(
        &self,
        source: Crs,
        target: Crs,
    ) -> Result<Box<dyn CoordTransform>, ReprojectionError> {
        // new_known_crs normalise l'ordre des axes (x = longitude / easting)
        let proj = Proj::new_known_crs(&source.to_string(), &target.to_string(), None)
            .map_err(|e| ReprojectionError::unsupported(source.epsg(), target.epsg(), e.to_string()))?;

        Ok(Box::new(ProjTransform {
            proj,
            source,
            target,
        }))
    }
}

struct ProjTransform {
    proj: Proj,
    source: Crs,
    target: Crs,
}

impl CoordTransform for ProjTransform {
    fn convert_array(&self, coords: &mut [(f64, f64)]) -> Result<(), ReprojectionError> {
        let original = coords.to_vec();

        // Transformation batch - beaucoup plus rapide que point par point
        if self.proj.convert_array(coords).is_ok() {
            return Ok(());
        }

        // Retrouver la coordonnée fautive pour le diagnostic
        let (x, y) = original
            .iter()
            .copied()
            .find(|&c| self.proj.convert(c).is_err())
            .or_else(|| original.first().copied())
            .unwrap_or((f64::NAN, f64::NAN));

        Err(ReprojectionError::OutOfDomain {
            source_epsg: self.source.epsg(),
            target_epsg: self.target.epsg(),
            x,
            y,
        })
    }
}
