//! Assignation du CRS source et CRS courants

use crate::types::{Crs, FeatureCollection};

/// CRS proposés par défaut (libellé, code EPSG)
pub const COMMON_CRS: &[(&str, u32)] = &[
    ("WGS84 (EPSG:4326)", 4326),
    ("Web Mercator (EPSG:3857)", 3857),
    ("CH LV95 (EPSG:2056)", 2056),
    ("ETRS89 / LAEA Europe (EPSG:3035)", 3035),
];

/// Libellé d'un code EPSG courant
pub fn label(epsg: u32) -> Option<&'static str> {
    COMMON_CRS
        .iter()
        .find(|(_, code)| *code == epsg)
        .map(|(name, _)| *name)
}

/// Déclare le CRS source d'une collection.
///
/// Opération purement descriptive : aucune coordonnée n'est modifiée, un CRS
/// déjà présent est remplacé. La validité du code est vérifiée à la reprojection.
pub fn assign(collection: FeatureCollection, crs: Crs) -> FeatureCollection {
    FeatureCollection::from_parts(collection.into_features(), Some(crs))
}
