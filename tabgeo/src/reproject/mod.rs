//! Reprojection de collections entre deux systèmes de coordonnées
//!
//! Le registre géodésique est injecté (`GeodeticRegistry`) : PROJ quand le
//! feature `reproject` est actif, Web Mercator en Rust pur sinon, ou un
//! registre de test.

mod mercator;
#[cfg(feature = "reproject")]
mod proj;
mod smart;

pub use mercator::MercatorRegistry;
#[cfg(feature = "reproject")]
pub use self::proj::ProjRegistry;
pub use smart::SmartRegistry;

use std::borrow::Cow;

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use tracing::info;

use crate::error::ReprojectionError;
use crate::types::{Crs, Feature, FeatureCollection};

/// Transformation de coordonnées pour un couple de CRS donné
pub trait CoordTransform {
    /// Transforme un lot de coordonnées (x, y) en place
    fn convert_array(&self, coords: &mut [(f64, f64)]) -> Result<(), ReprojectionError>;
}

/// Registre de paramètres géodésiques : fournit une transformation par couple EPSG
pub trait GeodeticRegistry {
    /// Crée la transformation `source` → `target`
    ///
    /// # Errors
    ///
    /// `ReprojectionError::Unsupported` si l'un des codes est inconnu.
    fn transformer(
        &self,
        source: Crs,
        target: Crs,
    ) -> Result<Box<dyn CoordTransform>, ReprojectionError>;
}

/// Reprojection de collections entières
#[derive(Debug, Default, Clone)]
pub struct Reprojector<R = SmartRegistry> {
    registry: R,
}

impl Reprojector<SmartRegistry> {
    /// Reprojector avec le registre par défaut
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: GeodeticRegistry> Reprojector<R> {
    /// Reprojector avec un registre explicite
    pub fn with_registry(registry: R) -> Self {
        Self { registry }
    }

    /// Reprojette toute la collection vers `target`.
    ///
    /// Retourne la collection elle-même (emprunt) si elle est déjà dans `target`.
    /// Sinon toutes les coordonnées sont recalculées dans une nouvelle collection ;
    /// au moindre échec rien n'est retourné et l'original reste intact.
    pub fn reproject<'a>(
        &self,
        collection: &'a FeatureCollection,
        target: Crs,
    ) -> Result<Cow<'a, FeatureCollection>, ReprojectionError> {
        let source = collection.crs().ok_or(ReprojectionError::MissingCrs)?;
        if source == target {
            return Ok(Cow::Borrowed(collection));
        }

        for crs in [source, target] {
            if crs.epsg() == 0 {
                return Err(ReprojectionError::InvalidCode { epsg: crs.epsg() });
            }
        }

        let transform = self.registry.transformer(source, target)?;
        let geometry = GeometryTransformer {
            transform: transform.as_ref(),
            source,
            target,
        };

        let features = collection
            .iter()
            .map(|f| {
                Ok(Feature {
                    properties: f.properties.clone(),
                    geometry: geometry.transform_geometry(&f.geometry)?,
                })
            })
            .collect::<Result<Vec<_>, ReprojectionError>>()?;

        info!(
            from = %source,
            to = %target,
            features = features.len(),
            "Collection reprojected"
        );

        Ok(Cow::Owned(FeatureCollection::from_parts(
            features,
            Some(target),
        )))
    }
}

/// Applique une transformation à tous les types de géométrie
struct GeometryTransformer<'t> {
    transform: &'t dyn CoordTransform,
    source: Crs,
    target: Crs,
}

impl GeometryTransformer<'_> {
    fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry, ReprojectionError> {
        Ok(match geom {
            Geometry::Point(p) => Geometry::Point(self.transform_point(p)?),
            Geometry::Line(l) => {
                let ls = self.transform_coords(&[l.start, l.end])?;
                Geometry::LineString(ls)
            }
            Geometry::LineString(ls) => Geometry::LineString(self.transform_linestring(ls)?),
            Geometry::Polygon(p) => Geometry::Polygon(self.transform_polygon(p)?),
            Geometry::MultiPoint(mp) => {
                let points: Result<Vec<Point>, _> =
                    mp.0.iter().map(|p| self.transform_point(p)).collect();
                Geometry::MultiPoint(MultiPoint::new(points?))
            }
            Geometry::MultiLineString(mls) => {
                let lines: Result<Vec<LineString>, _> = mls
                    .0
                    .iter()
                    .map(|ls| self.transform_linestring(ls))
                    .collect();
                Geometry::MultiLineString(MultiLineString::new(lines?))
            }
            Geometry::MultiPolygon(mp) => {
                let polys: Result<Vec<Polygon>, _> =
                    mp.0.iter().map(|p| self.transform_polygon(p)).collect();
                Geometry::MultiPolygon(MultiPolygon::new(polys?))
            }
            Geometry::GeometryCollection(gc) => {
                let geoms: Result<Vec<Geometry>, _> =
                    gc.0.iter().map(|g| self.transform_geometry(g)).collect();
                Geometry::GeometryCollection(GeometryCollection::new_from(geoms?))
            }
            Geometry::Rect(r) => Geometry::Polygon(self.transform_polygon(&r.to_polygon())?),
            Geometry::Triangle(t) => {
                Geometry::Polygon(self.transform_polygon(&t.to_polygon())?)
            }
        })
    }

    fn transform_point(&self, p: &Point) -> Result<Point, ReprojectionError> {
        let ls = self.transform_coords(&[p.0])?;
        Ok(Point(ls.0[0]))
    }

    fn transform_linestring(&self, ls: &LineString) -> Result<LineString, ReprojectionError> {
        self.transform_coords(&ls.0)
    }

    fn transform_polygon(&self, p: &Polygon) -> Result<Polygon, ReprojectionError> {
        let exterior = self.transform_linestring(p.exterior())?;
        let interiors: Result<Vec<LineString>, _> = p
            .interiors()
            .iter()
            .map(|ls| self.transform_linestring(ls))
            .collect();
        Ok(Polygon::new(exterior, interiors?))
    }

    /// Transformation batch, puis contrôle que chaque résultat est fini
    fn transform_coords(&self, input: &[Coord]) -> Result<LineString, ReprojectionError> {
        let mut coords: Vec<(f64, f64)> = input.iter().map(|c| (c.x, c.y)).collect();
        self.transform.convert_array(&mut coords)?;

        if let Some((orig, _)) = input
            .iter()
            .zip(&coords)
            .find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
        {
            return Err(self.out_of_domain(orig.x, orig.y));
        }

        Ok(LineString::new(
            coords.into_iter().map(|(x, y)| Coord { x, y }).collect(),
        ))
    }

    fn out_of_domain(&self, x: f64, y: f64) -> ReprojectionError {
        ReprojectionError::OutOfDomain {
            source_epsg: self.source.epsg(),
            target_epsg: self.target.epsg(),
            x,
            y,
        }
    }
}
