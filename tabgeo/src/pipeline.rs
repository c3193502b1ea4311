//! Pipeline complet : construction → CRS source → reprojection → GeoJSON

use tracing::info;

use crate::build::build;
use crate::config::ConversionConfig;
use crate::crs::assign;
use crate::encode::encode;
use crate::error::Error;
use crate::reproject::{GeodeticRegistry, Reprojector, SmartRegistry};
use crate::types::{Crs, FeatureCollection, RecordSet};

/// Résultat d'une conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Features dans le CRS cible demandé
    pub collection: FeatureCollection,

    /// GeoJSON encodé, toujours en EPSG:4326
    pub geojson: Vec<u8>,

    /// Nombre de lignes en entrée
    pub input_rows: usize,

    /// Lignes écartées faute de géométrie valide
    pub dropped: usize,
}

impl Conversion {
    /// Nombre de features produites
    pub fn feature_count(&self) -> usize {
        self.collection.len()
    }
}

/// Convertit une table avec le registre géodésique par défaut
pub fn convert(records: &RecordSet, config: &ConversionConfig) -> Result<Conversion, Error> {
    convert_with(records, config, &Reprojector::<SmartRegistry>::new())
}

/// Convertit une table avec un reprojector explicite
pub fn convert_with<R: GeodeticRegistry>(
    records: &RecordSet,
    config: &ConversionConfig,
    reprojector: &Reprojector<R>,
) -> Result<Conversion, Error> {
    config.validate()?;

    let built = build(records, &config.mode, config.build_options())?;
    let source = assign(built.collection, config.source_crs());

    let collection = reprojector
        .reproject(&source, config.target_crs())?
        .into_owned();

    // Le fichier GeoJSON est toujours produit en WGS84, depuis le CRS source
    let wgs84 = reprojector.reproject(&source, Crs::WGS84)?;
    let geojson = encode(&wgs84)?;

    info!(
        features = collection.len(),
        dropped = built.dropped,
        source = %config.source_crs(),
        target = %config.target_crs(),
        bytes = geojson.len(),
        "Conversion done"
    );

    Ok(Conversion {
        collection,
        geojson,
        input_rows: built.input_rows,
        dropped: built.dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::GeometryMode;
    use crate::error::{BuildError, ConfigError};
    use crate::types::Value;
    use geo::{Geometry, Point};

    fn table() -> RecordSet {
        RecordSet::new(["lon", "lat"])
            .with_row(vec!["7.45".into(), "46.95".into()])
            .with_row(vec!["bad".into(), "46.9".into()])
    }

    #[test]
    fn test_xy_wgs84_scenario() {
        let config = ConversionConfig::new(GeometryMode::xy("lon", "lat"));
        let conversion = convert(&table(), &config).unwrap();

        assert_eq!(conversion.feature_count(), 1);
        assert_eq!(conversion.dropped, 1);
        assert_eq!(conversion.input_rows, 2);
        assert_eq!(conversion.collection.crs(), Some(Crs::WGS84));
        assert_eq!(
            conversion.collection.features()[0].geometry,
            Geometry::Point(Point::new(7.45, 46.95))
        );
        assert!(!conversion.geojson.is_empty());
    }

    #[test]
    fn test_target_web_mercator_keeps_wgs84_output() {
        let mut config = ConversionConfig::new(GeometryMode::xy("lon", "lat"));
        config.target_epsg = 3857;

        let conversion = convert(&table(), &config).unwrap();
        assert_eq!(conversion.collection.crs(), Some(Crs::WEB_MERCATOR));
        if let Geometry::Point(p) = conversion.collection.features()[0].geometry {
            assert!(p.x() > 800_000.0 && p.x() < 850_000.0, "x={}", p.x());
        } else {
            panic!("Expected Point geometry");
        }

        let text = String::from_utf8(conversion.geojson).unwrap();
        assert!(text.contains("7.45"), "{}", text);
    }

    #[test]
    fn test_column_not_found() {
        let config = ConversionConfig::new(GeometryMode::wkt("geom"));
        let err = convert(&table(), &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::ColumnNotFound { ref column }) if column == "geom"
        ));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ConversionConfig::new(GeometryMode::xy("lon", "lat"));
        config.target_epsg = 0;
        assert!(matches!(
            convert(&table(), &config),
            Err(Error::Config(ConfigError::InvalidEpsg { .. }))
        ));
    }

    #[test]
    fn test_empty_input() {
        let config = ConversionConfig::new(GeometryMode::xy("lon", "lat"));
        let empty = RecordSet::new(["lon", "lat"]).with_row(vec![Value::Null, Value::Null]);
        let conversion = convert(&empty, &config).unwrap();
        assert_eq!(conversion.feature_count(), 0);
        assert_eq!(conversion.dropped, 1);
    }
}
