//! Web Mercator (EPSG:3857) en Rust pur
//!
//! Aussi connu sous le nom de Pseudo-Mercator. Formule sphérique de l'EPSG
//! (méthode 1024) sur le demi-grand axe WGS84, sans approximation.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::{CoordTransform, GeodeticRegistry};
use crate::error::ReprojectionError;
use crate::types::Crs;

/// Demi-grand axe WGS84 en mètres
const WGS84_A: f64 = 6378137.0;

/// Registre limité au couple WGS84 ⇄ Web Mercator
#[derive(Debug, Default, Clone, Copy)]
pub struct MercatorRegistry;

impl MercatorRegistry {
    /// Vérifie si le couple est pris en charge
    pub fn supports(source: Crs, target: Crs) -> bool {
        matches!(
            (source, target),
            (Crs::WGS84, Crs::WEB_MERCATOR) | (Crs::WEB_MERCATOR, Crs::WGS84)
        )
    }
}

impl GeodeticRegistry for MercatorRegistry {
    fn transformer(
        &self,
        source: Crs,
        target: Crs,
    ) -> Result<Box<dyn CoordTransform>, ReprojectionError> {
        match (source, target) {
            (Crs::WGS84, Crs::WEB_MERCATOR) => Ok(Box::new(Forward)),
            (Crs::WEB_MERCATOR, Crs::WGS84) => Ok(Box::new(Inverse)),
            _ => Err(ReprojectionError::unsupported(
                source.epsg(),
                target.epsg(),
                "pure-Rust registry only handles EPSG:4326 <-> EPSG:3857",
            )),
        }
    }
}

/// lon/lat (degrés) → Web Mercator
struct Forward;

/// Web Mercator → lon/lat (degrés)
struct Inverse;

impl CoordTransform for Forward {
    fn convert_array(&self, coords: &mut [(f64, f64)]) -> Result<(), ReprojectionError> {
        for c in coords.iter_mut() {
            let (lon, lat) = *c;
            // Pôles : y infini. Comme PROJ, longitude hors [-180, 180] acceptée
            if !lon.is_finite() || !(lat.abs() < 90.0) {
                return Err(ReprojectionError::OutOfDomain {
                    source_epsg: 4326,
                    target_epsg: 3857,
                    x: lon,
                    y: lat,
                });
            }
            *c = geographic_to_web_mercator(lon, lat);
        }
        Ok(())
    }
}

impl CoordTransform for Inverse {
    fn convert_array(&self, coords: &mut [(f64, f64)]) -> Result<(), ReprojectionError> {
        for c in coords.iter_mut() {
            let (x, y) = *c;
            if !x.is_finite() || !y.is_finite() {
                return Err(ReprojectionError::OutOfDomain {
                    source_epsg: 3857,
                    target_epsg: 4326,
                    x,
                    y,
                });
            }
            *c = web_mercator_to_geographic(x, y);
        }
        Ok(())
    }
}

fn geographic_to_web_mercator(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = WGS84_A * lon_deg.to_radians();
    let y = WGS84_A * (FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn web_mercator_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = x / WGS84_A;
    let lat = 2.0 * (y / WGS84_A).exp().atan() - FRAC_PI_2;
    (wrap_longitude(lon.to_degrees()), lat.to_degrees())
}

/// Ramène une longitude dans [-180, 180]
fn wrap_longitude(lon: f64) -> f64 {
    if lon.abs() <= 180.0 {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_to_web_mercator() {
        let (x, y) = geographic_to_web_mercator(2.35, 48.85);
        // X ≈ 261600, Y ≈ 6250000
        assert!((x - 261600.0).abs() < 1000.0, "x={}", x);
        assert!((y - 6250000.0).abs() < 10000.0, "y={}", y);
    }

    #[test]
    fn test_roundtrip() {
        let t = MercatorRegistry
            .transformer(Crs::WGS84, Crs::WEB_MERCATOR)
            .unwrap();
        let back = MercatorRegistry
            .transformer(Crs::WEB_MERCATOR, Crs::WGS84)
            .unwrap();

        let mut coords = [(7.45, 46.95), (-122.4, 37.8), (0.0, 0.0)];
        t.convert_array(&mut coords).unwrap();
        back.convert_array(&mut coords).unwrap();

        assert!((coords[0].0 - 7.45).abs() < 1e-9, "lon={}", coords[0].0);
        assert!((coords[0].1 - 46.95).abs() < 1e-9, "lat={}", coords[0].1);
        assert!((coords[1].0 + 122.4).abs() < 1e-9);
        assert!(coords[2].0.abs() < 1e-9 && coords[2].1.abs() < 1e-9);
    }

    #[test]
    fn test_pole_out_of_domain() {
        let t = MercatorRegistry
            .transformer(Crs::WGS84, Crs::WEB_MERCATOR)
            .unwrap();
        let mut coords = [(0.0, 90.0)];
        assert!(matches!(
            t.convert_array(&mut coords),
            Err(ReprojectionError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_inverse_wraps_longitude() {
        let back = MercatorRegistry
            .transformer(Crs::WEB_MERCATOR, Crs::WGS84)
            .unwrap();
        let mut coords = [(30e6, 0.0), (-30e6, 0.0), (1e6, 0.0)];
        back.convert_array(&mut coords).unwrap();

        // 30e6 m ≈ 269.49° → -90.51°
        assert!((coords[0].0 + 90.5054).abs() < 1e-3, "lon={}", coords[0].0);
        assert!((coords[1].0 - 90.5054).abs() < 1e-3, "lon={}", coords[1].0);
        // Dans [-180, 180] : inchangé
        assert!((coords[2].0 - 8.9832).abs() < 1e-3, "lon={}", coords[2].0);
        assert!(coords.iter().all(|c| c.0.abs() <= 180.0));
    }

    #[test]
    fn test_forward_accepts_longitude_beyond_180() {
        let t = MercatorRegistry
            .transformer(Crs::WGS84, Crs::WEB_MERCATOR)
            .unwrap();
        let mut coords = [(180.5, 10.0)];
        t.convert_array(&mut coords).unwrap();
        assert!(coords[0].0 > 20_037_508.0, "x={}", coords[0].0);

        let mut bad = [(f64::NAN, 10.0)];
        assert!(t.convert_array(&mut bad).is_err());
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(-180.0), -180.0);
        assert_eq!(wrap_longitude(45.0), 45.0);
        assert!((wrap_longitude(190.0) + 170.0).abs() < 1e-9);
        assert!((wrap_longitude(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_longitude(540.0) + 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_pair() {
        assert!(!MercatorRegistry::supports(Crs::new(2056), Crs::WGS84));
        assert!(MercatorRegistry
            .transformer(Crs::new(2056), Crs::WGS84)
            .is_err());
    }
}
