//! Encodage GeoJSON (RFC 7946) avec geozero
//!
//! La collection doit être en EPSG:4326 : l'encodeur ne reprojette jamais.
//! Sortie déterministe : features dans l'ordre, attributs dans l'ordre des
//! colonnes, nombres formatés de façon stable.

use std::io::Write;

use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use crate::error::EncodeError;
use crate::types::{Crs, Feature, FeatureCollection, Value};

/// Type MIME GeoJSON
pub const MEDIA_TYPE: &str = "application/geo+json";

/// Extension de fichier conventionnelle
pub const FILE_EXTENSION: &str = "geojson";

/// Encode une collection en GeoJSON (UTF-8)
pub fn encode(collection: &FeatureCollection) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_to(collection, &mut buf)?;
    Ok(buf)
}

/// Encode une collection en GeoJSON vers un writer
pub fn encode_to<W: Write>(collection: &FeatureCollection, writer: &mut W) -> Result<(), EncodeError> {
    match collection.crs() {
        Some(Crs::WGS84) => {}
        Some(other) => return Err(EncodeError::WrongCrs { epsg: other.epsg() }),
        None => return Err(EncodeError::MissingCrs),
    }

    // Pas de membre "crs" : WGS84 lon/lat est implicite en RFC 7946
    write!(writer, r#"{{"type":"FeatureCollection","features":["#)?;

    for (i, feature) in collection.iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, feature)?;
    }

    write!(writer, "]}}")?;
    writer.flush()?;

    Ok(())
}

/// Écrit une feature en GeoJSON
fn write_feature<W: Write>(writer: &mut W, feature: &Feature) -> Result<(), EncodeError> {
    write!(writer, r#"{{"type":"Feature","geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    feature.geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(writer, r#","properties":{{"#)?;
    for (i, (key, value)) in feature.properties.iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        serde_json::to_writer(&mut *writer, key)?;
        write!(writer, ":")?;
        write_value(writer, value)?;
    }
    write!(writer, "}}}}")?;

    Ok(())
}

/// Écrit une valeur d'attribut ; NaN et infinis deviennent `null`
fn write_value<W: Write>(writer: &mut W, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Null => write!(writer, "null")?,
        Value::Bool(b) => serde_json::to_writer(&mut *writer, b)?,
        Value::Integer(i) => serde_json::to_writer(&mut *writer, i)?,
        Value::Float(f) if f.is_finite() => serde_json::to_writer(&mut *writer, f)?,
        Value::Float(_) => write!(writer, "null")?,
        Value::Text(s) => serde_json::to_writer(&mut *writer, s)?,
    }
    Ok(())
}
