//! Construction des géométries depuis les lignes d'une table
//!
//! Deux modes exclusifs : paire de colonnes X/Y (points) ou colonne WKT.
//! Politique de tolérance : une ligne qui ne donne pas de géométrie valide est
//! écartée et comptée, jamais remontée comme erreur.

use geo::{CoordsIter, Geometry, LineString, Point, Polygon};
use geozero::wkt::Wkt;
use geozero::ToGeo;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::types::{Feature, FeatureCollection, RecordSet, Value};

/// Mode de construction des géométries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GeometryMode {
    /// Points depuis deux colonnes numériques (x = longitude/easting)
    ///
    /// Limitation connue : l'ordre des axes n'est jamais corrigé. La colonne X
    /// est toujours la première coordonnée, y compris pour les CRS dont la
    /// convention est latitude d'abord.
    Xy { x_column: String, y_column: String },
    /// Géométries depuis une colonne WKT
    Wkt { wkt_column: String },
}

impl GeometryMode {
    pub fn xy(x_column: impl Into<String>, y_column: impl Into<String>) -> Self {
        Self::Xy {
            x_column: x_column.into(),
            y_column: y_column.into(),
        }
    }

    pub fn wkt(wkt_column: impl Into<String>) -> Self {
        Self::Wkt {
            wkt_column: wkt_column.into(),
        }
    }

    /// Colonnes sources de la géométrie
    pub fn source_columns(&self) -> Vec<&str> {
        match self {
            Self::Xy { x_column, y_column } => vec![x_column, y_column],
            Self::Wkt { wkt_column } => vec![wkt_column],
        }
    }
}

/// Options de construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Garder les colonnes sources dans les attributs
    /// (X/Y : valeurs numériques converties, WKT : texte d'origine)
    pub keep_source_columns: bool,
}

/// Résultat de la construction : features gardées + nombre de lignes écartées
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Features sans CRS, dans l'ordre des lignes d'entrée
    pub collection: FeatureCollection,

    /// Nombre de lignes en entrée
    pub input_rows: usize,

    /// Lignes écartées (valeur non numérique, manquante, WKT invalide)
    pub dropped: usize,
}

impl BuildOutput {
    /// Échoue si aucune ligne n'a produit de géométrie
    pub fn ensure_non_empty(self) -> Result<Self, BuildError> {
        if self.collection.is_empty() {
            return Err(BuildError::EmptyResult {
                input_rows: self.input_rows,
            });
        }
        Ok(self)
    }
}

/// Construit les features d'une table selon le mode choisi.
///
/// # Errors
///
/// `BuildError::ColumnNotFound` si une colonne demandée n'existe pas
/// (vérifié avant de lire la moindre ligne).
pub fn build(
    records: &RecordSet,
    mode: &GeometryMode,
    options: BuildOptions,
) -> Result<BuildOutput, BuildError> {
    let output = match mode {
        GeometryMode::Xy { x_column, y_column } => {
            let x_idx = require_column(records, x_column)?;
            let y_idx = require_column(records, y_column)?;
            build_xy(records, x_idx, y_idx, options)
        }
        GeometryMode::Wkt { wkt_column } => {
            let idx = require_column(records, wkt_column)?;
            build_wkt(records, idx, options)
        }
    };

    info!(
        rows = output.input_rows,
        features = output.collection.len(),
        dropped = output.dropped,
        "Geometries built"
    );
    if output.collection.is_empty() && output.input_rows > 0 {
        warn!(rows = output.input_rows, "No row produced a valid geometry");
    }

    Ok(output)
}

fn require_column(records: &RecordSet, name: &str) -> Result<usize, BuildError> {
    records
        .column_index(name)
        .ok_or_else(|| BuildError::ColumnNotFound {
            column: name.to_string(),
        })
}

fn build_xy(records: &RecordSet, x_idx: usize, y_idx: usize, options: BuildOptions) -> BuildOutput {
    let skip: Vec<usize> = if options.keep_source_columns {
        Vec::new()
    } else {
        vec![x_idx, y_idx]
    };

    let mut features = Vec::with_capacity(records.len());
    for row in 0..records.len() {
        let x = coerce_number(records.value(row, x_idx));
        let y = coerce_number(records.value(row, y_idx));
        let (Some(x), Some(y)) = (x, y) else {
            debug!(row, "Dropped row: x/y not numeric");
            continue;
        };

        let mut properties = records.attributes(row, &skip);
        if options.keep_source_columns {
            // Comme une colonne convertie en numérique
            for (idx, v) in [(x_idx, x), (y_idx, y)] {
                if let Some((_, value)) = properties.get_index_mut(idx) {
                    *value = Value::Float(v);
                }
            }
        }

        features.push(Feature {
            properties,
            geometry: Geometry::Point(Point::new(x, y)),
        });
    }

    finish(records.len(), features)
}

fn build_wkt(records: &RecordSet, wkt_idx: usize, options: BuildOptions) -> BuildOutput {
    let skip: Vec<usize> = if options.keep_source_columns {
        Vec::new()
    } else {
        vec![wkt_idx]
    };

    let mut features = Vec::with_capacity(records.len());
    for row in 0..records.len() {
        let geometry = match records.value(row, wkt_idx) {
            Value::Text(text) => match parse_wkt(text) {
                Ok(g) => g,
                Err(reason) => {
                    debug!(row, %reason, "Dropped row: invalid WKT");
                    continue;
                }
            },
            v if v.is_null() => {
                debug!(row, "Dropped row: missing WKT");
                continue;
            }
            _ => {
                debug!(row, "Dropped row: WKT cell is not text");
                continue;
            }
        };

        features.push(Feature {
            properties: records.attributes(row, &skip),
            geometry,
        });
    }

    finish(records.len(), features)
}

fn finish(input_rows: usize, features: Vec<Feature>) -> BuildOutput {
    let dropped = input_rows - features.len();
    BuildOutput {
        collection: FeatureCollection::new(features),
        input_rows,
        dropped,
    }
}

/// Convertit une cellule en nombre fini (`None` si impossible)
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Null => return None,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Integer(i) => *i as f64,
        Value::Float(f) => *f,
        Value::Text(s) => fast_float::parse::<f64, _>(s.trim()).ok()?,
    };
    n.is_finite().then_some(n)
}

/// Parse un littéral WKT ; seuls les types simples et multi sont acceptés
pub fn parse_wkt(text: &str) -> Result<Geometry, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty string".to_string());
    }

    let geometry = Wkt(text).to_geo().map_err(|e| e.to_string())?;
    match geometry {
        Geometry::Point(_)
        | Geometry::LineString(_)
        | Geometry::Polygon(_)
        | Geometry::MultiPoint(_)
        | Geometry::MultiLineString(_)
        | Geometry::MultiPolygon(_) => {
            validate_geometry(&geometry)?;
            Ok(geometry)
        }
        other => Err(format!("unsupported geometry type: {}", type_name(&other))),
    }
}

/// Vérifie qu'une géométrie est exploitable : non vide, coordonnées finies,
/// au moins 2 positions par ligne et 4 par anneau
fn validate_geometry(geometry: &Geometry) -> Result<(), String> {
    if geometry.coords_count() == 0 {
        return Err("empty geometry".to_string());
    }
    if !geometry
        .coords_iter()
        .all(|c| c.x.is_finite() && c.y.is_finite())
    {
        return Err("non-finite coordinate".to_string());
    }

    match geometry {
        Geometry::LineString(ls) => check_line(ls),
        Geometry::MultiLineString(mls) => mls.iter().try_for_each(check_line),
        Geometry::Polygon(p) => check_polygon(p),
        Geometry::MultiPolygon(mp) => mp.iter().try_for_each(check_polygon),
        _ => Ok(()),
    }
}

fn check_line(ls: &LineString) -> Result<(), String> {
    if ls.0.len() < 2 {
        return Err(format!("LineString needs 2 positions, got {}", ls.0.len()));
    }
    Ok(())
}

fn check_polygon(p: &Polygon) -> Result<(), String> {
    for ring in std::iter::once(p.exterior()).chain(p.interiors()) {
        if ring.0.len() < 4 {
            return Err(format!("ring needs 4 positions, got {}", ring.0.len()));
        }
    }
    Ok(())
}

fn type_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
