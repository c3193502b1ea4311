//! Types de données pour le crate tabgeo

use std::fmt;

use geo::Geometry;
use indexmap::IndexMap;

static NULL: Value = Value::Null;

/// Valeur scalaire d'une cellule
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Cellule vide ou manquante
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Vrai pour une cellule vide (ou un flottant NaN, comme un tableur)
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Table en mémoire (lignes × colonnes nommées) fournie par l'appelant
///
/// Une ligne plus courte que le schéma est complétée par des `Null` à la lecture.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Crée une table vide avec son schéma
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Ajoute une ligne (valeurs dans l'ordre des colonnes)
    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    /// Builder: ajoute une ligne et retourne la table
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push_row(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position d'une colonne dans le schéma
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lit une cellule (`Null` si la ligne est trop courte)
    pub fn value(&self, row: usize, column: usize) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// Attributs d'une ligne, dans l'ordre du schéma, sans les colonnes exclues
    pub(crate) fn attributes(&self, row: usize, skip: &[usize]) -> IndexMap<String, Value> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| !skip.contains(i))
            .map(|(i, name)| (name.clone(), self.value(row, i).clone()))
            .collect()
    }
}

/// Système de coordonnées identifié par son code EPSG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// WGS84 géographique (lon/lat en degrés)
    pub const WGS84: Crs = Crs { epsg: 4326 };

    /// Web Mercator / Pseudo-Mercator
    pub const WEB_MERCATOR: Crs = Crs { epsg: 3857 };

    pub const fn new(epsg: u32) -> Self {
        Self { epsg }
    }

    /// Code EPSG
    pub const fn epsg(&self) -> u32 {
        self.epsg
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Une ligne convertie : attributs + géométrie
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Attributs dans l'ordre d'origine, colonnes géométriques retirées
    pub properties: IndexMap<String, Value>,

    /// Géométrie dans le CRS courant de la collection
    pub geometry: Geometry,
}

/// Collection ordonnée de features partageant un seul CRS
///
/// Immuable : assigner ou reprojeter produit une nouvelle collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    crs: Option<Crs>,
}

impl FeatureCollection {
    /// Collection sans CRS (sortie de la construction)
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            crs: None,
        }
    }

    pub(crate) fn from_parts(features: Vec<Feature>, crs: Option<Crs>) -> Self {
        Self { features, crs }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_row_reads_null() {
        let set = RecordSet::new(["a", "b", "c"]).with_row(vec!["1".into()]);
        assert_eq!(set.value(0, 0), &Value::Text("1".to_string()));
        assert_eq!(set.value(0, 2), &Value::Null);
        assert_eq!(set.value(5, 0), &Value::Null);
    }

    #[test]
    fn test_attributes_keep_order() {
        let set = RecordSet::new(["id", "geom", "name"]).with_row(vec![
            Value::Integer(1),
            "POINT(1 2)".into(),
            "a".into(),
        ]);
        let attrs = set.attributes(0, &[1]);
        let keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name"]);
    }

    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(Value::Float(f64::NAN).is_null());
        assert!(!Value::Float(f64::INFINITY).is_null());
        assert!(!Value::Text(String::new()).is_null());
    }

    #[test]
    fn test_crs_display() {
        assert_eq!(Crs::new(2056).to_string(), "EPSG:2056");
        assert_eq!(Crs::WGS84.epsg(), 4326);
    }
}
