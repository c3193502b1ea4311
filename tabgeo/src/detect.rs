//! Détection heuristique des colonnes géométriques
//!
//! Sert de valeur par défaut quand l'appelant ne désigne pas les colonnes.

const X_CANDIDATES: &[&str] = &["x", "lon", "long", "longitude", "easting"];
const Y_CANDIDATES: &[&str] = &["y", "lat", "latitude", "northing"];
const WKT_CANDIDATES: &[&str] = &["wkt", "geom", "geometry"];

/// Devine les colonnes X et Y (insensible à la casse, par ordre de priorité)
pub fn detect_xy_columns<S: AsRef<str>>(columns: &[S]) -> (Option<&str>, Option<&str>) {
    (
        find_candidate(columns, X_CANDIDATES),
        find_candidate(columns, Y_CANDIDATES),
    )
}

/// Devine la colonne WKT (première colonne nommée wkt, geom ou geometry)
pub fn detect_wkt_column<S: AsRef<str>>(columns: &[S]) -> Option<&str> {
    columns
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|c| WKT_CANDIDATES.contains(&c.to_lowercase().as_str()))
}

fn find_candidate<'a, S: AsRef<str>>(columns: &'a [S], candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        columns
            .iter()
            .map(AsRef::<str>::as_ref)
            .find(|c| c.to_lowercase() == *candidate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_xy() {
        let cols = ["Name", "Latitude", "LON"];
        assert_eq!(detect_xy_columns(&cols), (Some("LON"), Some("Latitude")));
    }

    #[test]
    fn test_detect_xy_priority() {
        // "x" passe avant "longitude" quelle que soit la position
        let cols = ["longitude", "x", "y"];
        assert_eq!(detect_xy_columns(&cols), (Some("x"), Some("y")));
    }

    #[test]
    fn test_detect_none() {
        let cols = vec!["a".to_string(), "b".to_string()];
        assert_eq!(detect_xy_columns(&cols), (None, None));
        assert_eq!(detect_wkt_column(&cols), None);
    }

    #[test]
    fn test_detect_wkt() {
        let cols = ["id", "Geometry", "wkt"];
        assert_eq!(detect_wkt_column(&cols), Some("Geometry"));
    }
}
