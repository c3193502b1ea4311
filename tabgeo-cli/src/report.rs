//! Rapport de conversion
//!
//! Rend observable la perte de lignes : nombre de lignes lues, gardées, écartées.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tabgeo::Conversion;
use tracing::{info, warn};

/// Statut global de la conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionStatus {
    /// Toutes les lignes ont donné une géométrie
    Success,
    /// Certaines lignes ont été écartées
    PartialSuccess,
    /// Aucune géométrie valide
    Empty,
}

/// Rapport complet d'une conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Fichier source
    pub input: String,
    /// Fichier GeoJSON produit
    pub output: String,
    pub source_epsg: u32,
    pub target_epsg: u32,
    /// Lignes lues
    pub input_rows: usize,
    /// Features produites
    pub features: usize,
    /// Lignes écartées
    pub dropped: usize,
    /// Durée en secondes
    pub duration_secs: f64,
    pub status: ConversionStatus,
}

impl ConversionReport {
    /// Construit le rapport depuis le résultat du pipeline
    pub fn new(
        input: &Path,
        output: &Path,
        source_epsg: u32,
        target_epsg: u32,
        conversion: &Conversion,
        duration: Duration,
    ) -> Self {
        let status = if conversion.feature_count() == 0 {
            ConversionStatus::Empty
        } else if conversion.dropped > 0 {
            ConversionStatus::PartialSuccess
        } else {
            ConversionStatus::Success
        };

        Self {
            input: input.display().to_string(),
            output: output.display().to_string(),
            source_epsg,
            target_epsg,
            input_rows: conversion.input_rows,
            features: conversion.feature_count(),
            dropped: conversion.dropped,
            duration_secs: duration.as_secs_f64(),
            status,
        }
    }

    /// Affiche le résumé dans les logs
    pub fn print_summary(&self) {
        info!(
            "Rows with valid geometry: {} / {} (EPSG:{} -> EPSG:{}, {:.2}s)",
            self.features, self.input_rows, self.source_epsg, self.target_epsg, self.duration_secs
        );
        match self.status {
            ConversionStatus::Success => {}
            ConversionStatus::PartialSuccess => {
                warn!("{} rows dropped (invalid or missing geometry)", self.dropped)
            }
            ConversionStatus::Empty => warn!("No valid geometry found, GeoJSON is empty"),
        }
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .context(format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabgeo::{convert, ConversionConfig, GeometryMode, RecordSet};

    fn conversion(rows: &[(&str, &str)]) -> Conversion {
        let mut table = RecordSet::new(["x", "y"]);
        for (x, y) in rows {
            table.push_row(vec![(*x).into(), (*y).into()]);
        }
        convert(&table, &ConversionConfig::new(GeometryMode::xy("x", "y"))).unwrap()
    }

    fn report(c: &Conversion) -> ConversionReport {
        ConversionReport::new(
            Path::new("in.csv"),
            Path::new("out.geojson"),
            4326,
            4326,
            c,
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_status() {
        assert_eq!(
            report(&conversion(&[("1", "2")])).status,
            ConversionStatus::Success
        );
        assert_eq!(
            report(&conversion(&[("1", "2"), ("a", "b")])).status,
            ConversionStatus::PartialSuccess
        );
        assert_eq!(
            report(&conversion(&[("a", "b")])).status,
            ConversionStatus::Empty
        );
    }

    #[test]
    fn test_save_json() {
        let r = report(&conversion(&[("1", "2"), ("a", "b")]));
        let path = std::env::temp_dir().join("tabgeo_report_test.json");
        r.save_json(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""dropped": 1"#));
        assert!(content.contains(r#""status": "PartialSuccess""#));

        std::fs::remove_file(path).ok();
    }
}
