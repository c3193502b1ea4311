//! Lecture d'un fichier CSV en `RecordSet`
//!
//! Le séparateur est explicite (pas de détection). Chaque cellule est typée :
//! vide → `Null`, entier, flottant, booléen, sinon texte.

use std::path::Path;

use anyhow::{Context, Result};
use tabgeo::{RecordSet, Value};
use tracing::debug;

/// Lit un CSV avec en-tête
pub fn read_csv(path: &Path, delimiter: u8) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV header")?
        .clone();
    let mut records = RecordSet::new(headers.iter().map(|h| h.trim().to_string()));

    for (i, row) in reader.records().enumerate() {
        let row = row.context(format!("Invalid CSV record at line {}", i + 2))?;
        records.push_row(row.iter().map(parse_cell).collect());
    }

    debug!(
        rows = records.len(),
        columns = records.columns().len(),
        "CSV loaded"
    );

    Ok(records)
}

/// Convertit une cellule texte en valeur typée
pub fn parse_cell(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => Value::Bool(true),
        "false" | "False" | "FALSE" => Value::Bool(false),
        _ => Value::Text(raw.to_string()),
    }
}

/// Parse l'argument `--delimiter` (un seul caractère ASCII, ou `tab`)
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!(
            "delimiter must be a single ASCII character or 'tab', got '{}'",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell("  "), Value::Null);
        assert_eq!(parse_cell("42"), Value::Integer(42));
        assert_eq!(parse_cell(" 7.45 "), Value::Float(7.45));
        assert_eq!(parse_cell("TRUE"), Value::Bool(true));
        assert_eq!(
            parse_cell("POINT (1 2)"),
            Value::Text("POINT (1 2)".to_string())
        );
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_read_csv() {
        let path = std::env::temp_dir().join("tabgeo_input_test.csv");
        std::fs::write(&path, "name;lon;lat\nBern;7.45;46.95\nBad;x;46.9\nShort;8\n").unwrap();

        let records = read_csv(&path, b';').unwrap();
        assert_eq!(records.columns(), &["name", "lon", "lat"]);
        assert_eq!(records.len(), 3);
        assert_eq!(records.value(0, 1), &Value::Float(7.45));
        assert_eq!(records.value(1, 1), &Value::Text("x".to_string()));
        assert_eq!(records.value(2, 2), &Value::Null);

        std::fs::remove_file(path).ok();
    }
}
