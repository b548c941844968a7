use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::models::InteractionRecord;

/// Reads a whole export file into memory and parses it.
///
/// The file handle is released once the contents are read, before
/// parsing starts.
pub fn load_records(path: &Path) -> Result<Vec<InteractionRecord>> {
    debug!("Opening export {}", path.display());

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open export file: {}", path.display()))?;
    let records = parse_records(&json)
        .with_context(|| format!("Failed to parse export file: {}", path.display()))?;

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parses an export that is already in memory.
pub fn parse_records(json: &str) -> Result<Vec<InteractionRecord>> {
    let records: Vec<InteractionRecord> = serde_json::from_str(json)
        .context("Export must be a JSON array of objects")?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_records_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"[{{"match": 1}}, {{"block": 1, "we_met": true}}]"#).unwrap();

        let records = load_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].has(Field::Match));
        assert!(records[1].has(Field::WeMet));
    }

    #[test]
    fn test_parse_failure_names_path_and_shape() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, r#"{{"match": 1}}"#).unwrap();

        let message = format!("{:#}", load_records(temp_file.path()).unwrap_err());
        assert!(message.contains("Failed to parse export file"));
        assert!(message.contains("JSON array of objects"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_records(Path::new("/nonexistent/matches.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/matches.json"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "not valid json").unwrap();

        assert!(load_records(temp_file.path()).is_err());
        assert!(parse_records("not valid json").is_err());
    }

    #[test]
    fn test_top_level_must_be_array_of_objects() {
        assert!(parse_records(r#"{"match": 1}"#).is_err());
        assert!(parse_records("[1, 2]").is_err());
        assert!(parse_records("[]").unwrap().is_empty());
        assert_eq!(parse_records("[{}]").unwrap().len(), 1);
    }
}
