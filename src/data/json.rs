// JSON record source
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{DataError, Record};

/// JSON record source
///
/// Reads either a top-level array of records or an array nested under a
/// dotted path (`collections.patients`).
pub struct JsonSource {
    path: String,
    array_path: Option<String>,
}

impl JsonSource {
    /// Create a new JSON record source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonSource {
            path: path.as_ref().to_string_lossy().to_string(),
            array_path: None,
        }
    }

    /// Create a new JSON record source with a path to the array
    pub fn with_array_path<P: AsRef<Path>, S: Into<String>>(path: P, array_path: S) -> Self {
        JsonSource {
            path: path.as_ref().to_string_lossy().to_string(),
            array_path: Some(array_path.into()),
        }
    }

    /// Read every record from the source
    pub fn read(&self) -> Result<Vec<Record>, DataError> {
        let json = read_document(&self.path)?;
        records_at(&json, self.array_path.as_deref())
    }
}

/// Parse a whole JSON file into a document
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<JsonValue, DataError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|e| DataError::Parse(e.to_string()))
}

/// Extract the records of an already parsed document, optionally nested under `array_path`
pub fn records_at(json: &JsonValue, array_path: Option<&str>) -> Result<Vec<Record>, DataError> {
    let mut current = json;

    if let Some(array_path) = array_path {
        for part in array_path.split('.') {
            current = current.get(part).ok_or_else(|| {
                DataError::Parse(format!("Path '{}' not found in JSON", array_path))
            })?;
        }
    }

    let array = current.as_array().ok_or_else(|| {
        DataError::Parse("JSON root is not an array and no array path provided".to_string())
    })?;

    array
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let record = Record::deserialize(item)
                .map_err(|e| DataError::Parse(format!("record {}: {}", i, e)))?;

            if record.id.trim().is_empty() {
                return Err(DataError::Validation(format!("record {} has an empty id", i)));
            }
            Ok(record)
        })
        .collect()
}

/// Load records from a JSON file, optionally nested under `array_path`
pub fn load_records<P: AsRef<Path>>(path: P, array_path: Option<&str>) -> Result<Vec<Record>, DataError> {
    match array_path {
        Some(p) => JsonSource::with_array_path(path, p).read(),
        None => JsonSource::new(path).read(),
    }
}
