use std::path::Path;

use crate::ConfigError;

/// Read one column of a CSV file as the list of entity identifiers.
///
/// Blank cells are skipped. Order is preserved.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or has no such column.
pub fn load_names_list(path: &Path, column: &str) -> Result<Vec<String>, ConfigError> {
    let display = path.display().to_string();
    let names_err = |e| ConfigError::NamesFile {
        path: display.clone(),
        source: e,
    };

    let mut reader = csv::Reader::from_path(path).map_err(names_err)?;
    let index = reader
        .headers()
        .map_err(names_err)?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| ConfigError::MissingColumn {
            path: display.clone(),
            column: column.to_string(),
        })?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(names_err)?;
        if let Some(value) = record.get(index).map(str::trim) {
            if !value.is_empty() {
                names.push(value.to_string());
            }
        }
    }
    Ok(names)
}
