//! CSV persistence for result sets, one file per entity.

use std::io::Write;
use std::path::{Path, PathBuf};

use mktscrape_core::Record;

use crate::result_set::ResultSet;
use crate::StoreError;

/// A folder of `<key>.csv` snapshots for one source.
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.csv"))
    }

    /// Load the snapshot for `key`, or an empty set if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn load<R: Record>(&self, key: &str) -> Result<ResultSet<R>, StoreError> {
        load_file(&self.path_for(key))
    }

    /// Replace the snapshot for `key` with `set`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub fn persist<R: Record>(&self, key: &str, set: &ResultSet<R>) -> Result<(), StoreError> {
        persist_file(&self.path_for(key), set)
    }
}

/// Load a CSV snapshot. A missing file is an empty set.
///
/// # Errors
///
/// Returns [`StoreError`] if the file exists but cannot be read or parsed.
pub fn load_file<R: Record>(path: &Path) -> Result<ResultSet<R>, StoreError> {
    if !path.exists() {
        return Ok(ResultSet::default());
    }

    let csv_err = |e| StoreError::Csv {
        path: path.display().to_string(),
        source: e,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let rows = reader
        .deserialize::<R>()
        .collect::<Result<Vec<R>, _>>()
        .map_err(csv_err)?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded snapshot");
    Ok(ResultSet::from_rows(rows))
}

/// Write `set` to `path` through a sibling temp file and an atomic rename,
/// so an interrupted write leaves the previous snapshot intact.
///
/// # Errors
///
/// Returns [`StoreError`] if the directory, temp file, or rename fails.
pub fn persist_file<R: Record>(path: &Path, set: &ResultSet<R>) -> Result<(), StoreError> {
    let shown = path.display().to_string();
    let io_err = |e| StoreError::Io {
        path: shown.clone(),
        source: e,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(io_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        for row in set.rows() {
            writer.serialize(row).map_err(|e| StoreError::Csv {
                path: shown.clone(),
                source: e,
            })?;
        }
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file_mut().flush().map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(path = %shown, rows = set.len(), "persisted snapshot");
    Ok(())
}
