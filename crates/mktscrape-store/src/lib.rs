//! Incremental merge store: CSV snapshots keyed by entity, merged by row id.

pub mod csv_store;
pub mod result_set;

use thiserror::Error;

pub use csv_store::{load_file, persist_file, CsvStore};
pub use result_set::{MergeOutcome, ResultSet};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}
