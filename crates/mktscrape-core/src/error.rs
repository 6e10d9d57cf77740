use thiserror::Error;

/// Configuration problems. All of these are fatal and surface before any
/// fetching starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required config field: {0}")]
    MissingField(String),

    #[error("invalid value for config field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("failed to read aliases file {path}: {source}")]
    AliasesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse aliases file: {0}")]
    AliasesFileParse(#[from] serde_yaml::Error),

    #[error("failed to read names list {path}: {source}")]
    NamesFile {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("names list {path} has no column named \"{column}\"")]
    MissingColumn { path: String, column: String },

    #[error("config validation error: {0}")]
    Validation(String),
}
