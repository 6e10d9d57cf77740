//! Per-command JSON run configuration files.
//!
//! Every key is required; a missing key fails before any fetching. Relative
//! paths are resolved against the directory containing the config file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::record::Direction;
use crate::ConfigError;

/// Which Reddit data kinds a run collects (`choice` key).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedditChoice {
    Comments,
    Submissions,
    Both,
}

impl RedditChoice {
    /// Map the numeric `choice` value (0, 1, 2).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for any other value.
    pub fn from_code(code: u8) -> Result<Self, ConfigError> {
        match code {
            0 => Ok(Self::Comments),
            1 => Ok(Self::Submissions),
            2 => Ok(Self::Both),
            other => Err(ConfigError::InvalidField {
                field: "choice".to_string(),
                reason: format!("expected 0, 1, or 2, got {other}"),
            }),
        }
    }

    #[must_use]
    pub fn includes_comments(self) -> bool {
        matches!(self, Self::Comments | Self::Both)
    }

    #[must_use]
    pub fn includes_submissions(self) -> bool {
        matches!(self, Self::Submissions | Self::Both)
    }
}

#[derive(Debug, Deserialize)]
struct RawRedditConfig {
    names_path: PathBuf,
    column_name: String,
    comments_output_folder: PathBuf,
    submissions_output_folder: PathBuf,
    fetch_newest: bool,
    n_stop: usize,
    choice: u8,
}

/// Settings for `mktscrape reddit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditRunConfig {
    pub names_path: PathBuf,
    pub column_name: String,
    pub comments_output_folder: PathBuf,
    pub submissions_output_folder: PathBuf,
    pub direction: Direction,
    /// Stop an entity once it holds more than this many rows; `0` means no limit.
    pub n_stop: usize,
    pub choice: RedditChoice,
}

impl RedditRunConfig {
    const REQUIRED: &'static [&'static str] = &[
        "names_path",
        "column_name",
        "comments_output_folder",
        "submissions_output_folder",
        "fetch_newest",
        "n_stop",
        "choice",
    ];

    /// Read and validate a Reddit run config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable, malformed, or missing a key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawRedditConfig = read_config(path, Self::REQUIRED)?;
        let base = config_dir(path);
        Ok(Self {
            names_path: base.join(raw.names_path),
            column_name: raw.column_name,
            comments_output_folder: base.join(raw.comments_output_folder),
            submissions_output_folder: base.join(raw.submissions_output_folder),
            direction: Direction::from_fetch_newest(raw.fetch_newest),
            n_stop: raw.n_stop,
            choice: RedditChoice::from_code(raw.choice)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawTrustpilotConfig {
    names_path: PathBuf,
    column_name: String,
    output_folder: PathBuf,
    n_pages: u32,
}

/// Settings for `mktscrape trustpilot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustpilotRunConfig {
    pub names_path: PathBuf,
    pub column_name: String,
    pub output_folder: PathBuf,
    /// Maximum review pages fetched per company in one run.
    pub n_pages: u32,
}

impl TrustpilotRunConfig {
    const REQUIRED: &'static [&'static str] =
        &["names_path", "column_name", "output_folder", "n_pages"];

    /// Read and validate a TrustPilot run config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable, malformed, or missing a key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawTrustpilotConfig = read_config(path, Self::REQUIRED)?;
        if raw.n_pages == 0 {
            return Err(ConfigError::InvalidField {
                field: "n_pages".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let base = config_dir(path);
        Ok(Self {
            names_path: base.join(raw.names_path),
            column_name: raw.column_name,
            output_folder: base.join(raw.output_folder),
            n_pages: raw.n_pages,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawContactsConfig {
    names_path: PathBuf,
    column_name: String,
    output_path: PathBuf,
}

/// Settings for `mktscrape contacts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsRunConfig {
    pub names_path: PathBuf,
    pub column_name: String,
    pub output_path: PathBuf,
}

impl ContactsRunConfig {
    const REQUIRED: &'static [&'static str] = &["names_path", "column_name", "output_path"];

    /// Read and validate a contacts run config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable, malformed, or missing a key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawContactsConfig = read_config(path, Self::REQUIRED)?;
        let base = config_dir(path);
        Ok(Self {
            names_path: base.join(raw.names_path),
            column_name: raw.column_name,
            output_path: base.join(raw.output_path),
        })
    }
}

/// Default selector for member-directory listing pages.
pub const DEFAULT_DIRECTORY_SELECTOR: &str = "div.sponsor-logo-wrapper a[href]";

#[derive(Debug, Deserialize)]
struct RawDirectoryConfig {
    listing_url: String,
    output_path: PathBuf,
    selector: Option<String>,
}

/// Settings for `mktscrape directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRunConfig {
    pub listing_url: String,
    pub output_path: PathBuf,
    pub selector: String,
}

impl DirectoryRunConfig {
    const REQUIRED: &'static [&'static str] = &["listing_url", "output_path"];

    /// Read and validate a directory run config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable, malformed, or missing a key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawDirectoryConfig = read_config(path, Self::REQUIRED)?;
        Ok(Self {
            listing_url: raw.listing_url,
            output_path: config_dir(path).join(raw.output_path),
            selector: raw
                .selector
                .unwrap_or_else(|| DEFAULT_DIRECTORY_SELECTOR.to_string()),
        })
    }
}

fn config_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn read_config<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileIo {
        path: display.clone(),
        source: e,
    })?;
    parse_config(&content, &display, required)
}

fn parse_config<T: DeserializeOwned>(
    content: &str,
    display: &str,
    required: &[&str],
) -> Result<T, ConfigError> {
    let parse_err = |e| ConfigError::ConfigFileParse {
        path: display.to_string(),
        source: e,
    };

    let map: Map<String, Value> = serde_json::from_str(content).map_err(parse_err)?;
    if let Some(missing) = required.iter().find(|field| !map.contains_key(**field)) {
        return Err(ConfigError::MissingField((*missing).to_string()));
    }
    serde_json::from_value(Value::Object(map)).map_err(parse_err)
}

#[cfg(test)]
#[path = "run_config_test.rs"]
mod tests;
