use std::fs;

use super::*;

fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

const REDDIT_JSON: &str = r#"{
    "names_path": "data/music_services.csv",
    "column_name": "music_services",
    "comments_output_folder": "out/comments",
    "submissions_output_folder": "out/submissions",
    "fetch_newest": false,
    "n_stop": 1000,
    "choice": 2
}"#;

#[test]
fn reddit_config_resolves_paths_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "reddit.json", REDDIT_JSON);

    let cfg = RedditRunConfig::load(&path).unwrap();
    assert_eq!(cfg.names_path, dir.path().join("data/music_services.csv"));
    assert_eq!(cfg.comments_output_folder, dir.path().join("out/comments"));
    assert_eq!(cfg.column_name, "music_services");
    assert_eq!(cfg.direction, Direction::Backward);
    assert_eq!(cfg.n_stop, 1000);
    assert_eq!(cfg.choice, RedditChoice::Both);
}

#[test]
fn reddit_config_missing_key_names_the_field() {
    let body = REDDIT_JSON.replace("\"n_stop\": 1000,", "");
    let result = parse_config::<RawRedditConfig>(&body, "reddit.json", RedditRunConfig::REQUIRED);
    assert!(
        matches!(result, Err(ConfigError::MissingField(ref f)) if f == "n_stop"),
        "expected MissingField(n_stop), got: {result:?}"
    );
}

#[test]
fn reddit_config_rejects_unknown_choice() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "reddit.json",
        &REDDIT_JSON.replace("\"choice\": 2", "\"choice\": 7"),
    );
    let result = RedditRunConfig::load(&path);
    assert!(
        matches!(result, Err(ConfigError::InvalidField { ref field, .. }) if field == "choice"),
        "expected InvalidField(choice), got: {result:?}"
    );
}

#[test]
fn reddit_config_wrong_type_is_parse_error() {
    let body = REDDIT_JSON.replace("\"fetch_newest\": false", "\"fetch_newest\": \"no\"");
    let result = parse_config::<RawRedditConfig>(&body, "reddit.json", RedditRunConfig::REQUIRED);
    assert!(matches!(result, Err(ConfigError::ConfigFileParse { .. })));
}

#[test]
fn missing_config_file_is_io_error() {
    let result = RedditRunConfig::load(Path::new("/no/such/reddit.json"));
    assert!(matches!(result, Err(ConfigError::ConfigFileIo { .. })));
}

#[test]
fn choice_codes() {
    assert!(RedditChoice::from_code(0).unwrap().includes_comments());
    assert!(!RedditChoice::from_code(0).unwrap().includes_submissions());
    assert!(RedditChoice::from_code(1).unwrap().includes_submissions());
    assert!(!RedditChoice::from_code(1).unwrap().includes_comments());
    let both = RedditChoice::from_code(2).unwrap();
    assert!(both.includes_comments() && both.includes_submissions());
}

#[test]
fn trustpilot_config_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "trustpilot.json",
        r#"{"names_path": "sites.csv", "column_name": "url", "output_folder": "reviews", "n_pages": 200}"#,
    );
    let cfg = TrustpilotRunConfig::load(&path).unwrap();
    assert_eq!(cfg.output_folder, dir.path().join("reviews"));
    assert_eq!(cfg.n_pages, 200);
}

#[test]
fn trustpilot_config_rejects_zero_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "trustpilot.json",
        r#"{"names_path": "sites.csv", "column_name": "url", "output_folder": "reviews", "n_pages": 0}"#,
    );
    let result = TrustpilotRunConfig::load(&path);
    assert!(
        matches!(result, Err(ConfigError::InvalidField { ref field, .. }) if field == "n_pages")
    );
}

#[test]
fn contacts_config_requires_output_path() {
    let result = parse_config::<RawContactsConfig>(
        r#"{"names_path": "sites.csv", "column_name": "url"}"#,
        "contacts.json",
        ContactsRunConfig::REQUIRED,
    );
    assert!(
        matches!(result, Err(ConfigError::MissingField(ref f)) if f == "output_path"),
        "got: {result:?}"
    );
}

#[test]
fn directory_config_defaults_selector() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "directory.json",
        r#"{"listing_url": "https://musicbiz.org/about/member-community/", "output_path": "sites.csv"}"#,
    );
    let cfg = DirectoryRunConfig::load(&path).unwrap();
    assert_eq!(cfg.selector, DEFAULT_DIRECTORY_SELECTOR);
    assert_eq!(cfg.output_path, dir.path().join("sites.csv"));
}
