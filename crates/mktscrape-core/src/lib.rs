pub mod app_config;
pub mod config;
pub mod entity;
pub mod error;
pub mod names;
pub mod record;
pub mod run_config;

pub use app_config::{AppConfig, DelayRange};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_USER_AGENT};
pub use entity::{extract_domain, load_variation_rules, Entity, VariationRules};
pub use error::ConfigError;
pub use names::load_names_list;
pub use record::{Bookmark, Direction, Record};
pub use run_config::{
    ContactsRunConfig, DirectoryRunConfig, RedditChoice, RedditRunConfig, TrustpilotRunConfig,
    DEFAULT_DIRECTORY_SELECTOR,
};
