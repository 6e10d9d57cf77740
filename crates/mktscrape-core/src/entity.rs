//! Entities and their search-query name variations.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Curated synonyms for keys whose spaced form is not derivable from the key.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("playlistpush", "playlist push"),
    ("omarimc", "omari mc"),
    ("starlightpr1", "starlight pr"),
    ("planetarygroup", "planetary group"),
    ("indiemusicacademy", "indie music academy"),
    ("submithub", "submit hub"),
    ("soundcamps", "soundcampaign"),
];

/// Keys searched verbatim, without the automatic `-` to space variation.
const DEFAULT_DENY: &[&str] = &["one-submit"];

/// A company or brand being researched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Filename-safe lookup key, e.g. `playlistpush`.
    pub key: String,
    /// The identifier exactly as it appeared in the input list.
    pub raw: String,
    /// Website URL when the identifier was a URL.
    pub url: Option<String>,
    /// Host without `www.`, e.g. `playlistpush.com`.
    pub domain: Option<String>,
    /// Query strings to search for, in priority order.
    pub variations: Vec<String>,
}

impl Entity {
    /// Resolve a raw identifier (URL or free-text name) into an entity.
    #[must_use]
    pub fn resolve(raw: &str, rules: &VariationRules) -> Self {
        let trimmed = raw.trim();
        let domain = extract_domain(trimmed);
        let key = match &domain {
            Some(domain) => sanitize_key(domain_stem(domain)),
            None => sanitize_key(&name_key(trimmed)),
        };
        let variations = rules.variations(&key);

        Self {
            key,
            raw: trimmed.to_string(),
            url: domain.as_ref().map(|_| trimmed.to_string()),
            domain,
            variations,
        }
    }
}

/// Alias table and deny-list used to expand a key into search queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VariationRules {
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub deny: HashSet<String>,
}

impl VariationRules {
    /// The alias table and deny-list shipped with the collectors.
    #[must_use]
    pub fn builtin() -> Self {
        let mut aliases: HashMap<String, Vec<String>> = HashMap::new();
        for (key, alias) in DEFAULT_ALIASES {
            aliases
                .entry((*key).to_string())
                .or_default()
                .push((*alias).to_string());
        }
        Self {
            aliases,
            deny: DEFAULT_DENY.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Expand `key` into its search variations.
    ///
    /// `[key, key with '-' as ' ', aliases...]`, deduplicated in order.
    /// Deny-listed keys yield `[key]` alone.
    #[must_use]
    pub fn variations(&self, key: &str) -> Vec<String> {
        if self.deny.contains(key) {
            return vec![key.to_string()];
        }

        let mut variations = vec![key.to_string(), key.replace('-', " ")];
        if let Some(extra) = self.aliases.get(key) {
            variations.extend(extra.iter().cloned());
        }

        let mut seen = HashSet::new();
        variations.retain(|v| !v.trim().is_empty() && seen.insert(v.clone()));
        variations
    }
}

/// Load variation rules from a YAML file with `aliases:` and `deny:` keys.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_variation_rules(path: &Path) -> Result<VariationRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AliasesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let rules: VariationRules = serde_yaml::from_str(&content)?;
    Ok(rules)
}

/// Host of a URL-like identifier, lowercased and without `www.` or port.
///
/// Returns `None` for identifiers without a `scheme://` prefix.
#[must_use]
pub fn extract_domain(raw: &str) -> Option<String> {
    let (_, rest) = raw.split_once("://")?;
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Domain without its top-level label: `playlistpush.com` → `playlistpush`.
fn domain_stem(domain: &str) -> &str {
    domain.rsplit_once('.').map_or(domain, |(stem, _)| stem)
}

fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;
