//! Remote registry: the set of remotes defined in an rclone config file.
//!
//! The config is INI-shaped — one `[section]` per remote with arbitrary
//! `key = value` settings. Settings are opaque to the catalog; only section
//! names and their enumeration matter here.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Remotes discovered in an rclone config, in file order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    remotes: Vec<(String, HashMap<String, String>)>,
}

impl Registry {
    /// Remote names in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.remotes.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.remotes.iter().any(|(n, _)| n == name)
    }

    /// The raw key/value settings for one remote.
    pub fn settings(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.remotes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, settings)| settings)
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}

/// Load the remote registry from an rclone config file.
///
/// Fails before parsing when the file does not exist, so a bad path is
/// reported as such rather than as an empty registry.
pub fn load_remotes(path: &Path) -> Result<Registry> {
    if !path.exists() {
        bail!("rclone config not found: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rclone config: {}", path.display()))?;

    let registry = parse_sections(&content);
    eprintln!("Found {} configured remotes.", registry.len());
    Ok(registry)
}

pub(crate) fn parse_sections(content: &str) -> Registry {
    let mut remotes: Vec<(String, HashMap<String, String>)> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            remotes.push((name, HashMap::new()));
        } else if let Some((key, value)) = line.split_once('=') {
            // Settings before any section header have no remote to attach to.
            if let Some((_, settings)) = remotes.last_mut() {
                settings.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    Registry { remotes }
}
