use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub rclone: RcloneConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("my_files.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RcloneConfig {
    /// Explicit path to the rclone config file. When unset, `$RCLONE_CONFIG`
    /// is consulted, then the conventional `~/.config/rclone/rclone.conf`.
    #[serde(default)]
    pub config_path: Option<PathBuf>,

    /// Name of (or path to) the rclone executable.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Remotes to index. Empty means every remote in the rclone config.
    /// Accepts a list or a comma-separated string.
    #[serde(default, deserialize_with = "string_or_list")]
    pub remotes: Vec<String>,

    /// Directories to index within each remote. Empty means the remote root.
    /// Accepts a list or a comma-separated string.
    #[serde(default, deserialize_with = "string_or_list")]
    pub dirs: Vec<String>,
}

impl Default for RcloneConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            binary: default_binary(),
            remotes: Vec::new(),
            dirs: Vec::new(),
        }
    }
}

fn default_binary() -> String {
    "rclone".to_string()
}

/// Accept either `["a", "b"]` or `"a, b"` and trim out empty entries.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Csv(String),
    }

    let entries = match Raw::deserialize(deserializer)? {
        Raw::List(list) => list,
        Raw::Csv(csv) => csv.split(',').map(str::to_string).collect(),
    };

    Ok(entries
        .iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect())
}

impl Config {
    /// Resolve the rclone config file location: explicit setting, then the
    /// `RCLONE_CONFIG` environment variable, then the conventional location
    /// under the home directory.
    pub fn rclone_config_path(&self) -> PathBuf {
        if let Some(path) = &self.rclone.config_path {
            return path.clone();
        }
        if let Ok(env_path) = std::env::var("RCLONE_CONFIG") {
            if !env_path.is_empty() {
                return PathBuf::from(env_path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("rclone")
            .join("rclone.conf")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.catalog.path.as_os_str().is_empty() {
        anyhow::bail!("catalog.path must not be empty");
    }
    if config.rclone.binary.trim().is_empty() {
        anyhow::bail!("rclone.binary must not be empty");
    }

    Ok(config)
}

/// Load the config file when it exists; otherwise fall back to defaults so
/// `rcat` works without any config file at all.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalog.path, PathBuf::from("my_files.sqlite"));
        assert_eq!(config.rclone.binary, "rclone");
        assert!(config.rclone.remotes.is_empty());
        assert!(config.rclone.dirs.is_empty());
    }

    #[test]
    fn remotes_accept_list_form() {
        let config: Config = toml::from_str(
            r#"
            [rclone]
            remotes = ["gdrive", "s3"]
            dirs = ["/photos", "docs"]
            "#,
        )
        .unwrap();
        assert_eq!(config.rclone.remotes, vec!["gdrive", "s3"]);
        assert_eq!(config.rclone.dirs, vec!["/photos", "docs"]);
    }

    #[test]
    fn remotes_accept_comma_separated_form() {
        let config: Config = toml::from_str(
            r#"
            [rclone]
            remotes = "gdrive, s3, "
            dirs = "/photos"
            "#,
        )
        .unwrap();
        assert_eq!(config.rclone.remotes, vec!["gdrive", "s3"]);
        assert_eq!(config.rclone.dirs, vec!["/photos"]);
    }

    #[test]
    fn explicit_config_path_wins() {
        let mut config = Config::default();
        config.rclone.config_path = Some(PathBuf::from("/etc/rclone.conf"));
        assert_eq!(
            config.rclone_config_path(),
            PathBuf::from("/etc/rclone.conf")
        );
    }
}
