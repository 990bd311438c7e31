use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app::error::MigrateError;

/// Default location relative to the invocation directory.
const LOCAL_CONFIG: &str = "cfg/config.toml";
/// Per-user fallback lives under `~/.config/<this>/config.toml`.
const USER_CONFIG_DIR: &str = "general2proxmox";

#[derive(Deserialize, Debug)]
pub struct Config {
    pub repos: RepoConfig,
}

/// The `[repos]` table: where to migrate from and to, and what to keep.
#[derive(Deserialize, Debug)]
pub struct RepoConfig {
    /// Source repository whose history gets filtered.
    pub general: String,
    /// Template repository the filtered history is merged into.
    pub proxmox_upstream: String,
    /// Repository the result is pushed to.
    pub proxmox_origin: String,
    /// Files and directories to keep, in curation order.
    pub files: Vec<String>,
    /// Rename-detection matches that are not part of the proxmox lineage.
    #[serde(default)]
    pub false_positives: Vec<String>,
}

/// Pick the config file to read: an explicit `--config` path wins, then
/// `cfg/config.toml` next to the invocation, then the per-user copy.
pub fn locate(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return local;
    }

    if let Some(home) = dirs::home_dir() {
        let user = home.join(".config").join(USER_CONFIG_DIR).join("config.toml");
        if user.exists() {
            return user;
        }
    }

    local
}

pub fn load(path: &Path) -> Result<Config, MigrateError> {
    let raw = fs::read_to_string(path).map_err(|source| MigrateError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| MigrateError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
