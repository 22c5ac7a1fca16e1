use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

/// Default config file name, read from the working directory.
pub const CONFIG_FILE: &str = "folio.toml";

pub const DEFAULT_KEY_PREFIX: &str = "portfolio";

/// Words rejected in comment names and bodies (case-insensitive substring match).
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "fuck", "shit", "bitch", "asshole", "damn", "hell", "idiot", "stupid", "crap", "suck",
];

/// Comment bodies dropped from stored lists on load.
pub const DEFAULT_LEGACY_PURGE: &[&str] = &["hihihbu"];

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SocialConfig {
    pub storage: StorageConfig,
    pub keys: KeyConfig,
    pub moderation: ModerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// "memory", "sqlite" or "mongodb"
    pub backend: String,
    /// SQLite database file
    pub path: String,
    pub uri: String,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: "memory".to_string(),
            path: "data/folio.db".to_string(),
            uri: "mongodb://localhost:27017".to_string(),
            database: "folio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub prefix: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub blocklist: Vec<String>,
    pub legacy_purge: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        ModerationConfig {
            blocklist: DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect(),
            legacy_purge: DEFAULT_LEGACY_PURGE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SocialConfig {
    /// Read config from a TOML file. A missing file yields defaults; a file
    /// that exists but does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(format!("Failed to read {}: {}", path.display(), e)),
        };
        let config = Self::parse(&raw).map_err(|e| format!("{}: {}", path.display(), e))?;
        info!(
            "Loaded {} (backend {}, prefix {})",
            path.display(),
            config.storage.backend,
            config.keys.prefix
        );
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let config: SocialConfig = toml::from_str(raw).map_err(|e| e.to_string())?;
        if config.keys.prefix.is_empty() {
            warn!("Empty key prefix; storage keys will start with '_'");
        }
        Ok(config)
    }
}
