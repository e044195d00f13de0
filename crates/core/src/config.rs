//! Store configuration
//!
//! Defaults can be overridden through environment variables:
//! - `TASKPAD_DATA_DIR`: root directory for the collection and media files
//! - `TASKPAD_MAX_MEDIA_MB`: attachment size cap in MiB

use std::path::PathBuf;

/// Key under which the whole task collection is stored
pub const TASKS_KEY: &str = "@tasks";

/// Default attachment size cap (10 MiB)
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 10 * 1024 * 1024;

const DATA_DIR_ENV: &str = "TASKPAD_DATA_DIR";
const MAX_MEDIA_MB_ENV: &str = "TASKPAD_MAX_MEDIA_MB";

/// Configuration for the task store and media import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root of all app-private data
    pub data_dir: PathBuf,
    /// Directory (relative to `data_dir`) holding imported attachments
    pub media_dir_name: String,
    /// Largest attachment accepted from the library picker
    pub max_media_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".taskpad-data"),
            media_dir_name: "media".to_string(),
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
        }
    }
}

impl StoreConfig {
    /// Build a config rooted at the given data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Build a config from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_ENV) {
            let dir = dir.trim();
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(raw) = lookup(MAX_MEDIA_MB_ENV) {
            let bytes = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|mb| *mb > 0)
                .and_then(|mb| mb.checked_mul(1024 * 1024));
            match bytes {
                Some(bytes) => config.max_media_bytes = bytes,
                None => tracing::warn!(
                    "Ignoring invalid {}={:?}, using {} bytes",
                    MAX_MEDIA_MB_ENV,
                    raw,
                    config.max_media_bytes
                ),
            }
        }

        config
    }

    /// Directory where imported attachments are written
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir.join(&self.media_dir_name)
    }

    /// Directory backing the key-value entries
    pub fn kv_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.max_media_bytes, 10 * 1024 * 1024);
        assert_eq!(config.media_dir(), PathBuf::from(".taskpad-data/media"));
    }

    #[test]
    fn test_env_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("TASKPAD_DATA_DIR", " /tmp/tp "),
            ("TASKPAD_MAX_MEDIA_MB", "25"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tp"));
        assert_eq!(config.max_media_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_env_falls_back() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("TASKPAD_DATA_DIR", "   "),
            ("TASKPAD_MAX_MEDIA_MB", "lots"),
        ]));
        assert_eq!(config, StoreConfig::default());

        let config = StoreConfig::from_lookup(lookup_from(&[("TASKPAD_MAX_MEDIA_MB", "0")]));
        assert_eq!(config.max_media_bytes, DEFAULT_MAX_MEDIA_BYTES);

        let config = StoreConfig::from_lookup(lookup_from(&[(
            "TASKPAD_MAX_MEDIA_MB",
            "18000000000000",
        )]));
        assert_eq!(config.max_media_bytes, DEFAULT_MAX_MEDIA_BYTES);
    }
}
