use crate::error::{Error, Result};
use crate::models::volume::VolumeConfig;
use crate::util::human::parse_size;
use crate::util::slug::volume_slug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw settings file shape, as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct Settings {
    pushover: PushoverSettings,

    #[serde(default)]
    notifications: NotificationSettings,

    #[serde(default)]
    storage: StorageSettings,

    #[serde(default)]
    volumes: Vec<VolumeSettings>,
}

#[derive(Debug, Deserialize)]
struct PushoverSettings {
    token: String,
    user:  String,
}

#[derive(Debug, Default, Deserialize)]
struct NotificationSettings {
    /// Daily cap shared across all volumes. Absent = unlimited.
    max_per_day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StorageSettings {
    /// Directory for logs, charts, and the tracking file. Relative paths
    /// resolve against the settings file's directory.
    data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data") }
    }
}

#[derive(Debug, Deserialize)]
struct VolumeSettings {
    path:         String,
    minimum_free: String,
}

/// Validated configuration with thresholds parsed and paths resolved.
#[derive(Debug, Clone)]
pub struct Config {
    pub pushover_token: String,
    pub pushover_user:  String,
    pub max_per_day:    Option<u32>,
    pub data_dir:       PathBuf,
    pub volumes:        Vec<VolumeConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read settings file {}: {e}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::load_from_str(&text, base_dir)
    }

    /// Parse and validate settings text. `base_dir` anchors a relative
    /// `storage.data_dir` (normally the settings file's directory).
    pub fn load_from_str(text: &str, base_dir: &Path) -> Result<Config> {
        let settings: Settings = toml::from_str(text)
            .map_err(|e| Error::Config(format!("invalid settings file: {e}")))?;

        if settings.pushover.token.trim().is_empty() {
            return Err(Error::Config("pushover.token must be set".into()));
        }
        if settings.pushover.user.trim().is_empty() {
            return Err(Error::Config("pushover.user must be set".into()));
        }
        if settings.volumes.is_empty() {
            return Err(Error::Config("at least one [[volumes]] entry is required".into()));
        }

        let mut seen: HashMap<String, String> = HashMap::new();
        let mut volumes = Vec::with_capacity(settings.volumes.len());
        for vol in &settings.volumes {
            if vol.path.trim().is_empty() {
                return Err(Error::Config("volumes.path must not be empty".into()));
            }
            let slug = volume_slug(&vol.path);
            if let Some(prev) = seen.insert(slug.clone(), vol.path.clone()) {
                return Err(Error::Config(format!(
                    "volumes {prev:?} and {:?} map to the same data file name {slug:?}",
                    vol.path
                )));
            }
            volumes.push(VolumeConfig {
                path: vol.path.clone(),
                minimum_free_bytes: parse_size(&vol.minimum_free)?,
            });
        }

        let data_dir = if settings.storage.data_dir.is_absolute() {
            settings.storage.data_dir
        } else {
            base_dir.join(&settings.storage.data_dir)
        };

        Ok(Config {
            pushover_token: settings.pushover.token,
            pushover_user:  settings.pushover.user,
            max_per_day:    settings.notifications.max_per_day,
            data_dir,
            volumes,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dfmon").join("dfmon.toml"))
    }
}
