//! Persisted console settings.
//!
//! Stored as TOML in the user's config directory. A missing or unreadable
//! file yields the defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uac_query::{DEFAULT_LIMIT, ListQuery};
use uac_reactive::DEFAULT_DEBOUNCE;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "UAC_DB_PATH";

const SETTINGS_FILE: &str = "settings.toml";
const DATABASE_FILE: &str = "users.json";

// =============================================================================
// ERRORS
// =============================================================================

/// Failure to write the settings file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("Failed to create config directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write settings to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Console settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub list: ListSettings,
    pub storage: StorageSettings,
}

/// User list behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Page size used when the query does not name one.
    pub default_limit: u32,
    /// Quiet period before typed search text is applied, in milliseconds.
    pub search_debounce_ms: u64,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            search_debounce_ms: u64::try_from(DEFAULT_DEBOUNCE.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Where the user database lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file; the data directory's `users.json` when unset.
    pub db_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default settings file location.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Default database location.
    pub fn default_db_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    /// Database path: the command line wins, then `UAC_DB_PATH`, then the
    /// settings file, then the data directory.
    pub fn resolve_db_path(&self, cli: Option<PathBuf>) -> PathBuf {
        self.resolve_db_path_with(cli, std::env::var_os(DB_PATH_ENV))
    }

    /// [`resolve_db_path`](Self::resolve_db_path) with an explicit
    /// environment value.
    pub fn resolve_db_path_with(&self, cli: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
        cli.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
            .or_else(|| self.storage.db_path.clone())
            .unwrap_or_else(Self::default_db_path)
    }

    /// Search debounce as a duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.list.search_debounce_ms)
    }

    /// List defaults; a zero limit falls back to the built-in one.
    pub fn list_defaults(&self) -> ListQuery {
        let limit = match self.list.default_limit {
            0 => DEFAULT_LIMIT,
            limit => limit,
        };
        ListQuery {
            limit,
            ..ListQuery::default()
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "UserAdminConsole", "uac")
}
