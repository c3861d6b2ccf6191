//! Storage configuration for the roster database.
//!
//! # Responsibility
//! - Resolve the database location and cache mode from startup settings.
//! - Fail startup loudly when a required setting is absent.
//!
//! # Invariants
//! - No compiled-in fallback path exists; the database location always comes
//!   from configuration supplied at construction time.
//! - Both startup settings are required; a missing one is a fatal error.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Name of the required connection-string setting.
pub const CONNECTION_STRING_SETTING: &str = "RosterDatabase";

/// Name of the required database-file setting.
pub const DATABASE_FILE_SETTING: &str = "SQLiteDatabaseFile";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required startup setting is absent. Fatal.
    MissingSetting(&'static str),
    /// A connection-string fragment is not a `key=value` pair.
    MalformedConnectionString(String),
    /// The resolved database path is empty.
    EmptyDatabasePath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSetting(name) => {
                write!(f, "required setting `{name}` is not set")
            }
            Self::MalformedConnectionString(fragment) => {
                write!(f, "connection string fragment `{fragment}` is not key=value")
            }
            Self::EmptyDatabasePath => write!(f, "resolved database path is empty"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved storage configuration consumed by `db::open_db`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub shared_cache: bool,
}

impl StorageConfig {
    /// Builds a configuration pointing at an explicit database path.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            shared_cache: false,
        }
    }

    /// Resolves configuration from the two required startup settings.
    ///
    /// The connection string uses `Data Source=<path>;Cache=Shared` form;
    /// unknown pairs are ignored. When it names no `Data Source`, the
    /// database-file setting supplies the path.
    ///
    /// # Errors
    /// - `MissingSetting` when either setting is absent.
    /// - `MalformedConnectionString` on a fragment without `=`.
    /// - `EmptyDatabasePath` when neither source yields a path.
    pub fn from_settings(
        connection_string: Option<&str>,
        database_file: Option<&str>,
    ) -> ConfigResult<Self> {
        let connection_string =
            connection_string.ok_or(ConfigError::MissingSetting(CONNECTION_STRING_SETTING))?;
        let database_file =
            database_file.ok_or(ConfigError::MissingSetting(DATABASE_FILE_SETTING))?;

        let mut data_source: Option<String> = None;
        let mut shared_cache = false;

        for fragment in connection_string
            .split(';')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
        {
            let (key, value) = fragment
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedConnectionString(fragment.to_string()))?;

            match key.trim().to_ascii_lowercase().as_str() {
                "data source" => data_source = Some(value.trim().to_string()),
                "cache" => shared_cache = value.trim().eq_ignore_ascii_case("shared"),
                _ => {}
            }
        }

        let database_path =
            PathBuf::from(data_source.unwrap_or_else(|| database_file.trim().to_string()));
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        info!(
            "event=config_load module=config status=ok shared_cache={shared_cache} database_path={}",
            database_path.display()
        );

        Ok(Self {
            database_path,
            shared_cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, StorageConfig, CONNECTION_STRING_SETTING, DATABASE_FILE_SETTING,
    };
    use std::path::PathBuf;

    #[test]
    fn from_settings_parses_data_source_and_shared_cache() {
        let config = StorageConfig::from_settings(
            Some("Data Source=/var/lib/roster/roster.db;Cache=Shared"),
            Some("/var/lib/roster/roster.db"),
        )
        .unwrap();

        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/roster/roster.db")
        );
        assert!(config.shared_cache);
    }

    #[test]
    fn missing_connection_string_is_fatal() {
        let err = StorageConfig::from_settings(None, Some("/tmp/roster.db")).unwrap_err();
        assert_eq!(err, ConfigError::MissingSetting(CONNECTION_STRING_SETTING));
    }

    #[test]
    fn missing_database_file_is_fatal() {
        let err =
            StorageConfig::from_settings(Some("Data Source=/tmp/roster.db"), None).unwrap_err();
        assert_eq!(err, ConfigError::MissingSetting(DATABASE_FILE_SETTING));
    }

    #[test]
    fn database_file_setting_backfills_missing_data_source() {
        let config =
            StorageConfig::from_settings(Some("Cache=Private"), Some("/tmp/fallback.db")).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/fallback.db"));
        assert!(!config.shared_cache);
    }

    #[test]
    fn malformed_connection_string_fragment_is_rejected() {
        let err = StorageConfig::from_settings(Some("Data Source"), Some("/tmp/roster.db"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MalformedConnectionString(_)));
    }

    #[test]
    fn empty_path_from_both_sources_is_rejected() {
        let err = StorageConfig::from_settings(Some("Cache=Shared"), Some("   ")).unwrap_err();
        assert_eq!(err, ConfigError::EmptyDatabasePath);
    }
}
