use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::sql::Backend;
use crate::domain::datasets::SLUGS;
use crate::utils::file::{expand_path, sqlite_url};

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_DATA_DIR,
    DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DEFAULT_STATEMENT_TIMEOUT_SECS,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Per-dataset configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatasetFileConfig {
    /// `sqlite://...` or `postgres://...`
    pub url: Option<String>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Directory holding `{slug}.db` files
    pub data_dir: Option<String>,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub statement_timeout_secs: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub datasets: Option<BTreeMap<String, DatasetFileConfig>>,
    pub database: Option<DatabaseFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Datasets (per slug)
        if let Some(datasets) = other.datasets {
            let current = self.datasets.get_or_insert_with(BTreeMap::new);
            for (slug, dataset) in datasets {
                let entry = current.entry(slug).or_default();
                if dataset.url.is_some() {
                    entry.url = dataset.url;
                }
            }
        }

        // Database
        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.data_dir.is_some() {
                current.data_dir = database.data_dir;
            }
            if database.max_connections.is_some() {
                current.max_connections = database.max_connections;
            }
            if database.acquire_timeout_secs.is_some() {
                current.acquire_timeout_secs = database.acquire_timeout_secs;
            }
            if database.statement_timeout_secs.is_some() {
                current.statement_timeout_secs = database.statement_timeout_secs;
            }
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Resolved Config Structs
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection pool settings shared by every dataset store
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub data_dir: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub statement_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            statement_timeout_secs: DEFAULT_STATEMENT_TIMEOUT_SECS,
        }
    }
}

/// Final application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Connection URL per dataset slug
    pub datasets: BTreeMap<String, String>,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.wells/wells.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.wells/wells.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(cli, file_config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_datasets = file_config.datasets.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let data_dir = cli
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or(file_database.data_dir)
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let database = DatabaseConfig {
            data_dir: expand_path(&data_dir),
            max_connections: file_database
                .max_connections
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            acquire_timeout_secs: file_database
                .acquire_timeout_secs
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            statement_timeout_secs: file_database
                .statement_timeout_secs
                .unwrap_or(DEFAULT_STATEMENT_TIMEOUT_SECS),
        };

        // Unknown slugs are kept so validate() can reject them
        let mut datasets: BTreeMap<String, String> = SLUGS
            .iter()
            .map(|slug| (slug.to_string(), sqlite_url(&database.data_dir, slug)))
            .collect();
        for (slug, dataset) in file_datasets {
            if let Some(url) = dataset.url {
                datasets.insert(slug, url);
            }
        }

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let config = Self {
            server: ServerConfig { host, port },
            database,
            datasets,
            debug,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            data_dir = %config.database.data_dir.display(),
            datasets = config.datasets.len(),
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // Host must not be empty
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port must be non-zero (port 0 would cause bind failure)
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        for (slug, url) in &self.datasets {
            if !SLUGS.contains(&slug.as_str()) {
                anyhow::bail!(
                    "Configuration error: unknown dataset '{}' (expected one of: {})",
                    slug,
                    SLUGS.join(", ")
                );
            }
            if Backend::from_url(url).is_none() {
                anyhow::bail!(
                    "Configuration error: datasets.{}.url must start with sqlite:// or postgres://",
                    slug
                );
            }
        }

        Ok(())
    }

    /// Connection URL for a dataset
    pub fn dataset_url(&self, slug: &str) -> Option<&str> {
        self.datasets.get(slug).map(String::as_str)
    }
}

/// Get the profile config path (~/.wells/wells.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_file_config_parse_full() {
        let config = parse(
            r#"{
                "server": { "host": "0.0.0.0", "port": 8080 },
                "datasets": { "ontario": { "url": "postgres://wells@db/ontario" } },
                "database": { "data_dir": "/srv/wells", "max_connections": 10 },
                "debug": true
            }"#,
        );

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));
        let datasets = config.datasets.as_ref().unwrap();
        assert_eq!(
            datasets["ontario"].url.as_deref(),
            Some("postgres://wells@db/ontario")
        );
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.data_dir.as_deref(), Some("/srv/wells"));
        assert_eq!(database.max_connections, Some(10));
        assert!(database.statement_timeout_secs.is_none());
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let config = parse(r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#);
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = parse(
            r#"{
                "server": { "host": "base.host", "port": 1000 },
                "datasets": { "alberta": { "url": "sqlite://a.db" } },
                "database": { "max_connections": 2 }
            }"#,
        );
        let overlay = parse(
            r#"{
                "server": { "port": 2000 },
                "datasets": { "ontario": { "url": "postgres://db/ontario" } },
                "database": { "statement_timeout_secs": 5 },
                "debug": true
            }"#,
        );
        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));
        let datasets = base.datasets.as_ref().unwrap();
        assert_eq!(datasets.len(), 2);
        let database = base.database.as_ref().unwrap();
        assert_eq!(database.max_connections, Some(2));
        assert_eq!(database.statement_timeout_secs, Some(5));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default()).unwrap();

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(!config.debug);
        assert_eq!(config.datasets.len(), SLUGS.len());
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        let url = config.dataset_url("alberta").unwrap();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("alberta.db"));
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            port: Some(3000),
            debug: true,
            config: None,
            data_dir: Some(PathBuf::from("/var/lib/wells")),
        };
        let file = parse(
            r#"{
                "server": { "host": "file.host", "port": 9000 },
                "database": { "data_dir": "/ignored" },
                "datasets": { "ontario": { "url": "postgres://db/ontario" } }
            }"#,
        );
        let config = AppConfig::resolve(&cli, file).unwrap();

        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 3000);
        assert!(config.debug);
        assert_eq!(config.database.data_dir, PathBuf::from("/var/lib/wells"));
        assert_eq!(
            config.dataset_url("nova-scotia"),
            Some("sqlite:///var/lib/wells/nova-scotia.db")
        );
        assert_eq!(config.dataset_url("ontario"), Some("postgres://db/ontario"));
    }

    #[test]
    fn test_validation_empty_host() {
        let cli = CliConfig {
            host: Some(String::new()),
            ..Default::default()
        };
        let err = AppConfig::resolve(&cli, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validation_port_zero() {
        let cli = CliConfig {
            port: Some(0),
            ..Default::default()
        };
        let err = AppConfig::resolve(&cli, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validation_unknown_dataset() {
        let file = parse(r#"{ "datasets": { "manitoba": { "url": "sqlite://m.db" } } }"#);
        let err = AppConfig::resolve(&CliConfig::default(), file).unwrap_err();
        assert!(err.to_string().contains("manitoba"));
    }

    #[test]
    fn test_validation_unsupported_scheme() {
        let file = parse(r#"{ "datasets": { "alberta": { "url": "mssql://db/alberta" } } }"#);
        let err = AppConfig::resolve(&CliConfig::default(), file).unwrap_err();
        assert!(err.to_string().contains("datasets.alberta.url"));
    }

    #[test]
    fn test_load_from_cli_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "server": {{ "port": 7777 }} }}"#).unwrap();
        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 7777);
    }

    #[test]
    fn test_load_missing_config_path() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/wells.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
