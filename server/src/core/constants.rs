// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Wells";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "wells";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".wells";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "wells.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "WELLS_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "WELLS_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "WELLS_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "WELLS_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "WELLS_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override the dataset directory
pub const ENV_DATA_DIR: &str = "WELLS_DATA_DIR";

// =============================================================================
// Database Defaults
// =============================================================================

/// Directory holding `{slug}.db` files when no URL is configured
pub const DEFAULT_DATA_DIR: &str = "./data";

/// SQLite file extension for per-dataset files
pub const SQLITE_FILE_EXTENSION: &str = "db";

/// Pool size per dataset
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Seconds to wait for a free pooled connection
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Server-side statement timeout (PostgreSQL) and busy timeout (SQLite)
pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// HTTP
// =============================================================================

/// Base path for versioned endpoints
pub const API_PREFIX: &str = "/api/v1";

/// Seconds allowed for dataset pools to close after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 10;
