// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticConfig,
    pub spa: SpaConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub livereload: LiveReloadConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Static file serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StaticConfig {
    /// Directory exposed as the origin for URL path resolution
    pub root: String,
    /// File names tried when a resolved path is a directory
    pub index_files: Vec<String>,
}

/// Single-page-application fallback configuration
///
/// Any request path under `prefix` whose filesystem target is a directory
/// or does not exist is answered with `<root>/<prefix>/<index>` instead.
#[derive(Debug, Deserialize, Clone)]
pub struct SpaConfig {
    /// URL prefix guarding the fallback, e.g. `/app/`
    pub prefix: String,
    /// Index file name served for fallback hits
    pub index: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Live-reload side channel configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LiveReloadConfig {
    pub enabled: bool,
    /// WebSocket port the LiveReload protocol is spoken on
    pub port: u16,
    /// Debounce window for filesystem events, in milliseconds
    pub debounce_ms: u64,
    /// Directory to watch (defaults to the served root)
    #[serde(default)]
    pub watch_dir: Option<String>,
}
