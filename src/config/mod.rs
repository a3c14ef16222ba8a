// Configuration module entry point
// Layered loading: config file < environment < CLI flags, over built-in defaults

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, LiveReloadConfig, LoggingConfig, PerformanceConfig, ServerConfig, SpaConfig,
    StaticConfig,
};

/// Well-known LiveReload protocol port
pub const LIVERELOAD_PORT: u16 = 35729;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SPASERVE"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("static_files.root", ".")?
            .set_default(
                "static_files.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("spa.prefix", "/app/")?
            .set_default("spa.index", "index.html")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("livereload.enabled", false)?
            .set_default("livereload.port", i64::from(LIVERELOAD_PORT))?
            .set_default("livereload.debounce_ms", 300)?
            .build()?;

        settings.try_deserialize()
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_cli(&mut self, port: Option<u16>, root: Option<&str>, livereload: bool) {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(root) = root {
            self.static_files.root = root.to_string();
        }
        if livereload {
            self.livereload.enabled = true;
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Directory the live-reload watcher observes
    pub fn watch_root(&self) -> &str {
        self.livereload
            .watch_dir
            .as_deref()
            .unwrap_or(&self.static_files.root)
    }
}
