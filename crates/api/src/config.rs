//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `COLLABORATOR_TIMEOUT_MS` — per-call timeout for catalog, payment and
///   notification calls (default: `5000`)
/// - `HOUSEKEEPING_INTERVAL_SECS` — period of the expiry/completion sweep
///   (default: `3600`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub collaborator_timeout_ms: u64,
    pub housekeeping_interval_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            collaborator_timeout_ms: std::env::var("COLLABORATOR_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            housekeeping_interval_secs: std::env::var("HOUSEKEEPING_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the collaborator timeout as a [`std::time::Duration`].
    pub fn collaborator_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.collaborator_timeout_ms)
    }

    /// Returns the housekeeping period as a [`std::time::Duration`].
    pub fn housekeeping_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.housekeeping_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            collaborator_timeout_ms: 5000,
            housekeeping_interval_secs: 3600,
        }
    }
}
