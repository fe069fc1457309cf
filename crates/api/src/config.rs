use std::path::PathBuf;
use std::str::FromStr;

use ports_core::simulation::DEFAULT_DATAPACKAGE;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Root directory for uploaded files and simulation result folders.
    pub upload_path: PathBuf,
    /// Base URL of the simulation service.
    pub simulation_url: String,
    /// Datapackage passed to every simulation run.
    pub simulation_datapackage: String,
    /// Request body limit, applied to multipart uploads.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `UPLOAD_PATH`            | `storage/uploads`          |
    /// | `SIMULATION_URL`         | `http://localhost:8000`    |
    /// | `SIMULATION_DATAPACKAGE` | `dispatch`                 |
    /// | `MAX_UPLOAD_BYTES`       | `52428800`                 |
    ///
    /// Panics on values that do not parse, so misconfiguration fails at
    /// startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = parse_env("PORT", "3000");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30");
        let shutdown_timeout_secs: u64 = parse_env("SHUTDOWN_TIMEOUT_SECS", "30");
        let upload_path = PathBuf::from(env_or("UPLOAD_PATH", "storage/uploads"));

        let simulation_url = env_or("SIMULATION_URL", "http://localhost:8000")
            .trim_end_matches('/')
            .to_string();
        let simulation_datapackage = env_or("SIMULATION_DATAPACKAGE", DEFAULT_DATAPACKAGE);
        let max_upload_bytes: usize = parse_env("MAX_UPLOAD_BYTES", "52428800");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            upload_path,
            simulation_url,
            simulation_datapackage,
            max_upload_bytes,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env<T>(key: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_or(key, default);
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>()))
}
