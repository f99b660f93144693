use std::env;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_MAX_VIEWERS: usize = 80;

/// Operator-facing knobs, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Process-wide cap on concurrent viewers per room. Rooms may carry an
    /// override, see `AdmissionController`.
    pub max_viewers: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("PORT", DEFAULT_PORT),
            max_viewers: env_parsed("MAX_VIEWERS", DEFAULT_MAX_VIEWERS),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_viewers: DEFAULT_MAX_VIEWERS,
        }
    }
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
