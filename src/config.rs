use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_VOLUME: &str = "0.3";

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the gallery API, without a trailing slash
    pub api_url: String,
    /// Initial background music volume (0.0 - 1.0)
    pub volume: f32,
    /// Where the logged-in user is remembered between runs
    pub session_path: PathBuf,
    /// Path to open on startup (e.g. "/gallery")
    pub start_path: String,
}

impl Config {
    pub fn load() -> Self {
        let api_url: String = try_load("MEMORY_LANE_API_URL", DEFAULT_API_URL);
        let volume: f32 = try_load("MEMORY_LANE_VOLUME", DEFAULT_VOLUME);

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            volume: volume.clamp(0.0, 1.0),
            session_path: session_path(),
            start_path: env::args().nth(1).unwrap_or_else(|| "/".to_string()),
        }
    }
}

/// Session file location:
/// - Linux: ~/.local/share/memory-lane/session.json
/// - macOS: ~/Library/Application Support/memory-lane/session.json
/// - Windows: %APPDATA%\memory-lane\session.json
fn session_path() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("memory-lane");
    path.push("session.json");
    path
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("{key} not set, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| default.to_string());

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
                .parse()
                .unwrap_or_else(|_| unreachable!("default for {key} must parse"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_falls_back_to_default() {
        env::set_var("MEMORY_LANE_TEST_VOLUME", "loud");
        let volume: f32 = try_load("MEMORY_LANE_TEST_VOLUME", "0.3");
        assert_eq!(volume, 0.3);
        env::remove_var("MEMORY_LANE_TEST_VOLUME");
    }

    #[test]
    fn test_missing_value_uses_default() {
        let url: String = try_load("MEMORY_LANE_TEST_UNSET_URL", DEFAULT_API_URL);
        assert_eq!(url, "http://localhost:8080");
    }

    #[test]
    fn test_session_path_is_named() {
        let path = session_path();
        assert!(path.ends_with("memory-lane/session.json"));
    }
}
