//! Configuration module for MCP-Agent
//!
//! Handles loading settings from YAML files, `.env` files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::info;

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Secrets file mounted by container deployments
const MOUNTED_ENV_PATH: &str = "/secrets/.env";

/// Initialize global settings
pub fn init(settings: Settings) -> Result<&'static Settings> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))?;
    Ok(get())
}

/// Get a reference to the global settings
pub fn get() -> &'static Settings {
    SETTINGS.get_or_init(Settings::default)
}

/// Check if settings have been initialized
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}

/// Load `.env` values into the process environment
///
/// Returns the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    let mounted = Path::new(MOUNTED_ENV_PATH);
    if mounted.exists() {
        return dotenvy::from_path_override(mounted)
            .ok()
            .map(|_| mounted.to_path_buf());
    }
    dotenvy::dotenv_override().ok()
}

/// Load settings from an explicit file, the usual locations, or defaults,
/// then merge environment variables
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match locate(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("MCP_AGENT_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("mcp-agent/settings.yml"));
    }
    candidates.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "general:\n  instance_name: Test Instance").unwrap();

        let settings = load(Some(file.path())).unwrap();
        assert_eq!(settings.general.instance_name, "Test Instance");
    }

    #[test]
    fn test_load_rejects_negative_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search:\n  timeout: -5").unwrap();

        let err = load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("search.timeout"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = load(Some(Path::new("/nonexistent/settings.yml")));
        assert!(result.is_err());
    }
}
