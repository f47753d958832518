/// Backend credentials configuration
///
/// Credentials come from environment variables first, then from a per-user
/// JSON config file:
/// - Linux: ~/.config/slidedeck/config.json
/// - macOS: ~/Library/Application Support/slidedeck/config.json
/// - Windows: %APPDATA%\slidedeck\config.json
use std::env;
use std::path::PathBuf;

use serde::Deserialize;

pub const ENV_BASE_URL: &str = "SLIDEDECK_BASE_URL";
pub const ENV_PROJECT_ID: &str = "SLIDEDECK_PROJECT_ID";
pub const ENV_PUBLIC_KEY: &str = "SLIDEDECK_PUBLIC_KEY";

const DEFAULT_BASE_URL: &str = "https://api.slidedeck.app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
}

/// On-disk shape; the base URL is optional there too.
#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    base_url: Option<String>,
    project_id: String,
    public_key: String,
}

impl Config {
    /// Load credentials, or None when the app is not configured yet.
    pub fn load() -> Option<Self> {
        if let Some(config) = Self::from_env() {
            return Some(config);
        }

        Self::from_file()
    }

    /// Where the config file is expected.
    pub fn file_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");

        path.push("slidedeck");
        path.push("config.json");
        path
    }

    fn from_env() -> Option<Self> {
        let project_id = env::var(ENV_PROJECT_ID).ok().filter(|v| !v.is_empty())?;
        let public_key = env::var(ENV_PUBLIC_KEY).ok().filter(|v| !v.is_empty())?;
        let base_url = env::var(ENV_BASE_URL)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Some(Self {
            base_url,
            project_id,
            public_key,
        })
    }

    fn from_file() -> Option<Self> {
        let path = Self::file_path();
        let raw = std::fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<FileConfig>(&raw) {
            Ok(file) => Some(Self {
                base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                project_id: file.project_id,
                public_key: file.public_key,
            }),
            Err(error) => {
                eprintln!("⚠️  Could not parse {}: {error}", path.display());
                None
            }
        }
    }
}
