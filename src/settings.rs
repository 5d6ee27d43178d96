use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BennyError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Master ledger file merges append to. Merging without one set is a
    /// settings error.
    #[serde(default)]
    pub main_ledger: Option<String>,
    /// Ledger file whose `open` directives feed `accounts search`.
    #[serde(default)]
    pub ledger_accounts_file: Option<String>,
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Extraction profile ids by profile name; "default" is the fallback.
    #[serde(default)]
    pub extraction_profiles: HashMap<String, String>,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_input_dir() -> String {
    home_join(&["Documents", "benny", "statements"])
}

fn default_output_dir() -> String {
    home_join(&["Documents", "benny", "output"])
}

fn default_service_url() -> String {
    "https://api.extractor.example.com/v1".to_string()
}

fn default_currency() -> String {
    "MXN".to_string()
}

fn home_join(parts: &[&str]) -> String {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for part in parts {
        path = path.join(part);
    }
    path.to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            main_ledger: None,
            ledger_accounts_file: None,
            service_url: default_service_url(),
            api_key: None,
            extraction_profiles: HashMap::new(),
            default_currency: default_currency(),
        }
    }
}

impl Settings {
    /// API key from settings, falling back to the BENNY_API_KEY env var.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("BENNY_API_KEY").ok())
    }

    /// Resolve a named extraction profile, falling back to "default".
    pub fn extraction_profile(&self, name: Option<&str>) -> Option<String> {
        name.and_then(|n| self.extraction_profiles.get(n))
            .or_else(|| self.extraction_profiles.get("default"))
            .cloned()
    }
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("benny")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn accounts_path() -> PathBuf {
    config_dir().join("accounts.json")
}

pub fn detailers_dir() -> PathBuf {
    config_dir().join("detailers")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BennyError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}
