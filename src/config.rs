use crate::core::{ModelSource, RemoteSource};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    pub documents: Option<DocumentStoreSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Explicit artifact path, checked before the default names
    pub path: Option<PathBuf>,
    /// Optional download URL for the artifact
    pub url: Option<String>,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            base_dir: default_base_dir(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_base_dir() -> PathBuf { PathBuf::from(".") }
fn default_fetch_timeout_secs() -> u64 { 60 }

impl ModelSettings {
    pub fn source(&self) -> ModelSource {
        ModelSource {
            explicit_path: self.path.clone().filter(|p| !p.as_os_str().is_empty()),
            base_dir: self.base_dir.clone(),
            remote: self
                .url
                .clone()
                .filter(|u| !u.trim().is_empty())
                .map(|url| RemoteSource {
                    url,
                    timeout: Duration::from_secs(self.fetch_timeout_secs),
                }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_gemini_endpoint(),
            model: default_gemini_model(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_gemini_model() -> String { "gemini-2.5-flash-preview-05-20".to_string() }
fn default_upstream_timeout_secs() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentStoreSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with POPCAST__)
    /// 5. Legacy plain variables (MODEL_PATH, MODEL_URL, GEMINI_API_KEY, PORT)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., POPCAST__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("POPCAST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_legacy_env(settings, |key| std::env::var(key).ok())?.try_deserialize()
    }
}

/// Overlay the plain variable names deployments already set
fn apply_legacy_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = [
        ("MODEL_PATH", "model.path"),
        ("MODEL_URL", "model.url"),
        ("GEMINI_API_KEY", "gemini.api_key"),
        ("PORT", "server.port"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
