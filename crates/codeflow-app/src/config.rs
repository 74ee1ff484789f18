use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Extra time the orchestrator waits past the HTTP timeout before giving up on the worker.
const DEADLINE_GRACE: Duration = Duration::from_secs(5);
/// Upper bound applied to `request_timeout_secs`.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub generation: GenerationSettings,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    pub graph: GraphSettings,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 60,
            generation: GenerationSettings::default(),
            database_path: None,
            graph: GraphSettings::default(),
            dark_mode: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "application/json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSettings {
    #[serde(default = "default_true")]
    pub show_minimap: bool,
    #[serde(default = "default_scale_x")]
    pub fullscreen_scale_x: f32,
    #[serde(default = "default_scale_y")]
    pub fullscreen_scale_y: f32,
}

fn default_true() -> bool {
    true
}
fn default_scale_x() -> f32 {
    2.0
}
fn default_scale_y() -> f32 {
    1.8
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            show_minimap: true,
            fullscreen_scale_x: default_scale_x(),
            fullscreen_scale_y: default_scale_y(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("codeflow").join("config.json"))
    }

    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::info!("No config directory available, using default config");
                Self::default()
            }
        }
    }

    /// Reads `path`, falling back to defaults when it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        tracing::info!("Loading config from {:?}", path);
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Config loaded successfully");
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to parse config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::default_path()
            && let Err(e) = self.save_to(&path)
        {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, content)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.clamp(1, MAX_REQUEST_TIMEOUT_SECS))
    }

    /// How long the orchestrator lets a single analysis run.
    pub fn analysis_deadline(&self) -> Duration {
        self.request_timeout().saturating_add(DEADLINE_GRACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_settings() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash-lite");
        assert_eq!(config.generation.temperature, 0.1);
        assert_eq!(config.generation.top_p, 0.8);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.generation.max_output_tokens, 8192);
        assert_eq!(config.generation.response_mime_type, "application/json");
        assert!(config.graph.show_minimap);
        assert_eq!(config.graph.fullscreen_scale_x, 2.0);
        assert_eq!(config.graph.fullscreen_scale_y, 1.8);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"model": "gemini-2.5-pro", "graph": {"show_minimap": false}}"#)
                .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!(!config.graph.show_minimap);
        assert_eq!(config.graph.fullscreen_scale_x, 2.0);
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.dark_mode);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            request_timeout_secs: 15,
            dark_mode: false,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn test_unparseable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_deadline_exceeds_http_timeout() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
        assert!(config.analysis_deadline() > config.request_timeout());
    }

    #[test]
    fn test_huge_timeout_is_capped() {
        let config: AppConfig =
            serde_json::from_str(r#"{"request_timeout_secs": 18446744073709551615}"#).unwrap();
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(
            config.analysis_deadline(),
            Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS + 5)
        );
    }
}
