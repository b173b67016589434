use crate::defaults;
use crate::error::{Result, VoxlateError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub service: ServiceConfig,
    pub session: SessionConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
    pub sample_rate: u32,
}

/// Remote speech service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Session language configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub source_language: String,
    pub target_language: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::SERVICE_URL.to_string(),
            timeout_ms: defaults::REQUEST_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(VoxlateError::Io(io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(e) => {
                panic!("Failed to load config from {}: {}", path.display(), e);
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXLATE_SERVICE_URL → service.base_url
    /// - VOXLATE_SOURCE_LANG → session.source_language
    /// - VOXLATE_TARGET_LANG → session.target_language
    /// - VOXLATE_AUDIO_DEVICE → audio.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("VOXLATE_SERVICE_URL")
            && !url.is_empty()
        {
            self.service.base_url = url;
        }

        if let Ok(lang) = std::env::var("VOXLATE_SOURCE_LANG")
            && !lang.is_empty()
        {
            self.session.source_language = lang;
        }

        if let Ok(lang) = std::env::var("VOXLATE_TARGET_LANG")
            && !lang.is_empty()
        {
            self.session.target_language = lang;
        }

        if let Ok(device) = std::env::var("VOXLATE_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voxlate/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("voxlate")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_voxlate_env() {
        remove_env("VOXLATE_SERVICE_URL");
        remove_env("VOXLATE_SOURCE_LANG");
        remove_env("VOXLATE_TARGET_LANG");
        remove_env("VOXLATE_AUDIO_DEVICE");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.audio.device, None);
        assert_eq!(config.audio.sample_rate, 16000);

        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.timeout_ms, 30000);

        assert_eq!(config.session.source_language, "en");
        assert_eq!(config.session.target_language, "fr");
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [audio]
            device = "hw:0,0"
            sample_rate = 48000

            [service]
            base_url = "http://translator.local:9000"
            timeout_ms = 5000

            [session]
            source_language = "de"
            target_language = "es"
        "#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.audio.device.as_deref(), Some("hw:0,0"));
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.service.base_url, "http://translator.local:9000");
        assert_eq!(config.service.timeout_ms, 5000);
        assert_eq!(config.session.source_language, "de");
        assert_eq!(config.session.target_language, "es");
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let toml_content = r#"
            [session]
            target_language = "hi"
        "#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.session.source_language, "en");
        assert_eq!(config.session.target_language, "hi");
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not [valid toml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/voxlate.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_voxlate_env();

        set_env("VOXLATE_SERVICE_URL", "http://10.0.0.2:8000");
        set_env("VOXLATE_SOURCE_LANG", "ru");
        set_env("VOXLATE_TARGET_LANG", "ar");
        set_env("VOXLATE_AUDIO_DEVICE", "pipewire");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.service.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.session.source_language, "ru");
        assert_eq!(config.session.target_language, "ar");
        assert_eq!(config.audio.device.as_deref(), Some("pipewire"));

        clear_voxlate_env();
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_voxlate_env();

        set_env("VOXLATE_SERVICE_URL", "");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.service.base_url, "http://localhost:8000");

        clear_voxlate_env();
    }

    #[test]
    fn test_service_timeout_duration() {
        let config = ServiceConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 1500,
        };
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
