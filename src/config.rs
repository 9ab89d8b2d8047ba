//! Configuration management
//!
//! Optional INI file (~/.ttsd.cfg) supplying session defaults and the
//! engine backend selection. Positional command-line arguments override
//! anything set here.

use crate::{Result, TtsdError};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Default voice identifier
pub const DEFAULT_VOICE: &str = "M1";
/// Default language code
pub const DEFAULT_LANGUAGE: &str = "ko";
/// Default speed factor
pub const DEFAULT_SPEED: f32 = 1.05;
/// Default synthesis step count
pub const DEFAULT_STEPS: u32 = 5;
/// Default engine backend name
pub const DEFAULT_BACKEND: &str = "espeak";

/// Daemon configuration
///
/// Holds the parsed INI storage plus the path it was loaded from.
/// All access goes through typed getters that fall back to the
/// built-in defaults.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.ttsd.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location or create it
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path, writing a default file
    /// if none exists yet
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| TtsdError::Config(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| TtsdError::Config(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Get config file path (~/.ttsd.cfg)
    fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".ttsd.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("voice", DEFAULT_VOICE)
            .set("language", DEFAULT_LANGUAGE)
            .set("speed", DEFAULT_SPEED.to_string())
            .set("steps", DEFAULT_STEPS.to_string());

        ini.with_section(Some("engine"))
            .set("backend", DEFAULT_BACKEND);

        ini
    }

    /// Initial voice identifier
    pub fn voice(&self) -> String {
        self.get_string("speech", "voice", DEFAULT_VOICE)
    }

    /// Initial language code
    pub fn language(&self) -> String {
        self.get_string("speech", "language", DEFAULT_LANGUAGE)
    }

    /// Initial speed factor
    pub fn speed(&self) -> f32 {
        self.get_f32("speech", "speed", DEFAULT_SPEED)
    }

    /// Initial synthesis step count
    pub fn steps(&self) -> u32 {
        self.get_u32("speech", "steps", DEFAULT_STEPS)
    }

    /// Engine backend name
    pub fn backend(&self) -> String {
        self.get_string("engine", "backend", DEFAULT_BACKEND)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a float value from config
    pub fn get_f32(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get an integer value from config
    pub fn get_u32(&self, section: &str, key: &str, default: u32) -> u32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
