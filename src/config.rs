//! Layered configuration: defaults, config files, then environment.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{error::AnalysisError, models::Preset};

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "TEXT_ANALYZER_";
/// Backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Default minimum word length for the frequency filter.
pub const DEFAULT_MIN_WORD_LENGTH: u32 = 4;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analysis backend
    pub base_url: String,
    /// Preset selected at startup
    pub preset: Preset,
    /// Minimum word length for the frequency filter
    pub min_word_length: u32,
    /// Whether the frequency filter is on
    pub filter_short_words: bool,
    /// Optional request timeout; requests wait forever when unset
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            preset: Preset::Balanced,
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
            filter_short_words: true,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// `<config dir>/text-analyzer/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("text-analyzer").join("config.json"))
    }

    /// Loads the configuration from the default file, an optional explicit
    /// file and the environment, in increasing priority.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file does not exist or if any layer
    /// holds a value of the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AnalysisError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(AnalysisError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
        }

        let files = Self::default_path()
            .into_iter()
            .chain(explicit.map(Path::to_path_buf));
        Ok(Self::figment(files).extract()?)
    }

    /// Builds the provider stack over the given files.
    pub fn figment(files: impl IntoIterator<Item = PathBuf>) -> Figment {
        let figment = files
            .into_iter()
            .fold(Figment::from(Serialized::defaults(Config::default())), |figment, path| {
                let yaml = matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml" | "yml")
                );
                if yaml {
                    figment.merge(Yaml::file(path))
                } else {
                    figment.merge(Json::file(path))
                }
            });
        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}
