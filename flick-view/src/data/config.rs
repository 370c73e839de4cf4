use std::{
    env::{self, VarError},
    fs::File,
    io,
    path::PathBuf,
};

use flick_core::{cache::mkdir_if_not_exists, error::Error};
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "Flick";
const CONFIG_FILENAME: &str = "config.json";
const PROXY_ENV_VAR: &str = "HTTPS_PROXY";

/// What happens to the active genre filters when another movie is opened.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    #[default]
    Keep,
    ResetOnSubjectChange,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub recommendation_count: usize,
    pub selection_policy: SelectionPolicy,
    pub cache_responses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            recommendation_count: 7,
            selection_policy: SelectionPolicy::Keep,
            cache_responses: true,
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn cache_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.cache_dir)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    pub fn load() -> Option<Config> {
        let path = Self::config_path()?;
        let file = File::open(&path).ok()?;
        log::info!("loading config: {:?}", &path);
        match serde_json::from_reader(file) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("failed to read config {:?}: {}", &path, err);
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), Error> {
        let dir = Self::config_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
        let path = dir.join(CONFIG_FILENAME);
        mkdir_if_not_exists(&dir)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Directory for cached responses, if caching is on.
    pub fn response_cache_dir(&self) -> Option<PathBuf> {
        if self.cache_responses {
            Self::cache_dir()
        } else {
            None
        }
    }

    pub fn recommendation_count(&self) -> usize {
        self.recommendation_count.max(1)
    }

    pub fn proxy() -> Option<String> {
        env::var(PROXY_ENV_VAR).map_or_else(
            |err| match err {
                VarError::NotPresent => None,
                VarError::NotUnicode(_) => {
                    log::error!("proxy URL is not a valid unicode");
                    None
                }
            },
            Some,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"selection_policy": "ResetOnSubjectChange"}"#).unwrap();
        assert_eq!(config.selection_policy, SelectionPolicy::ResetOnSubjectChange);
        assert_eq!(config.recommendation_count, 7);
        assert_eq!(config.api_url, "http://localhost:8080");
        assert!(config.cache_responses);
    }

    #[test]
    fn zero_count_is_clamped() {
        let config = Config {
            recommendation_count: 0,
            ..Config::default()
        };
        assert_eq!(config.recommendation_count(), 1);
    }

    #[test]
    fn disabled_cache_has_no_dir() {
        let config = Config {
            cache_responses: false,
            ..Config::default()
        };
        assert_eq!(config.response_cache_dir(), None);
    }
}
