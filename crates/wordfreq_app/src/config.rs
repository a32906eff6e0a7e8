use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wordfreq_engine::{
    EmptyTokens, EngineSettings, FetchSettings, PipelineSettings, DEFAULT_LIMIT,
    DEFAULT_SOURCE_URL,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub url: String,
    pub limit: usize,
    pub output_dir: PathBuf,
    pub drop_empty_tokens: bool,
    pub write_manifest: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            output_dir: PathBuf::from("output"),
            drop_empty_tokens: false,
            write_manifest: true,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
        }
    }
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_bytes: self.max_bytes,
                ..FetchSettings::default()
            },
            pipeline: PipelineSettings {
                limit: self.limit,
                empty_tokens: if self.drop_empty_tokens {
                    EmptyTokens::Drop
                } else {
                    EmptyTokens::Keep
                },
            },
        }
    }
}

/// Load a RON config file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_info!("No config at {:?}, using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("wordfreq.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wordfreq.ron");
        fs::write(&path, "(limit: 5, drop_empty_tokens: true)").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.limit, 5);
        assert!(config.drop_empty_tokens);
        assert_eq!(config.url, DEFAULT_SOURCE_URL);

        let settings = config.engine_settings();
        assert_eq!(settings.pipeline.limit, 5);
        assert_eq!(settings.pipeline.empty_tokens, EmptyTokens::Drop);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wordfreq.ron");
        fs::write(&path, "(limit: \"many\")").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn round_trips_through_ron() {
        let config = AppConfig {
            limit: 3,
            ..AppConfig::default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new()).unwrap();
        assert_eq!(ron::from_str::<AppConfig>(&text).unwrap(), config);
    }
}
