//! Settings resolution: defaults, then an optional RON file, then flags and
//! environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use ragchat_engine::GatewaySettings;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Chat with an indexed document corpus", long_about = None)]
pub struct Args {
    /// RON file with connection and logging settings
    #[arg(long, env = "RAGCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the backend API (e.g. http://localhost:8080/api)
    #[arg(long, env = "RAGCHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Seconds allowed to open a connection to the backend
    #[arg(long, env = "RAGCHAT_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: Option<u64>,

    /// Seconds allowed for a whole request, answers included
    #[arg(long, env = "RAGCHAT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Where log records go
    #[arg(long, env = "RAGCHAT_LOG", value_enum)]
    pub log: Option<LogDestination>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RAGCHAT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Contents of the optional RON file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log: Option<LogDestination>,
    pub log_level: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: GatewaySettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(Args::parse())
    }

    pub fn resolve(args: Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => load_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(file, args))
    }

    /// Flags win over the file, the file wins over defaults.
    fn merge(file: FileConfig, args: Args) -> Self {
        let defaults = GatewaySettings::default();
        let base_url = args
            .base_url
            .or(file.base_url)
            .unwrap_or(defaults.base_url);
        let connect_timeout = args
            .connect_timeout_secs
            .or(file.connect_timeout_secs)
            .map_or(defaults.connect_timeout, Duration::from_secs);
        let request_timeout = args
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .map_or(defaults.request_timeout, Duration::from_secs);
        let log_level = args
            .log_level
            .or(file.log_level)
            .map_or(LevelFilter::Info, |name| chat_logging::parse_level(&name));

        Self {
            gateway: GatewaySettings {
                base_url,
                connect_timeout,
                request_timeout,
            },
            log_destination: args.log.or(file.log).unwrap_or_default(),
            log_level,
        }
    }
}

pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
