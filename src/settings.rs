use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forward_service::forward_config::DEFAULT_BODY_LIMIT;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WORKER_COUNT: usize = 4;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize, Deserialize, ValueEnum, PartialEq, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
  #[default]
  Development,
  Production,
}

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("unable to read settings file {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid settings file {}: {source}", .path.display())]
  Yaml {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },
}

/// Command line, with every flag also readable from the environment.
#[derive(Parser, Debug, Default)]
#[command(name = "forward_proxy", version, about = "Generic HTTP forwarding proxy")]
pub struct CliArgs {
  /// YAML settings file; command line and environment values take precedence.
  #[arg(long, env = "PROXY_CONF_LOCATION")]
  pub config: Option<PathBuf>,

  #[arg(long, env = "HTTP_BIND")]
  pub bind: Option<String>,

  #[arg(long, short, env = "PORT")]
  pub port: Option<u16>,

  #[arg(long, env = "HTTP_WORKER_COUNT")]
  pub workers: Option<usize>,

  #[arg(long, env = "APP_ENV", value_enum)]
  pub mode: Option<RunMode>,

  #[arg(long, env = "LOG_LEVEL")]
  pub log_level: Option<LevelFilter>,

  /// Per-call timeout of the outbound request.
  #[arg(long, env = "HTTP_TIMEOUT_SECS")]
  pub timeout_secs: Option<u64>,

  /// Largest accepted inbound body, in bytes.
  #[arg(long, env = "HTTP_BODY_LIMIT")]
  pub body_limit: Option<usize>,

  #[arg(long, env = "HTTP_PROXY_URL")]
  pub upstream_proxy: Option<String>,

  #[arg(long, env = "HTTP_PROXY_USER")]
  pub upstream_proxy_user: Option<String>,

  #[arg(long, env = "HTTP_PROXY_PASS")]
  pub upstream_proxy_pass: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
  pub bind: Option<String>,
  pub port: Option<u16>,
  pub workers: Option<usize>,
  pub mode: Option<RunMode>,
  pub log_level: Option<LevelFilter>,
  pub timeout_secs: Option<u64>,
  pub body_limit: Option<usize>,
  pub upstream_proxy: Option<String>,
  pub upstream_proxy_user: Option<String>,
  pub upstream_proxy_pass: Option<String>,
}

impl SettingsFile {
  pub fn load_from_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    let mut content = String::new();
    File::open(path)
      .and_then(|mut file| file.read_to_string(&mut content))
      .map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
      })?;

    serde_yaml::from_str(&content).map_err(|source| SettingsError::Yaml {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub bind: String,
  pub port: u16,
  pub workers: usize,
  pub mode: RunMode,
  pub log_level: LevelFilter,
  pub timeout: Duration,
  pub body_limit: usize,
  pub upstream_proxy: Option<String>,
  pub upstream_proxy_user: Option<String>,
  pub upstream_proxy_pass: Option<String>,
}

impl Settings {
  pub fn resolve(args: CliArgs) -> Result<Settings, SettingsError> {
    let file = match &args.config {
      Some(path) => SettingsFile::load_from_file(path)?,
      None => SettingsFile::default(),
    };

    Ok(Settings::layer(args, file))
  }

  /// Command line over file over defaults.
  pub fn layer(args: CliArgs, file: SettingsFile) -> Settings {
    Settings {
      bind: args.bind.or(file.bind).unwrap_or_else(|| DEFAULT_BIND.into()),
      port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
      workers: args.workers.or(file.workers).unwrap_or(DEFAULT_WORKER_COUNT),
      mode: args.mode.or(file.mode).unwrap_or_default(),
      log_level: args.log_level.or(file.log_level).unwrap_or(LevelFilter::Info),
      timeout: Duration::from_secs(args.timeout_secs.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS)),
      body_limit: args.body_limit.or(file.body_limit).unwrap_or(DEFAULT_BODY_LIMIT),
      upstream_proxy: args.upstream_proxy.or(file.upstream_proxy),
      upstream_proxy_user: args.upstream_proxy_user.or(file.upstream_proxy_user),
      upstream_proxy_pass: args.upstream_proxy_pass.or(file.upstream_proxy_pass),
    }
  }
}
