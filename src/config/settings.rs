use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dns::{CLOUDFLARE_API_BASE, DEFAULT_REQUEST_TIMEOUT};
use crate::reconcile::MatchStrategy;
use crate::validate::DomainSyntax;

pub const ENV_API_TOKEN: &str = "CF_API_TOKEN";
pub const ENV_ZONE_ID: &str = "CF_ZONE_ID";
pub const ENV_RECORD_NAMES: &str = "A_RECORD_NAMES";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing required input: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
}

/// Attach the command's usage line to a missing-input error. Other errors
/// pass through unchanged.
pub fn usage_error(command: CommandKind, err: ConfigError) -> anyhow::Error {
    match err {
        ConfigError::Missing(_) => anyhow::anyhow!("{}\n{}", err, command.usage()),
        other => other.into(),
    }
}

/// Optional TOML file supplying defaults below flags and environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub log_level: Option<String>,
    pub api_base: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub zone_id: Option<String>,
    pub api_token: Option<String>,
    #[serde(default)]
    pub upsert: CommandConfig,
    #[serde(default)]
    pub delete: CommandConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    #[serde(rename = "match")]
    pub match_strategy: Option<MatchStrategy>,
    pub syntax: Option<DomainSyntax>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Lookup of environment variables; empty values count as unset.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    List,
    Upsert,
    Delete,
}

impl CommandKind {
    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::List => "Usage: arecords list (reads CF_API_TOKEN and CF_ZONE_ID)",
            CommandKind::Upsert => {
                "Usage: arecords upsert --zone=<zone_id> --names=host1,host2 --value=IP [--token=<api_token>]"
            }
            CommandKind::Delete => {
                "Usage: arecords delete --zone=<zone_id> --token=<api_token> --names=www.example.com,api.example.com"
            }
        }
    }

    /// Subcommand named on a raw command line, if any.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Option<Self> {
        args.iter().skip(1).find_map(|arg| match arg.as_ref() {
            "list" => Some(CommandKind::List),
            "upsert" => Some(CommandKind::Upsert),
            "delete" => Some(CommandKind::Delete),
            _ => None,
        })
    }

    fn default_match(&self) -> MatchStrategy {
        match self {
            CommandKind::Upsert => MatchStrategy::Prefix,
            CommandKind::List | CommandKind::Delete => MatchStrategy::Exact,
        }
    }

    fn default_syntax(&self) -> DomainSyntax {
        match self {
            CommandKind::Upsert => DomainSyntax::Relaxed,
            CommandKind::List | CommandKind::Delete => DomainSyntax::Strict,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::List => write!(f, "list"),
            CommandKind::Upsert => write!(f, "upsert"),
            CommandKind::Delete => write!(f, "delete"),
        }
    }
}

/// Values supplied on the command line. These win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub zone_id: Option<String>,
    pub api_token: Option<String>,
    pub names: Option<String>,
    pub value: Option<String>,
    pub match_strategy: Option<MatchStrategy>,
    pub syntax: Option<DomainSyntax>,
    pub api_base: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub command: CommandKind,
    pub zone_id: String,
    pub api_token: String,
    pub api_base: String,
    pub timeout: Duration,
    pub names: Option<String>,
    pub value: Option<String>,
    pub match_strategy: MatchStrategy,
    pub syntax: DomainSyntax,
}

impl Settings {
    /// Resolve every value once, in order: flag, environment, config file,
    /// built-in default. Fails listing every required value still missing.
    pub fn resolve(
        command: CommandKind,
        overrides: Overrides,
        env: &dyn EnvSource,
        file: &FileConfig,
    ) -> Result<Self, ConfigError> {
        let zone_id = overrides
            .zone_id
            .filter(|v| !v.is_empty())
            .or_else(|| env.var(ENV_ZONE_ID))
            .or_else(|| file.zone_id.clone());
        let api_token = overrides
            .api_token
            .filter(|v| !v.is_empty())
            .or_else(|| env.var(ENV_API_TOKEN))
            .or_else(|| file.api_token.clone());

        let mut names = overrides.names.filter(|v| !v.is_empty());
        if command == CommandKind::Delete {
            names = names.or_else(|| env.var(ENV_RECORD_NAMES));
        }
        let value = overrides.value.filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        if zone_id.is_none() {
            missing.push("zone");
        }
        if api_token.is_none() {
            missing.push("token");
        }
        if matches!(command, CommandKind::Upsert | CommandKind::Delete) && names.is_none() {
            missing.push("names");
        }
        if command == CommandKind::Upsert && value.is_none() {
            missing.push("value");
        }

        let (Some(zone_id), Some(api_token)) = (zone_id, api_token) else {
            return Err(ConfigError::Missing(missing));
        };
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let command_config = match command {
            CommandKind::Upsert => Some(&file.upsert),
            CommandKind::Delete => Some(&file.delete),
            CommandKind::List => None,
        };

        let match_strategy = overrides
            .match_strategy
            .or_else(|| command_config.and_then(|c| c.match_strategy))
            .unwrap_or_else(|| command.default_match());
        let syntax = overrides
            .syntax
            .or_else(|| command_config.and_then(|c| c.syntax))
            .unwrap_or_else(|| command.default_syntax());

        let api_base = overrides
            .api_base
            .or_else(|| file.api_base.clone())
            .unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string());
        let timeout = match overrides.timeout_seconds.or(file.timeout_seconds) {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(seconds) => Duration::from_secs(seconds),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            command,
            zone_id,
            api_token,
            api_base,
            timeout,
            names,
            value,
            match_strategy,
            syntax,
        })
    }
}

/// Log filter used when `RUST_LOG` is unset: flag, then config file, then
/// the built-in default.
pub fn resolve_log_level(flag: Option<&str>, file: &FileConfig) -> String {
    flag.map(str::to_string)
        .or_else(|| file.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}
