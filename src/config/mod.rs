mod settings;

pub use settings::{
    resolve_log_level, usage_error, CommandConfig, CommandKind, ConfigError, EnvSource, FileConfig, Overrides,
    ProcessEnv, Settings, DEFAULT_LOG_LEVEL, ENV_API_TOKEN, ENV_RECORD_NAMES, ENV_ZONE_ID,
};
