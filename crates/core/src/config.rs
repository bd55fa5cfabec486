use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub plugin: PluginConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Base URL of the chat server hosting the companion plugin.
    pub base_url: String,
    /// Session token forwarded with every request. Absent means requests go
    /// out undecorated (the transport's no-op decorator).
    pub session_token: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct PluginConfig {
    /// Plugin namespace in `/plugins/{id}/…` request paths.
    pub id: String,
    /// Username of the assistant bot, used for direct-message navigation.
    pub bot_username: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub session_token: Option<String>,
    pub plugin_id: Option<String>,
    pub bot_username: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8065".to_string(),
                session_token: None,
                timeout_secs: 30,
            },
            plugin: PluginConfig { id: "ai-actions".to_string(), bot_username: "ai".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    plugin: Option<PluginPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    base_url: Option<String>,
    session_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PluginPatch {
    id: Option<String>,
    bot_username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<String>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("threadpilot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_lookup(|key| env::var(key).ok())?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(server) = patch.server {
            if let Some(base_url) = server.base_url {
                self.server.base_url = base_url;
            }
            if let Some(token) = server.session_token {
                self.server.session_token = Some(token.into());
            }
            if let Some(timeout_secs) = server.timeout_secs {
                self.server.timeout_secs = timeout_secs;
            }
        }
        if let Some(plugin) = patch.plugin {
            if let Some(id) = plugin.id {
                self.plugin.id = id;
            }
            if let Some(bot_username) = plugin.bot_username {
                self.plugin.bot_username = bot_username;
            }
        }
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format.parse()?;
            }
        }
        Ok(())
    }

    fn apply_env_lookup<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("THREADPILOT_SERVER_BASE_URL") {
            self.server.base_url = value;
        }
        if let Some(value) = lookup("THREADPILOT_SESSION_TOKEN") {
            self.server.session_token = Some(value.into());
        }
        if let Some(value) = lookup("THREADPILOT_SERVER_TIMEOUT_SECS") {
            self.server.timeout_secs = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "THREADPILOT_SERVER_TIMEOUT_SECS".to_string(),
                value,
            })?;
        }
        if let Some(value) = lookup("THREADPILOT_PLUGIN_ID") {
            self.plugin.id = value;
        }
        if let Some(value) = lookup("THREADPILOT_BOT_USERNAME") {
            self.plugin.bot_username = value;
        }
        if let Some(value) = lookup("THREADPILOT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = lookup("THREADPILOT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.server.base_url = base_url;
        }
        if let Some(token) = overrides.session_token {
            self.server.session_token = Some(token.into());
        }
        if let Some(id) = overrides.plugin_id {
            self.plugin.id = id;
        }
        if let Some(bot_username) = overrides.bot_username {
            self.plugin.bot_username = bot_username;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.plugin.id.trim().is_empty() {
            return Err(ConfigError::Validation("plugin.id must not be empty".to_string()));
        }
        if self.plugin.bot_username.trim().is_empty() {
            return Err(ConfigError::Validation("plugin.bot_username must not be empty".to_string()));
        }
        let base_url = self.server.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "server.base_url must be an http(s) URL, got `{base_url}`"
            )));
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Validation("server.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    let default = PathBuf::from("threadpilot.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}
