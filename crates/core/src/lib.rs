pub mod config;
pub mod domain;
pub mod errors;

pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig, PluginConfig,
    ServerConfig,
};
pub use domain::{dm_route, BotHandle, FeedbackPolarity, PostId, TeamName, Tone};
pub use errors::DomainError;
