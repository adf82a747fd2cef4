//! Configuration data model

use hyprwatch_events::{Entity, EntityFilter};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/hyprwatch/config.kdl";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub global: GlobalConfig,
    pub events: EventsConfig,
}

impl Config {
    /// Filter built from the configured subscription and ignore list
    pub fn entity_filter(&self) -> EntityFilter {
        self.filter_for(self.global.subscribe)
    }

    /// Filter for an explicit entity set, keeping the configured ignore list
    pub fn filter_for(&self, subscribed: Entity) -> EntityFilter {
        EntityFilter::new(subscribed).ignoring(self.events.ignore.iter().cloned())
    }
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub log_level: LogLevel,
    /// Entities watched when no entity subcommand is given
    pub subscribe: Entity,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            subscribe: Entity::ALL,
        }
    }
}

/// Per-event settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsConfig {
    /// Wire names of events that are never forwarded
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name, usable as a `tracing` filter directive
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}
