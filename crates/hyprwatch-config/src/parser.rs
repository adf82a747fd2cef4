//! KDL configuration parser

use std::path::Path;

use hyprwatch_events::{Entity, EventCatalog};

use crate::error::ConfigError;
use crate::model::*;

/// Parse a configuration file from the given path
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        // kdl uses an older miette version, so we need to extract offset/len manually
        let offset = e.span.offset();
        let len = e.span.len();
        let span = miette::SourceSpan::from((offset, len));
        ConfigError::ParseError {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "global" => {
                config.global = parse_global(node)?;
            }
            "events" => {
                config.events = parse_events(node)?;
            }
            name => {
                tracing::warn!("Unknown top-level node: {}", name);
            }
        }
    }

    Ok(config)
}

/// Check the configuration against an event catalog
///
/// Every ignored event must be known to the catalog, so typos do not silently
/// leave an event unfiltered.
pub fn validate_config(config: &Config, catalog: &EventCatalog) -> Result<(), ConfigError> {
    if let Some(name) = config
        .events
        .ignore
        .iter()
        .find(|name| !catalog.contains(name))
    {
        return Err(ConfigError::UnknownEvent { name: name.clone() });
    }

    Ok(())
}

/// Positional string arguments of a node, in order
fn string_args(node: &kdl::KdlNode) -> Result<Vec<String>, ConfigError> {
    node.entries()
        .iter()
        .filter(|entry| entry.name().is_none())
        .map(|entry| {
            entry
                .value()
                .as_string()
                .map(str::to_string)
                .ok_or_else(|| ConfigError::Invalid {
                    message: format!(
                        "`{}` expects string arguments, got {}",
                        node.name().value(),
                        entry.value()
                    ),
                })
        })
        .collect()
}

fn parse_global(node: &kdl::KdlNode) -> Result<GlobalConfig, ConfigError> {
    let mut global = GlobalConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "log-level" => {
                    global.log_level = parse_log_level(child)?;
                }
                "subscribe" => {
                    global.subscribe = parse_subscribe(child)?;
                }
                name => {
                    tracing::warn!("Unknown global config option: {}", name);
                }
            }
        }
    }

    Ok(global)
}

fn parse_log_level(node: &kdl::KdlNode) -> Result<LogLevel, ConfigError> {
    match string_args(node)?.as_slice() {
        [level] => level
            .parse()
            .map_err(|e| ConfigError::Invalid { message: e }),
        args => Err(ConfigError::Invalid {
            message: format!("`log-level` expects exactly one level, got {}", args.len()),
        }),
    }
}

fn parse_subscribe(node: &kdl::KdlNode) -> Result<Entity, ConfigError> {
    let names = string_args(node)?;

    if names.is_empty() {
        tracing::warn!("`subscribe` lists no entities, no events will be forwarded");
    }

    names
        .iter()
        .map(|name| {
            name.parse::<Entity>()
                .map_err(|_| ConfigError::UnknownEntity { name: name.clone() })
        })
        .collect()
}

fn parse_events(node: &kdl::KdlNode) -> Result<EventsConfig, ConfigError> {
    let mut events = EventsConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "ignore" => {
                    for name in string_args(child)? {
                        if !events.ignore.contains(&name) {
                            events.ignore.push(name);
                        }
                    }
                }
                name => {
                    tracing::warn!("Unknown events config option: {}", name);
                }
            }
        }
    }

    Ok(events)
}
