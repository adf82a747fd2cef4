//! Configuration parsing for hyprwatch
//!
//! This crate handles parsing KDL configuration files and generating
//! a default configuration file.

mod error;
mod generator;
mod model;
mod parser;

pub use error::ConfigError;
pub use generator::generate_default_config;
pub use model::*;
pub use parser::{parse_config, parse_config_str, validate_config};
