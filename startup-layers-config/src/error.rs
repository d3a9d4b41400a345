//! Typed error variants for the startup-layers-config crate.
//!
//! `Config::load` and `Config::save` return `anyhow::Result` for the
//! binary's convenience; the underlying failure is always one of these
//! variants and can be recovered with `downcast_ref::<ConfigError>()`.

use std::fmt;

/// Errors that can occur when loading or saving the settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the settings file.
    Io(std::io::Error),

    /// The settings file contained invalid YAML.
    Parse(serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and the reason.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error reading settings: {e}"),
            ConfigError::Parse(e) => write!(f, "YAML parse error in settings: {e}"),
            ConfigError::Validation(msg) => write!(f, "Settings validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e)
    }
}
