//! Showcase error types

use sheen_core::{ConfigurationError, LoadError};
use thiserror::Error;

/// Errors raised while configuring or loading a showcase
#[derive(Error, Debug)]
pub enum ShowcaseError {
    /// Invalid engine, segment, or palette setup
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Scene content missing after load
    #[error("Scene load failed: {0}")]
    Load(#[from] LoadError),

    /// Config file could not be read or written
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("Config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("Config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for showcase operations
pub type Result<T> = std::result::Result<T, ShowcaseError>;
