//! Error types for the dyncli library
//!
//! This module provides error handling for every library operation: spec
//! registry construction, signature validation, configuration loading,
//! clap command building and handler invocation.

use crate::core::Scope;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum DynCliError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML configuration parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Command-line parsing errors, including help and version requests
    #[error(transparent)]
    Clap(#[from] clap::Error),

    /// Errors returned by a command handler
    #[error(transparent)]
    Handler(#[from] anyhow::Error),

    /// The same parameter name was declared twice within one scope
    #[error("Duplicate parameter `{name}` in {scope} scope")]
    DuplicateParameter { name: String, scope: Scope },

    /// The same command name was registered twice
    #[error("Duplicate command: {name}")]
    DuplicateCommand { name: String },

    /// Parameter names must be identifiers
    #[error("Invalid parameter name `{name}`: {reason}")]
    InvalidParameterName { name: String, reason: String },

    /// A value was supplied for a parameter that does not exist
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// A command name could not be found in the registry
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// Configuration file with an extension no loader handles
    #[error("Unsupported config file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// A handler asked for an argument that was not bound
    #[error("Missing argument: {name}")]
    MissingArgument { name: String },

    /// Value type conversion errors
    #[error("Type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: String, to: String },

    /// A signature that clap cannot represent
    #[error("Cannot build command `{command}`: {reason}")]
    Framework { command: String, reason: String },

    /// Malformed configuration content
    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DynCliError>;

impl DynCliError {
    /// Create a new duplicate parameter error
    pub fn duplicate_parameter(name: impl Into<String>, scope: Scope) -> Self {
        Self::DuplicateParameter {
            name: name.into(),
            scope,
        }
    }

    /// Create a new duplicate command error
    pub fn duplicate_command(name: impl Into<String>) -> Self {
        Self::DuplicateCommand { name: name.into() }
    }

    /// Create a new invalid parameter name error
    pub fn invalid_parameter_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameterName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }

    /// Create a new unknown command error
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create a new missing argument error
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Create a new type conversion error
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new framework error
    pub fn framework(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Framework {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Registration-time errors describe a broken application definition and
    /// are never recoverable; parse and conversion errors come from user input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::DuplicateParameter { .. }
            | Self::DuplicateCommand { .. }
            | Self::InvalidParameterName { .. }
            | Self::Framework { .. } => false,
            Self::Toml(_)
            | Self::Yaml(_)
            | Self::Json(_)
            | Self::Config { .. }
            | Self::UnsupportedFormat { .. } => true,
            Self::Clap(_)
            | Self::Handler(_)
            | Self::UnknownParameter { .. }
            | Self::UnknownCommand { .. }
            | Self::MissingArgument { .. }
            | Self::TypeConversion { .. } => true,
        }
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateParameter { .. }
            | Self::DuplicateCommand { .. }
            | Self::InvalidParameterName { .. }
            | Self::Framework { .. } => ErrorSeverity::Critical,
            Self::Handler(_) | Self::Io(_) => ErrorSeverity::High,
            Self::Toml(_)
            | Self::Yaml(_)
            | Self::Json(_)
            | Self::Config { .. }
            | Self::UnsupportedFormat { .. } => ErrorSeverity::Medium,
            Self::Clap(_) | Self::TypeConversion { .. } | Self::MissingArgument { .. } => {
                ErrorSeverity::Low
            }
            _ => ErrorSeverity::Medium,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
