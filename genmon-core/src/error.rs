//! Error types for configuration loading and write-back

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error surfaced to the operator.
///
/// Every load-time variant is terminal: configuration is operator-authored, so
/// the fix is to edit the source and restart. Variants carry enough context
/// (section, key, offending raw value) to point at the exact line to change.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file is missing or cannot be read
    #[error("Cannot read configuration source '{}': {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file cannot be rewritten
    #[error("Cannot write configuration source '{}': {source}", path.display())]
    UnwritableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural problem in the INI text itself
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A required key is absent
    #[error("[{section}] missing required key '{key}'")]
    MissingRequiredKey { section: String, key: String },

    /// A boolean key holds something outside the truth set
    #[error("[{section}] {key} = '{raw}' is not a boolean (use true/yes/1 or false/no/0)")]
    InvalidBoolean {
        section: String,
        key: String,
        raw: String,
    },

    /// A value does not match the expected format
    #[error("[{section}] {key} = '{raw}' is invalid: expected {expected}")]
    InvalidFormat {
        section: String,
        key: String,
        raw: String,
        expected: String,
    },

    /// A numeric value is outside its allowed range
    #[error("[{section}] {key} = '{raw}' is out of range: must be {constraint}")]
    OutOfRange {
        section: String,
        key: String,
        raw: String,
        constraint: String,
    },

    /// A cross-field rule failed
    #[error("Constraint '{rule}' violated: {message}")]
    ConstraintViolation { rule: String, message: String },
}

impl ConfigError {
    /// Section and key the error refers to, when it refers to a single entry.
    pub fn location(&self) -> Option<(&str, &str)> {
        match self {
            ConfigError::MissingRequiredKey { section, key }
            | ConfigError::InvalidBoolean { section, key, .. }
            | ConfigError::InvalidFormat { section, key, .. }
            | ConfigError::OutOfRange { section, key, .. } => Some((section, key)),
            _ => None,
        }
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
