//! Semantic value types, coercion and constraints
//!
//! Raw strings from the INI source are coerced into [`ConfigValue`]s according
//! to the [`ValueKind`] declared for the key, then checked against an optional
//! [`Constraint`].

use serde::{Serialize, Serializer};
use std::fmt;
use std::num::IntErrorKind;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Literals accepted as `true` (compared case-insensitively)
pub const TRUE_LITERALS: [&str; 3] = ["true", "yes", "1"];

/// Literals accepted as `false` (compared case-insensitively)
pub const FALSE_LITERALS: [&str; 4] = ["false", "no", "0", ""];

/// Semantic type of a configuration entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Boolean,
    Integer,
    Float,
    /// Filesystem path or device name, stored verbatim
    Path,
    /// Single byte written as hex digits, with optional `0x` prefix
    HexByte,
}

impl ValueKind {
    /// Coerce a raw string into a typed value.
    ///
    /// `section` and `key` are only used to build the error context.
    pub fn coerce(self, section: &str, key: &str, raw: &str) -> Result<ConfigValue> {
        match self {
            ValueKind::String => Ok(ConfigValue::Str(raw.to_string())),
            ValueKind::Path => Ok(ConfigValue::Path(PathBuf::from(raw))),
            ValueKind::Boolean => parse_bool(raw).map(ConfigValue::Bool).ok_or_else(|| {
                ConfigError::InvalidBoolean {
                    section: section.to_string(),
                    key: key.to_string(),
                    raw: raw.to_string(),
                }
            }),
            ValueKind::Integer => raw.parse::<i64>().map(ConfigValue::Int).map_err(|err| {
                match err.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ConfigError::OutOfRange {
                            section: section.to_string(),
                            key: key.to_string(),
                            raw: raw.to_string(),
                            constraint: format!("between {} and {}", i64::MIN, i64::MAX),
                        }
                    }
                    _ => invalid_format(section, key, raw, "an integer"),
                }
            }),
            ValueKind::Float => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(ConfigValue::Float(v)),
                _ => Err(invalid_format(section, key, raw, "a number")),
            },
            ValueKind::HexByte => {
                let digits = strip_hex_prefix(raw);
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid_format(section, key, raw, "hex digits"));
                }
                u8::from_str_radix(digits, 16)
                    .map(ConfigValue::HexByte)
                    .map_err(|_| invalid_format(section, key, raw, "a hex value between 00 and ff"))
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Path => "path",
            ValueKind::HexByte => "hex",
        };
        f.write_str(name)
    }
}

/// Parse a boolean against the accepted truth set.
///
/// # Examples
///
/// ```
/// use genmon_core::config::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Some(true));
/// assert_eq!(parse_bool("FALSE"), Some(false));
/// assert_eq!(parse_bool(""), Some(false));
/// assert_eq!(parse_bool("Maybe"), None);
/// ```
pub fn parse_bool(raw: &str) -> Option<bool> {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUE_LITERALS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_LITERALS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn strip_hex_prefix(raw: &str) -> &str {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw)
}

fn invalid_format(section: &str, key: &str, raw: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidFormat {
        section: section.to_string(),
        key: key.to_string(),
        raw: raw.to_string(),
        expected: expected.to_string(),
    }
}

/// Validation applied after coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Value must not be empty
    NonEmpty,
    /// Integer must lie within `min..=max`; no upper bound when `max` is `None`
    IntRange { min: i64, max: Option<i64> },
    /// Hex value must be written with exactly this many digits
    HexDigits(usize),
}

impl Constraint {
    /// TCP/UDP port number
    pub const PORT: Constraint = Constraint::IntRange {
        min: 1,
        max: Some(65535),
    };

    /// Strictly positive integer
    pub const POSITIVE: Constraint = Constraint::IntRange { min: 1, max: None };

    /// Check a coerced value against this constraint.
    pub fn check(&self, section: &str, key: &str, raw: &str, value: &ConfigValue) -> Result<()> {
        match (self, value) {
            (Constraint::NonEmpty, _) => {
                if raw.is_empty() {
                    return Err(invalid_format(section, key, raw, "a non-empty value"));
                }
            }
            (Constraint::IntRange { min, max }, ConfigValue::Int(v)) => {
                if *v < *min || max.is_some_and(|max| *v > max) {
                    return Err(ConfigError::OutOfRange {
                        section: section.to_string(),
                        key: key.to_string(),
                        raw: raw.to_string(),
                        constraint: self.to_string(),
                    });
                }
            }
            (Constraint::HexDigits(count), ConfigValue::HexByte(_)) => {
                if strip_hex_prefix(raw).len() != *count {
                    return Err(invalid_format(
                        section,
                        key,
                        raw,
                        &format!("{} hex digits", count),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NonEmpty => write!(f, "non-empty"),
            Constraint::IntRange { min, max: Some(max) } => {
                write!(f, "between {} and {}", min, max)
            }
            Constraint::IntRange { min, max: None } => write!(f, "at least {}", min),
            Constraint::HexDigits(count) => write!(f, "{} hex digits", count),
        }
    }
}

/// A resolved, typed configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Path(PathBuf),
    HexByte(u8),
}

impl ConfigValue {
    /// Render the value as the canonical INI literal.
    ///
    /// Booleans always render as `True`/`False` and hex bytes as two
    /// lowercase digits, so a rendered value coerces back to itself.
    pub fn to_ini_literal(&self) -> String {
        match self {
            ConfigValue::Str(s) => s.clone(),
            ConfigValue::Bool(true) => "True".to_string(),
            ConfigValue::Bool(false) => "False".to_string(),
            ConfigValue::Int(v) => v.to_string(),
            ConfigValue::Float(v) => v.to_string(),
            ConfigValue::Path(p) => p.display().to_string(),
            ConfigValue::HexByte(v) => format!("{:02x}", v),
        }
    }

    /// Whether the value is an empty string or path
    pub fn is_empty(&self) -> bool {
        match self {
            ConfigValue::Str(s) => s.is_empty(),
            ConfigValue::Path(p) => p.as_os_str().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ini_literal())
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Str(s) => serializer.serialize_str(s),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Int(v) => serializer.serialize_i64(*v),
            ConfigValue::Float(v) => serializer.serialize_f64(*v),
            ConfigValue::Path(p) => serializer.serialize_str(&p.display().to_string()),
            ConfigValue::HexByte(v) => serializer.serialize_str(&format!("{:02x}", v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_truth_set() {
        for raw in ["true", "True", "YES", "1"] {
            assert_eq!(parse_bool(raw), Some(true), "{}", raw);
        }
        for raw in ["false", "False", "no", "0", ""] {
            assert_eq!(parse_bool(raw), Some(false), "{}", raw);
        }
        for raw in ["on", "off", "2", "Maybe"] {
            assert_eq!(parse_bool(raw), None, "{}", raw);
        }
    }

    #[test]
    fn test_coerce_invalid_boolean() {
        let err = ValueKind::Boolean
            .coerce("GenMon", "displayoutput", "Maybe")
            .unwrap_err();
        match err {
            ConfigError::InvalidBoolean { section, key, raw } => {
                assert_eq!(section, "GenMon");
                assert_eq!(key, "displayoutput");
                assert_eq!(raw, "Maybe");
            }
            other => panic!("Expected InvalidBoolean, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(
            ValueKind::Integer.coerce("s", "k", "9082").unwrap(),
            ConfigValue::Int(9082)
        );
        assert!(matches!(
            ValueKind::Integer.coerce("s", "k", "12.5"),
            Err(ConfigError::InvalidFormat { .. })
        ));
        assert_eq!(
            ValueKind::Float.coerce("s", "k", "7.5").unwrap(),
            ConfigValue::Float(7.5)
        );
        assert!(matches!(
            ValueKind::Float.coerce("s", "k", "NaN"),
            Err(ConfigError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_coerce_integer_overflow_is_out_of_range() {
        for raw in ["99999999999999999999", "-99999999999999999999"] {
            match ValueKind::Integer.coerce("GenMon", "server_port", raw) {
                Err(ConfigError::OutOfRange { key, raw: got, .. }) => {
                    assert_eq!(key, "server_port");
                    assert_eq!(got, raw);
                }
                other => panic!("Expected OutOfRange, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_coerce_hex_byte() {
        assert_eq!(
            ValueKind::HexByte.coerce("s", "address", "9d").unwrap(),
            ConfigValue::HexByte(0x9d)
        );
        assert_eq!(
            ValueKind::HexByte.coerce("s", "address", "0x9D").unwrap(),
            ConfigValue::HexByte(0x9d)
        );
        assert!(matches!(
            ValueKind::HexByte.coerce("s", "address", "zz"),
            Err(ConfigError::InvalidFormat { .. })
        ));
        assert!(matches!(
            ValueKind::HexByte.coerce("s", "address", "1ff"),
            Err(ConfigError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_path_is_stored_verbatim() {
        let value = ValueKind::Path
            .coerce("s", "port", "/dev/does-not-exist")
            .unwrap();
        assert_eq!(value, ConfigValue::Path(PathBuf::from("/dev/does-not-exist")));
    }

    #[test]
    fn test_port_constraint() {
        let value = ConfigValue::Int(99999);
        let err = Constraint::PORT
            .check("GenMon", "server_port", "99999", &value)
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
        assert!(format!("{}", err).contains("between 1 and 65535"));

        assert!(Constraint::PORT
            .check("GenMon", "server_port", "0", &ConfigValue::Int(0))
            .is_err());
        assert!(Constraint::PORT
            .check("GenMon", "server_port", "9082", &ConfigValue::Int(9082))
            .is_ok());
    }

    #[test]
    fn test_hex_digit_count() {
        let value = ConfigValue::HexByte(0x09);
        assert!(Constraint::HexDigits(2).check("s", "k", "09", &value).is_ok());
        assert!(Constraint::HexDigits(2).check("s", "k", "0x09", &value).is_ok());
        assert!(Constraint::HexDigits(2).check("s", "k", "9", &value).is_err());
    }

    #[test]
    fn test_non_empty() {
        let value = ConfigValue::Str(String::new());
        assert!(Constraint::NonEmpty.check("s", "k", "", &value).is_err());
    }

    #[test]
    fn test_ini_literals() {
        assert_eq!(ConfigValue::Bool(true).to_ini_literal(), "True");
        assert_eq!(ConfigValue::Bool(false).to_ini_literal(), "False");
        assert_eq!(ConfigValue::HexByte(0x0a).to_ini_literal(), "0a");
        assert_eq!(ConfigValue::Float(22.0).to_ini_literal(), "22");
    }

    #[test]
    fn test_value_serialization() {
        let json = serde_json::to_string(&ConfigValue::HexByte(0x9d)).unwrap();
        assert_eq!(json, "\"9d\"");
        let json = serde_json::to_string(&ConfigValue::Bool(true)).unwrap();
        assert_eq!(json, "true");
    }
}
