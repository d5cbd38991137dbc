//! INI text parsing and in-place editing
//!
//! Grammar: `[Section]` headers followed by `key = value` lines. Lines starting
//! with `#` or `;` are comments. Keys are case-insensitive and stored in lower
//! case; section names keep their case.

use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Raw section/key/value mapping produced by [`parse`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawIni {
    /// Section name -> (lower-case key -> raw value)
    pub sections: BTreeMap<String, BTreeMap<String, String>>,
    /// Keys assigned more than once within a section, with the line of the
    /// assignment that won
    pub duplicates: Vec<DuplicateKey>,
}

impl RawIni {
    /// Raw value of a key, if present.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(&key.to_ascii_lowercase()))
            .map(String::as_str)
    }
}

/// A key that was assigned more than once; the last assignment is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub section: String,
    pub key: String,
    pub line: usize,
}

enum Line<'a> {
    Blank,
    Section(&'a str),
    Entry(&'a str, &'a str),
}

fn classify(line_no: usize, line: &str) -> Result<Line<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return Ok(Line::Blank);
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let name = rest
            .strip_suffix(']')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ConfigError::Syntax {
                line: line_no,
                message: format!("malformed section header '{}'", trimmed),
            })?;
        return Ok(Line::Section(name));
    }

    let (key, value) = trimmed.split_once('=').ok_or_else(|| ConfigError::Syntax {
        line: line_no,
        message: format!("expected 'key = value', found '{}'", trimmed),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::Syntax {
            line: line_no,
            message: "empty key".to_string(),
        });
    }
    Ok(Line::Entry(key, value.trim()))
}

/// Parse INI text into a raw section/key/value mapping.
///
/// Repeated section headers merge into one section. A key repeated within a
/// section keeps its last value and is reported in [`RawIni::duplicates`].
pub fn parse(source: &str) -> Result<RawIni> {
    let mut raw = RawIni::default();
    let mut current: Option<String> = None;

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        match classify(line_no, line)? {
            Line::Blank => {}
            Line::Section(name) => {
                raw.sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
            }
            Line::Entry(key, value) => {
                let section = current.as_ref().ok_or_else(|| ConfigError::Syntax {
                    line: line_no,
                    message: format!("key '{}' appears before any [section] header", key),
                })?;
                let key = key.to_ascii_lowercase();
                let entries = raw.sections.entry(section.clone()).or_default();
                if entries.insert(key.clone(), value.to_string()).is_some() {
                    warn!(
                        "[{}] key '{}' assigned more than once; using value from line {}",
                        section, key, line_no
                    );
                    raw.duplicates.push(DuplicateKey {
                        section: section.clone(),
                        key,
                        line: line_no,
                    });
                }
            }
        }
    }

    Ok(raw)
}

/// Set keys within a section of INI text, leaving everything else untouched.
///
/// Existing assignments are rewritten in place, matching keys
/// case-insensitively and including repeated assignments of the same key.
/// Keys not yet present are appended after the last assignment of the
/// section; a missing section is appended at the end.
pub fn upsert(source: &str, section: &str, entries: &[(&str, String)]) -> Result<String> {
    let mut pending: Vec<(&str, &String)> = entries.iter().map(|(k, v)| (*k, v)).collect();
    let mut lines: Vec<String> = Vec::new();
    let mut in_section = false;
    let mut insert_at: Option<usize> = None;

    for (idx, line) in source.lines().enumerate() {
        match classify(idx + 1, line)? {
            Line::Section(name) => {
                in_section = name == section;
                if in_section && insert_at.is_none() {
                    insert_at = Some(lines.len() + 1);
                }
                lines.push(line.to_string());
            }
            Line::Entry(key, _) if in_section => {
                // Every assignment of the key is rewritten, repeated ones included
                match entries.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
                    Some((k, v)) => {
                        pending.retain(|(p, _)| !p.eq_ignore_ascii_case(k));
                        lines.push(format!("{} = {}", k, v));
                    }
                    None => lines.push(line.to_string()),
                }
                insert_at = Some(lines.len());
            }
            _ => lines.push(line.to_string()),
        }
    }

    let additions: Vec<String> = pending
        .iter()
        .map(|(k, v)| format!("{} = {}", k, v))
        .collect();

    match insert_at {
        Some(at) => {
            lines.splice(at..at, additions);
        }
        None if !additions.is_empty() => {
            if lines.last().is_some_and(|l| !l.trim().is_empty()) {
                lines.push(String::new());
            }
            lines.push(format!("[{}]", section));
            lines.extend(additions);
        }
        None => {}
    }

    let mut output = lines.join("\n");
    output.push('\n');
    Ok(output)
}
