//! Writing detected values back into the configuration file

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ini;
use crate::error::{ConfigError, Result};

/// Set keys within a section of the configuration file.
///
/// Existing assignments are replaced in place; new keys are appended to the
/// section. Comments and the order of untouched lines are preserved.
pub fn persist_entries(path: &Path, section: &str, entries: &[(&str, String)]) -> Result<()> {
    if entries.is_empty() {
        debug!("Nothing to write back to {}", path.display());
        return Ok(());
    }

    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })?;

    let updated = ini::upsert(&source, section, entries)?;

    write_atomic(path, &updated)?;

    info!(
        "Wrote {} key(s) to [{}] in {}",
        entries.len(),
        section,
        path.display()
    );
    Ok(())
}

/// Write to a sibling `.tmp` file, then rename it over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let unwritable = |source: std::io::Error| ConfigError::UnwritableSource {
        path: path.to_path_buf(),
        source,
    };

    std::fs::write(&temp_path, content).map_err(unwritable)?;
    if let Err(source) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(unwritable(source));
    }
    debug!("Replaced {} via {}", path.display(), temp_path.display());
    Ok(())
}
