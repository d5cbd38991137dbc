//! Generator monitor configuration tool
//!
//! Library half of `genmonctl`: command definitions, handlers and output
//! formatting. The configuration model itself lives in `genmon-core`.
//!
//! ```no_run
//! use genmonctl::cli::{handle_check, OutputFormat};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let output = handle_check(Path::new("/etc/genmon.conf"), OutputFormat::Json)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
