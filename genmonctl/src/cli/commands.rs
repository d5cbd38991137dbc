//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generator monitor configuration tool
#[derive(Parser, Debug)]
#[command(name = "genmonctl")]
#[command(version, about = "Generator monitor configuration tool", long_about = None)]
pub struct Cli {
    /// Configuration file (default: /etc/genmon.conf, then ~/.config/genmon/genmon.conf)
    #[arg(short, long, env = "GENMON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate the configuration file
    Check,

    /// Show resolved configuration values
    Show {
        /// Only show this section
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Print a single resolved value
    Get {
        /// Key name (case-insensitive)
        key: String,

        /// Section containing the key
        #[arg(short, long, default_value = "GenMon")]
        section: String,
    },

    /// Print the resolved configuration as canonical INI
    Export,

    /// Apply hardware detection facts and derive the device profile
    Detect {
        /// Value of the product-model register (hex, e.g. 0x09)
        #[arg(short, long, value_parser = parse_product_code)]
        product_code: u16,

        /// Write the derived profile back to the configuration file
        #[arg(short, long)]
        write: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parse a register value written in hex, with or without `0x`.
pub fn parse_product_code(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16)
        .map_err(|_| format!("'{}' is not a hex register value (e.g. 0x09)", s))
}
