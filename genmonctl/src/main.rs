//! Generator monitor configuration CLI
//!
//! Loads, validates and inspects genmon configuration files.

use clap::Parser;
use genmonctl::cli::{
    generate_completion, handle_check, handle_detect, handle_export, handle_get, handle_show, Cli,
    Commands,
};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = cli.config.clone().unwrap_or_else(genmon_core::default_config_path);
    let format = cli.format;

    let result = match &cli.command {
        Commands::Check => handle_check(&path, format),
        Commands::Show { section } => handle_show(&path, section.as_deref(), format),
        Commands::Get { key, section } => handle_get(&path, section, key, format),
        Commands::Export => handle_export(&path),
        Commands::Detect {
            product_code,
            write,
        } => handle_detect(&path, *product_code, *write, format),
        Commands::Completion { shell } => {
            generate_completion(*shell);
            return;
        }
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if cli.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
