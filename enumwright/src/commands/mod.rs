//! Command handlers for the enumwright CLI.

pub mod generate;
pub mod info;
pub mod init;
pub mod validate;

use crate::cli::Cli;
use enumwright_core::config::GeneratorConfig;
use enumwright_core::error::Result;
use enumwright_core::loader::{find_config_file, load_config, load_definitions};
use enumwright_core::types::EnumDefinition;
use std::env;
use tracing::{debug, info};

/// Loads the configuration named on the command line, else the nearest
/// `enumwright.toml`, else the built-in defaults.
pub fn resolve_config(cli: &Cli) -> Result<GeneratorConfig> {
    if let Some(path) = &cli.config {
        return load_config(path);
    }
    let current_dir = env::current_dir()?;
    match find_config_file(&current_dir) {
        Some(path) => {
            info!("Found configuration file at: {:?}", path);
            load_config(&path)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(GeneratorConfig::default())
        }
    }
}

/// Configuration plus the enum definitions it applies to.
pub fn load_inputs(cli: &Cli) -> Result<(GeneratorConfig, Vec<EnumDefinition>)> {
    let config = resolve_config(cli)?;
    let definitions = load_definitions(&cli.enums, &config)?;
    Ok((config, definitions))
}
