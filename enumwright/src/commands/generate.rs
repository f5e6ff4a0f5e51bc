//! Generate command - renders the header and writes it when it changed.

use crate::cli::{Cli, GenerateArgs};
use crate::commands::load_inputs;
use enumwright_core::error::{EnumwrightError, Result};
use enumwright_core::generate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info};

const DEFAULT_OUTPUT: &str = "generated_enums.h";

/// Runs generation with default settings.
pub fn run_default(cli: &Cli) -> Result<()> {
    let args = GenerateArgs {
        output: PathBuf::from(DEFAULT_OUTPUT),
        print: false,
        check: false,
    };
    run(cli, args)
}

/// Runs the generate command.
pub fn run(cli: &Cli, args: GenerateArgs) -> Result<()> {
    info!("Starting enum header generation");
    let (config, definitions) = load_inputs(cli)?;

    let header = generate(&config, &definitions)?;
    debug!("Generated header: {} bytes", header.len());

    if args.print {
        print!("{}", header);
        return Ok(());
    }

    let existing = fs::read_to_string(&args.output).ok();
    let unchanged = existing.as_deref() == Some(header.as_str());

    if args.check {
        if unchanged {
            info!("{} is up to date", args.output.display());
            return Ok(());
        }
        error!("{} is out of date", args.output.display());
        return Err(EnumwrightError::stale_output(&args.output));
    }

    if unchanged {
        info!("{} unchanged, skipping write", args.output.display());
        return Ok(());
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.output, &header).map_err(|e| {
        error!("Failed to write {}: {}", args.output.display(), e);
        EnumwrightError::from(e)
    })?;
    info!(
        "Wrote {} enums to {}",
        definitions.len(),
        args.output.display()
    );
    Ok(())
}
