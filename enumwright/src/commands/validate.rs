//! Validate command - checks configuration and enum definitions without
//! writing anything.

use crate::cli::{Cli, ValidateArgs};
use crate::commands::{load_inputs, resolve_config};
use enumwright_core::error::Result;
use enumwright_core::metadata::EnumModel;
use enumwright_core::types::EnumKind;
use enumwright_core::validator::validate_definitions;
use tracing::info;

/// Runs the validate command.
pub fn run(cli: &Cli, args: ValidateArgs) -> Result<()> {
    info!("Validating enumwright configuration and enum definitions");

    if args.config_only {
        let config = resolve_config(cli)?;
        println!(
            "Configuration OK: {} size types, namespace `{}`",
            config.size_types.len(),
            config.namespace.join("::")
        );
        return Ok(());
    }

    let (config, definitions) = load_inputs(cli)?;
    validate_definitions(&config, &definitions)?;
    // Metadata derivation catches what structural validation cannot,
    // such as a default style that does not apply to the kind
    for definition in &definitions {
        EnumModel::build(definition, &config)?;
    }

    let flags = definitions
        .iter()
        .filter(|d| d.kind == EnumKind::Flags)
        .count();
    let entries: usize = definitions.iter().map(|d| d.entries.len()).sum();
    println!(
        "Validation passed: {} enums ({} value, {} flags), {} entries",
        definitions.len(),
        definitions.len() - flags,
        flags,
        entries
    );
    Ok(())
}
