//! Info command - displays derived metadata for each enum.

use crate::cli::{Cli, InfoArgs, InfoFormat};
use crate::commands::load_inputs;
use enumwright_core::error::{EnumwrightError, Result};
use enumwright_core::metadata::{DerivedMetadata, EnumModel, ValidityCheck};
use enumwright_core::validator::validate_definitions;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct EnumReport<'a> {
    name: &'a str,
    kind: &'static str,
    size_type: &'a str,
    entries: usize,
    min: &'a str,
    max: &'a str,
    default: String,
    metadata: &'a DerivedMetadata,
}

fn report<'a>(model: &'a EnumModel<'a>) -> EnumReport<'a> {
    let default = match model.default_entry() {
        Some(entry) => entry.name.clone(),
        None => format!("{:#x}", model.default_value()),
    };
    EnumReport {
        name: model.name(),
        kind: model.kind().as_str(),
        size_type: &model.size_type.name,
        entries: model.definition.entries.len(),
        min: &model.min().name,
        max: &model.max().name,
        default,
        metadata: &model.metadata,
    }
}

fn describe_validity(check: &ValidityCheck) -> String {
    match check {
        ValidityCheck::SingleValue(v) => format!("equals {}", v),
        ValidityCheck::Always => "always valid".to_string(),
        ValidityCheck::UpperBound(max) => format!("v <= {}", max),
        ValidityCheck::LowerBound(min) => format!("v >= {}", min),
        ValidityCheck::Range { min, max } => format!("{} <= v <= {}", min, max),
        ValidityCheck::Scan(values) => format!("scan of {} values", values.len()),
        ValidityCheck::FlagsLowMask(mask) => format!("v <= {:#x}", mask),
        ValidityCheck::FlagsMask(mask) => format!("no bits outside {:#x}", mask),
    }
}

fn print_pretty(report: &EnumReport<'_>) {
    let meta = report.metadata;
    println!("\n=== {} ({}) ===\n", report.name, report.kind);
    println!("Size type:           {}", report.size_type);
    println!("Entries:             {} ({} unique values)", report.entries, meta.unique_value_count);
    println!("Min / max:           {} / {}", report.min, report.max);
    println!("Default:             {}", report.default);
    println!("Contiguous:          {}", if meta.is_contiguous { "yes" } else { "no" });
    println!("Storage bits:        {}", meta.bits_required_storage);
    println!("Transmission bits:   {}", meta.bits_required_transmission);
    if report.kind == "flags" {
        println!("Used bits:           {:#x}", meta.used_bits_mask);
    }
    println!("Validity check:      {}", describe_validity(&meta.validity));
}

/// Runs the info command.
pub fn run(cli: &Cli, args: InfoArgs) -> Result<()> {
    let (config, definitions) = load_inputs(cli)?;
    validate_definitions(&config, &definitions)?;

    let selected: Vec<_> = definitions
        .iter()
        .filter(|d| args.name.as_deref().is_none_or(|name| d.name == name))
        .collect();
    if let Some(name) = &args.name {
        if selected.is_empty() {
            return Err(EnumwrightError::config(format!("no enum named `{}`", name)));
        }
    }
    debug!("Reporting on {} enums", selected.len());

    let models = selected
        .into_iter()
        .map(|definition| EnumModel::build(definition, &config))
        .collect::<Result<Vec<_>>>()?;
    let reports: Vec<EnumReport<'_>> = models.iter().map(report).collect();

    match args.format {
        InfoFormat::Pretty => {
            for report in &reports {
                print_pretty(report);
            }
        }
        InfoFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }
    Ok(())
}
