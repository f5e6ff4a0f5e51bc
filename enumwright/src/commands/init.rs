//! Init command - writes starter configuration and enum definition files.

use crate::cli::{Cli, InitArgs, InitFormat};
use enumwright_core::error::{EnumwrightError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const CONFIG_TEMPLATE: &str = include_str!("../../../demos/enumwright.toml");
const ENUMS_TEMPLATE: &str = include_str!("../../../demos/enums.toml");

/// Renders a TOML template in the requested format.
fn render_template(template: &str, format: InitFormat) -> Result<String> {
    match format {
        InitFormat::Toml => Ok(template.to_string()),
        InitFormat::Json => {
            let value: toml::Value = toml::from_str(template)?;
            let mut json = serde_json::to_string_pretty(&value)?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn starter_files(format: InitFormat) -> Result<Vec<(PathBuf, String)>> {
    let ext = format.extension();
    Ok(vec![
        (
            PathBuf::from(format!("enumwright.{}", ext)),
            render_template(CONFIG_TEMPLATE, format)?,
        ),
        (
            PathBuf::from(format!("enums.{}", ext)),
            render_template(ENUMS_TEMPLATE, format)?,
        ),
    ])
}

/// Runs the init command.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    let files = starter_files(args.format)?;

    if !args.force {
        if let Some((path, _)) = files.iter().find(|(path, _)| path.exists()) {
            error!("{} already exists. Use --force to overwrite.", path.display());
            return Err(EnumwrightError::config(format!(
                "{} already exists; pass --force to overwrite",
                path.display()
            )));
        }
    }

    for (path, content) in &files {
        write_file(path, content)?;
    }

    println!("enumwright initialized.");
    println!("Next steps:");
    println!("  1. Edit {} to set the namespace and formatting", files[0].0.display());
    println!("  2. Describe your enums in {}", files[1].0.display());
    println!(
        "  3. Run 'enumwright generate -e {}' to write the header",
        files[1].0.display()
    );
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    info!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumwright_core::config::GeneratorConfig;
    use enumwright_core::loader::{FileFormat, parse_config, parse_definitions};

    #[test]
    fn test_templates_load_in_both_formats() {
        for (format, file_format) in [(InitFormat::Toml, FileFormat::Toml), (InitFormat::Json, FileFormat::Json)] {
            let files = starter_files(format).unwrap();
            let config: GeneratorConfig = parse_config(&files[0].1, file_format).unwrap();
            let defs = parse_definitions(&files[1].1, file_format, &config).unwrap();
            assert!(!defs.is_empty());
            assert!(enumwright_core::generate(&config, &defs).is_ok());
        }
    }
}
