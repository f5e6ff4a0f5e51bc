//! Command-line interface definitions for enumwright.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// enumwright - C++ value and flags enum header generator
#[derive(Parser, Debug)]
#[command(name = "enumwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the generator configuration (TOML, or JSON by extension).
    /// Defaults to the nearest enumwright.toml in this or a parent directory.
    #[arg(short, long, global = true, env = "ENUMWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the enum definitions file
    #[arg(
        short,
        long,
        global = true,
        env = "ENUMWRIGHT_ENUMS",
        default_value = "enums.toml"
    )]
    pub enums: PathBuf,

    /// Enable verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the C++ header (default)
    Generate(GenerateArgs),

    /// Load and validate the configuration and enum definitions
    Validate(ValidateArgs),

    /// Display derived metadata for every enum
    Info(InfoArgs),

    /// Write starter configuration and enum definition files
    Init(InitArgs),
}

// ============================================================================
// Generate Arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Output header path
    #[arg(short, long, default_value = "generated_enums.h")]
    pub output: PathBuf,

    /// Write the header to stdout instead of a file
    #[arg(long, conflicts_with = "check")]
    pub print: bool,

    /// Fail if the header on disk differs from what would be generated
    #[arg(long)]
    pub check: bool,
}

// ============================================================================
// Validate Arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Validate configuration file only
    #[arg(long)]
    pub config_only: bool,
}

// ============================================================================
// Info Arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: InfoFormat,

    /// Only show the enum with this name
    #[arg(long = "enum")]
    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InfoFormat {
    /// Human-readable output
    Pretty,
    /// JSON output
    Json,
}

// ============================================================================
// Init Arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing files if present
    #[arg(short, long)]
    pub force: bool,

    /// File format of the starter files
    #[arg(long, value_enum, default_value = "toml")]
    pub format: InitFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InitFormat {
    Toml,
    Json,
}

impl InitFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            InitFormat::Toml => "toml",
            InitFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["enumwright"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "enumwright", "generate", "-vv", "-c", "gen.json", "-e", "defs.toml", "--print",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("gen.json")));
        assert_eq!(cli.enums, PathBuf::from("defs.toml"));
        match cli.command {
            Some(Commands::Generate(args)) => assert!(args.print),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_print_conflicts_with_check() {
        assert!(Cli::try_parse_from(["enumwright", "generate", "--print", "--check"]).is_err());
    }

    #[test]
    fn test_info_format() {
        let cli = Cli::try_parse_from(["enumwright", "info", "--format", "json", "--enum", "Color"]).unwrap();
        match cli.command {
            Some(Commands::Info(args)) => {
                assert_eq!(args.format, InfoFormat::Json);
                assert_eq!(args.name.as_deref(), Some("Color"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
