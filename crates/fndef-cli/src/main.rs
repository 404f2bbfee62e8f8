//! # fndef-check entry point
//!
//! Parses command-line arguments and dispatches to command handlers.
//! Invoked without a subcommand, validates the definitions document at the
//! well-known relative path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fndef_cli::check::run_check;
use fndef_cli::describe::{run_describe, DescribeArgs};
use fndef_cli::output::{finish, OutputFormat};
use fndef_schema::DEFAULT_DEFINITIONS_PATH;

/// Function definitions checker.
///
/// Verifies that every parameter type used by the API tracer's function
/// definitions resolves to a defined backing type, with no alias rings and
/// no symbol defined in more than one partition.
#[derive(Parser, Debug)]
#[command(name = "fndef-check", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the function definitions document.
    #[arg(long, global = true, default_value = DEFAULT_DEFINITIONS_PATH)]
    definitions: PathBuf,

    /// Diagnostic output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the definitions document (the default).
    Check,

    /// Resolve a function's parameters to backing types for one address width.
    Describe(DescribeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(definitions = %cli.definitions.display(), "fndef-check starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        None | Some(Commands::Check) => run_check(&cli.definitions, cli.format, &mut out),
        Some(Commands::Describe(args)) => {
            run_describe(&args, &cli.definitions, cli.format, &mut out)
        }
    };

    match finish(&mut out, result) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(fndef_cli::EXIT_LOAD_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_no_arguments_uses_well_known_path() {
        let cli = Cli::try_parse_from(["fndef-check"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.definitions, PathBuf::from(DEFAULT_DEFINITIONS_PATH));
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_definitions_override() {
        let cli =
            Cli::try_parse_from(["fndef-check", "--definitions", "defs.yaml", "--format", "json"])
                .unwrap();
        assert_eq!(cli.definitions, PathBuf::from("defs.yaml"));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn cli_parse_explicit_check() {
        let cli = Cli::try_parse_from(["fndef-check", "check", "-vv"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parse_describe() {
        let cli = Cli::try_parse_from([
            "fndef-check",
            "describe",
            "kernel32.dll",
            "CreateFileW",
            "--address-width",
            "AddressWidth32Bit",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Describe(args)) => {
                assert_eq!(args.module, "kernel32.dll");
                assert_eq!(args.function, "CreateFileW");
                assert_eq!(args.address_width, "AddressWidth32Bit");
            }
            other => panic!("Expected describe, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_describe_default_width() {
        let cli = Cli::try_parse_from(["fndef-check", "describe", "ntdll.dll", "NtClose"]).unwrap();
        if let Some(Commands::Describe(args)) = cli.command {
            assert_eq!(args.address_width, "AddressWidth64Bit");
        }
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["fndef-check", "--format", "xml"]).is_err());
    }

    #[test]
    fn cli_command_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
