//! # Describe Command
//!
//! Resolves the parameters of one traced function for one address width
//! and prints the backing type, size and structure layout of each.

use std::io::Write;
use std::path::Path;

use clap::Args;
use fndef_core::FndefError;
use fndef_schema::{describe_function, FunctionDefinitions, ParameterInformation};
use serde::Serialize;

use crate::output::{write_json, write_load_error, OutputFormat};
use crate::{EXIT_FINDINGS, EXIT_LOAD_ERROR, EXIT_SUCCESS};

/// Arguments for the describe subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Module the function belongs to, e.g. `kernel32.dll`.
    pub module: String,

    /// Function name, e.g. `CreateFileW`.
    pub function: String,

    /// Address width key of `HighLevelParameterTypes` to resolve in.
    #[arg(long, default_value = "AddressWidth64Bit")]
    pub address_width: String,
}

/// JSON shape of a describe run whose function did not resolve.
#[derive(Debug, Serialize)]
struct DescribeFailure<'a> {
    module: &'a str,
    function: &'a str,
    address_width: &'a str,
    success: bool,
    resolution_error: &'a str,
}

/// Load the document and resolve the function selected by `args`.
fn resolve(
    args: &DescribeArgs,
    definitions: &Path,
) -> Result<Vec<ParameterInformation>, FndefError> {
    let defs = FunctionDefinitions::load(definitions)?;
    describe_function(&defs, &args.module, &args.function, &args.address_width)
}

/// Resolve and print the parameters selected by `args`.
///
/// Returns the process exit status. Only failures to write output are
/// returned as errors.
pub fn run_describe(
    args: &DescribeArgs,
    definitions: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    let parameters = match resolve(args, definitions) {
        Ok(p) => p,
        Err(FndefError::Resolution(reason)) => {
            tracing::warn!(module = %args.module, function = %args.function, "{reason}");
            match format {
                OutputFormat::Text => writeln!(out, "resolution error: {reason}")?,
                OutputFormat::Json => write_json(
                    out,
                    &DescribeFailure {
                        module: &args.module,
                        function: &args.function,
                        address_width: &args.address_width,
                        success: false,
                        resolution_error: &reason,
                    },
                )?,
            }
            return Ok(EXIT_FINDINGS);
        }
        Err(FndefError::Load(detail)) => {
            tracing::error!("{detail}");
            write_load_error(out, format, definitions, &detail)?;
            return Ok(EXIT_LOAD_ERROR);
        }
        Err(FndefError::Structural(e)) => {
            tracing::error!("{e}");
            write_load_error(out, format, definitions, &e.to_string())?;
            return Ok(EXIT_LOAD_ERROR);
        }
    };

    match format {
        OutputFormat::Text => render_parameters(out, &parameters, 0)?,
        OutputFormat::Json => write_json(out, &parameters)?,
    }
    Ok(EXIT_SUCCESS)
}

/// Write one line per parameter, indenting structure fields by nesting depth.
pub fn render_parameters(
    out: &mut impl Write,
    parameters: &[ParameterInformation],
    depth: usize,
) -> std::io::Result<()> {
    for p in parameters {
        let indent = "  ".repeat(depth);
        if depth == 0 {
            writeln!(out, "{indent}{}: {} (size {})", p.name, p.basic_type, p.size)?;
        } else {
            writeln!(
                out,
                "{indent}{}: {} (size {}, offset {})",
                p.name, p.basic_type, p.size, p.offset
            )?;
        }
        render_parameters(out, &p.backing_parameters, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
Modules:
  user32.dll:
    GetCursorPos:
      Parameters:
        lpPoint: POINT
    GetDesktopWindow: {}
Structures:
  POINT:
    x:
      type: LONG
      offset: 0
    y:
      type: LONG
      offset: 4
HighLevelParameterTypes:
  AddressWidth32Bit:
    HANDLE: uint32_t
BackingParameterTypes:
  LONG: 4
  uint32_t: 4
"#;

    fn run(args: &DescribeArgs, format: OutputFormat) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("functionDefinitions.yaml");
        std::fs::write(&path, DOC).unwrap();
        let mut buf = Vec::new();
        let code = run_describe(args, &path, format, &mut buf).unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    fn args(module: &str, function: &str, width: &str) -> DescribeArgs {
        DescribeArgs {
            module: module.to_string(),
            function: function.to_string(),
            address_width: width.to_string(),
        }
    }

    #[test]
    fn describe_struct_parameter_text() {
        let (code, out) = run(
            &args("user32.dll", "GetCursorPos", "AddressWidth32Bit"),
            OutputFormat::Text,
        );
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(
            out,
            "lpPoint: uint32_t (size 4)\n  x: LONG (size 4, offset 0)\n  y: LONG (size 4, offset 4)\n"
        );
    }

    #[test]
    fn describe_json() {
        let (code, out) = run(
            &args("user32.dll", "GetCursorPos", "AddressWidth32Bit"),
            OutputFormat::Json,
        );
        assert_eq!(code, EXIT_SUCCESS);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "lpPoint");
        assert_eq!(value[0]["backing_parameters"][1]["offset"], 4);
    }

    #[test]
    fn parameterless_function_prints_nothing() {
        let (code, out) = run(
            &args("user32.dll", "GetDesktopWindow", "AddressWidth32Bit"),
            OutputFormat::Text,
        );
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_width_is_a_resolution_failure() {
        let (code, out) = run(
            &args("user32.dll", "GetCursorPos", "AddressWidth64Bit"),
            OutputFormat::Text,
        );
        assert_eq!(code, EXIT_FINDINGS);
        assert!(out.contains("unsupported address width AddressWidth64Bit"));
    }

    fn run_missing_document(format: OutputFormat) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Vec::new();
        let code = run_describe(
            &args("m", "f", "AddressWidth32Bit"),
            &dir.path().join("absent.yaml"),
            format,
            &mut buf,
        )
        .unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn load_error_exit_status() {
        let (code, out) = run_missing_document(OutputFormat::Text);
        assert_eq!(code, EXIT_LOAD_ERROR);
        assert!(out.starts_with("document load error: cannot read"));
    }

    #[test]
    fn load_error_honors_json_format() {
        let (code, out) = run_missing_document(OutputFormat::Json);
        assert_eq!(code, EXIT_LOAD_ERROR);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["definitions"].as_str().unwrap().ends_with("absent.yaml"));
        assert!(value["load_error"].as_str().unwrap().contains("cannot read"));
    }

    #[test]
    fn structural_error_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("functionDefinitions.yaml");
        std::fs::write(&path, "Modules: {}\n").unwrap();
        let mut buf = Vec::new();
        let code = run_describe(
            &args("m", "f", "AddressWidth32Bit"),
            &path,
            OutputFormat::Text,
            &mut buf,
        )
        .unwrap();
        assert_eq!(code, EXIT_LOAD_ERROR);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("required partition 'Structures' is undefined"));
    }

    #[test]
    fn resolution_failure_json() {
        let (code, out) = run(
            &args("user32.dll", "GetCursorPos", "AddressWidth64Bit"),
            OutputFormat::Json,
        );
        assert_eq!(code, EXIT_FINDINGS);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["function"], "GetCursorPos");
        assert!(value["resolution_error"]
            .as_str()
            .unwrap()
            .contains("unsupported address width"));
    }
}
