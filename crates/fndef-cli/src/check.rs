//! # Check Command
//!
//! Loads the definitions document, runs every validation stage, prints one
//! diagnostic per finding and maps the outcome to an exit status. A load
//! failure is reported on its own line and never mixed with findings.

use std::io::Write;
use std::path::Path;

use fndef_schema::{Finding, SchemaValidator};
use serde::Serialize;

use crate::output::{write_json, write_load_error, OutputFormat};
use crate::{EXIT_FINDINGS, EXIT_LOAD_ERROR, EXIT_SUCCESS};

/// JSON shape of a check run.
#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    definitions: String,
    success: bool,
    findings: &'a [Finding],
}

/// Validate the document at `definitions` and write diagnostics to `out`.
///
/// Returns the process exit status. Only failures to write output are
/// returned as errors.
pub fn run_check(
    definitions: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    tracing::info!(definitions = %definitions.display(), "validating function definitions");

    let validator = match SchemaValidator::load(definitions) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("{e}");
            write_load_error(out, format, definitions, &e.to_string())?;
            return Ok(EXIT_LOAD_ERROR);
        }
    };

    let report = validator.validate();
    match format {
        OutputFormat::Text => {
            for finding in report.findings() {
                writeln!(out, "{finding}")?;
            }
        }
        OutputFormat::Json => write_json(
            out,
            &CheckOutput {
                definitions: definitions.display().to_string(),
                success: report.is_success(),
                findings: report.findings(),
            },
        )?,
    }

    Ok(if report.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_FINDINGS
    })
}
