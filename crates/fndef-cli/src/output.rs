//! # Output Formats
//!
//! Text output is one line per diagnostic. JSON output is a single
//! document per invocation so CI tooling can consume it.

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

/// How diagnostics are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// JSON shape of a run that stopped because the document did not load.
#[derive(Debug, Serialize)]
struct LoadFailure<'a> {
    definitions: String,
    success: bool,
    load_error: &'a str,
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Report a document that could not be loaded, in the requested format.
pub fn write_load_error(
    out: &mut impl Write,
    format: OutputFormat,
    definitions: &Path,
    detail: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "document load error: {detail}")?,
        OutputFormat::Json => write_json(
            out,
            &LoadFailure {
                definitions: definitions.display().to_string(),
                success: false,
                load_error: detail,
            },
        )?,
    }
    Ok(())
}

/// Flush `out` once a handler has finished, keeping its exit status.
///
/// A failed flush means diagnostics were lost, so it is returned as an
/// error rather than ignored.
pub fn finish(out: &mut impl Write, result: anyhow::Result<u8>) -> anyhow::Result<u8> {
    let code = result?;
    out.flush()?;
    Ok(code)
}
