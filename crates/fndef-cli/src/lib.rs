//! # fndef-cli — Function Definitions Checker CLI
//!
//! Provides the `fndef-check` command-line interface around `fndef-schema`.
//!
//! ## Commands
//!
//! - `fndef-check`: validate the definitions document at the well-known
//!   path and exit non-zero on any finding.
//! - `fndef-check check`: the same, spelled out.
//! - `fndef-check describe <MODULE> <FUNCTION>`: resolve a function's
//!   parameters for one address width.
//!
//! ```bash
//! fndef-check
//! fndef-check --definitions functionDefinitions.yaml --format json
//! fndef-check describe kernel32.dll CreateFileW --address-width AddressWidth32Bit
//! ```
//!
//! ## Exit Status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | document loaded, no findings |
//! | 1 | at least one finding (or a parameter failed to resolve) |
//! | 2 | the document could not be loaded |
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `fndef-schema`; no checking logic here.
//! - Diagnostics go to stdout, logs go to stderr.

pub mod check;
pub mod describe;
pub mod output;

/// Document loaded and validated without findings.
pub const EXIT_SUCCESS: u8 = 0;
/// At least one validation finding or resolution failure.
pub const EXIT_FINDINGS: u8 = 1;
/// The document could not be read, parsed, or has the wrong shape.
pub const EXIT_LOAD_ERROR: u8 = 2;
