//! # fndef-core — Foundational Types for the Function Definitions Checker
//!
//! Leaf crate of the workspace. Defines the identifier newtypes used by
//! every other crate and the error hierarchy shared between the schema
//! engine and the CLI.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for schema identifiers.** `Symbol` names a type in
//!    one of the three defining namespaces; `AddressWidth` names a
//!    partition of `HighLevelParameterTypes`. No bare strings cross crate
//!    boundaries.
//!
//! 2. **Structural errors are not findings.** A document with the wrong
//!    shape produces a `StructuralError` and aborts the run. Inconsistencies
//!    inside a well-formed document are reported as data by `fndef-schema`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fndef-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod symbol;

pub use error::{FndefError, StructuralError};
pub use symbol::{AddressWidth, Symbol};
