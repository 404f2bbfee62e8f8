//! # fndef-schema — Function Definitions Consistency Checker
//!
//! Validates the internal consistency of a function definitions document:
//! the layered type schema that tells the API tracer how every parameter of
//! a traced function resolves to a concrete backing representation.
//!
//! ## Document
//!
//! The [`document`] module defines the four partitions (`Modules`,
//! `Structures`, `HighLevelParameterTypes`, `BackingParameterTypes`) as typed
//! records and loads them from YAML. A document with the wrong shape is a
//! [`LoadError`], never a finding.
//!
//! ## Validation Pipeline
//!
//! - [`extract`]: referenced-type sets and defining namespaces.
//! - [`resolver`]: missing-definition and multi-definition checks.
//! - [`cycles`]: alias-cycle detection per address width.
//! - [`validator`]: runs the stages and returns a [`ValidationReport`].
//!
//! Key function:
//!
//! - [`SchemaValidator::validate`]: every check, every finding, no
//!   short-circuiting.
//!
//! ## Parameter Resolution (`resolve`)
//!
//! The [`resolve`] module resolves a function's parameters to backing types,
//! sizes and structure layouts for one address width, the way the tracer
//! consumes a validated document.
//!
//! ## Crate Policy
//!
//! - Depends only on `fndef-core` internally.
//! - Every stage is a pure function; the document is never mutated.
//! - Diagnostics are ordered deterministically (sorted symbol sets, sorted
//!   partitions) so repeated runs print identical output.

pub mod cycles;
pub mod document;
pub mod extract;
pub mod finding;
pub mod resolve;
pub mod resolver;
pub mod validator;

pub use cycles::{detect_alias_cycles, walk_alias_chain};
pub use document::{
    FieldDescriptor, FunctionDefinitions, FunctionDescriptor, LoadError,
    DEFAULT_DEFINITIONS_PATH,
};
pub use extract::{extract_references, ReferencedTypes, SymbolTable};
pub use finding::{AliasCycle, Finding, FindingKind, SymbolSetFinding, ValidationReport};
pub use resolve::{describe_function, ParameterInformation, ParameterResolver, ResolveError};
pub use resolver::resolve_references;
pub use validator::{validate, SchemaValidator};
