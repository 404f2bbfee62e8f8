//! # Validation Orchestrator
//!
//! Runs the stages in sequence and folds their findings into one
//! [`ValidationReport`]:
//!
//! 1. reference extraction ([`crate::extract::extract_references`]),
//! 2. symbol table construction ([`crate::extract::SymbolTable`]),
//! 3. resolution and ambiguity checks ([`crate::resolver::resolve_references`]),
//! 4. alias cycle detection ([`crate::cycles::detect_alias_cycles`]).
//!
//! Each stage is a pure function of the document and of the previous
//! stage's output. Running the validator twice on the same document yields
//! the same report.

use std::path::Path;

use crate::cycles::detect_alias_cycles;
use crate::document::{FunctionDefinitions, LoadError};
use crate::extract::{ReferencedTypes, SymbolTable};
use crate::finding::ValidationReport;
use crate::resolver::resolve_references;

/// Validate a parsed document.
pub fn validate(definitions: &FunctionDefinitions) -> ValidationReport {
    let refs = ReferencedTypes::from_definitions(definitions);
    let table = SymbolTable::from_definitions(definitions);
    tracing::debug!(
        parameter_types = refs.parameter_types.len(),
        struct_parameter_types = refs.struct_parameter_types.len(),
        struct_names = table.struct_names.len(),
        highlevel_names = table.highlevel_names.len(),
        backing_names = table.backing_names.len(),
        "extracted symbol sets"
    );

    let mut findings = resolve_references(&refs, &table);
    findings.extend(detect_alias_cycles(&definitions.high_level_parameter_types));

    let report = ValidationReport::new(findings);
    for (kind, count) in report.counts_by_kind() {
        tracing::warn!(%kind, count, "validation finding");
    }
    tracing::info!(
        functions = definitions.function_count(),
        findings = report.len(),
        success = report.is_success(),
        "validation complete"
    );
    report
}

/// A loaded function definitions document ready for validation.
///
/// The document is read once at construction and never mutated.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    definitions: FunctionDefinitions,
}

impl SchemaValidator {
    /// Wrap an already-parsed document.
    pub fn new(definitions: FunctionDefinitions) -> Self {
        Self { definitions }
    }

    /// Load the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read, is not YAML, or
    /// does not have the four-partition shape.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        FunctionDefinitions::load(path).map(Self::new)
    }

    /// The document under validation.
    pub fn definitions(&self) -> &FunctionDefinitions {
        &self.definitions
    }

    /// Run every stage and return the aggregated report.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingKind;

    fn report(yaml: &str) -> ValidationReport {
        validate(&FunctionDefinitions::from_yaml_str(yaml).unwrap())
    }

    #[test]
    fn consistent_document_succeeds() {
        let r = report(
            r#"
Modules:
  kernel32.dll:
    CloseHandle:
      Parameters:
        hObject: HANDLE
Structures: {}
HighLevelParameterTypes:
  AddressWidth64Bit:
    HANDLE: uint64_t
BackingParameterTypes:
  uint64_t: 8
"#,
        );
        assert!(r.is_success(), "unexpected findings:\n{r}");
    }

    #[test]
    fn resolver_findings_precede_cycle_findings() {
        let r = report(
            r#"
Modules:
  m:
    f:
      Parameters:
        p: UNKNOWN
Structures: {}
HighLevelParameterTypes:
  AddressWidth32Bit:
    A: B
    B: A
BackingParameterTypes: {}
"#,
        );
        let kinds: Vec<FindingKind> = r.findings().iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            [
                FindingKind::MissingFunctionParameter,
                FindingKind::AliasCycle,
                FindingKind::AliasCycle,
            ]
        );
    }

    #[test]
    fn schema_validator_wraps_document() {
        let defs = FunctionDefinitions::default();
        let validator = SchemaValidator::new(defs.clone());
        assert_eq!(validator.definitions(), &defs);
        assert!(validator.validate().is_success());
    }
}
