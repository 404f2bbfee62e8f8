//! # Reference Resolution and Ambiguity Checks
//!
//! Six independent set-algebra checks over the output of the extraction
//! stage. Each check is a pure function returning `Some(finding)` when its
//! result set is non-empty. [`resolve_references`] runs all six and never
//! stops at the first failure.

use std::collections::BTreeSet;

use fndef_core::Symbol;

use crate::extract::{ReferencedTypes, SymbolTable};
use crate::finding::{Finding, FindingKind};

/// Symbols in `used` that none of the three namespaces defines.
fn undefined<'a>(
    used: impl IntoIterator<Item = &'a Symbol>,
    table: &SymbolTable,
) -> BTreeSet<Symbol> {
    used.into_iter()
        .filter(|symbol| !table.defines(symbol.as_str()))
        .cloned()
        .collect()
}

/// Function parameter types absent from every namespace.
pub fn missing_function_parameters(
    refs: &ReferencedTypes,
    table: &SymbolTable,
) -> Option<Finding> {
    Finding::from_set(
        FindingKind::MissingFunctionParameter,
        undefined(&refs.parameter_types, table),
    )
}

/// Structure field types absent from every namespace.
pub fn missing_struct_parameters(refs: &ReferencedTypes, table: &SymbolTable) -> Option<Finding> {
    Finding::from_set(
        FindingKind::MissingStructParameter,
        undefined(&refs.struct_parameter_types, table),
    )
}

/// Alias targets that are neither high-level nor backing names.
pub fn missing_high_level_targets(table: &SymbolTable) -> Option<Finding> {
    let missing = table
        .highlevel_targets
        .iter()
        .filter(|target| {
            !table.highlevel_names.contains(*target) && !table.backing_names.contains(*target)
        })
        .cloned()
        .collect();
    Finding::from_set(FindingKind::MissingHighLevelTarget, missing)
}

/// Names defined both as high-level and as backing types.
pub fn ambiguous_high_level_and_backing(table: &SymbolTable) -> Option<Finding> {
    Finding::from_set(
        FindingKind::AmbiguousHighLevelAndBacking,
        &table.highlevel_names & &table.backing_names,
    )
}

/// Names defined both as high-level types and as structures.
pub fn ambiguous_high_level_and_struct(table: &SymbolTable) -> Option<Finding> {
    Finding::from_set(
        FindingKind::AmbiguousHighLevelAndStruct,
        &table.highlevel_names & &table.struct_names,
    )
}

/// Names defined both as structures and as backing types.
pub fn ambiguous_struct_and_backing(table: &SymbolTable) -> Option<Finding> {
    Finding::from_set(
        FindingKind::AmbiguousStructAndBacking,
        &table.struct_names & &table.backing_names,
    )
}

/// Run every resolution and ambiguity check and collect the findings in
/// a fixed order.
pub fn resolve_references(refs: &ReferencedTypes, table: &SymbolTable) -> Vec<Finding> {
    [
        missing_function_parameters(refs, table),
        missing_struct_parameters(refs, table),
        missing_high_level_targets(table),
        ambiguous_high_level_and_backing(table),
        ambiguous_high_level_and_struct(table),
        ambiguous_struct_and_backing(table),
    ]
    .into_iter()
    .flatten()
    .collect()
}
