//! # Reference and Symbol Extraction
//!
//! First two stages of a validation run:
//!
//! - [`extract_references`] walks `Modules` and `Structures` and collects the
//!   symbols they *use* as types.
//! - [`SymbolTable::build`] collects the symbols the three defining
//!   partitions *declare*.
//!
//! Both are pure functions of the typed document. Shape errors are rejected
//! when the document is loaded, so neither stage can fail.
//!
//! ## Struct Flattening
//!
//! Structure names never appear in the parameter set. Instead the field
//! types of every structure are folded into it, whether or not a function
//! uses that structure:
//!
//! ```text
//! parameter_types = (module parameter types ∪ struct_parameter_types) − struct_names
//! ```
//!
//! Flattening is single-level: a field whose type is itself a structure is
//! dropped, because that structure's own fields are collected in turn.

use std::collections::BTreeSet;

use fndef_core::Symbol;

use crate::document::{
    BackingParameterTypes, FunctionDefinitions, HighLevelParameterTypes, Modules, Structures,
};

/// Symbols used as types by functions and structure fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencedTypes {
    /// Function parameter types and every structure field type, structure
    /// names excluded.
    pub parameter_types: BTreeSet<Symbol>,
    /// Field types of every structure, excluding structure names.
    pub struct_parameter_types: BTreeSet<Symbol>,
}

/// Symbols declared by the three defining partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Keys of `Structures`.
    pub struct_names: BTreeSet<Symbol>,
    /// Keys of `HighLevelParameterTypes`, merged across address widths.
    pub highlevel_names: BTreeSet<Symbol>,
    /// Alias targets of `HighLevelParameterTypes`, merged across address widths.
    pub highlevel_targets: BTreeSet<Symbol>,
    /// Keys of `BackingParameterTypes`.
    pub backing_names: BTreeSet<Symbol>,
}

/// Collect the referenced-type sets from `Modules` and `Structures`.
pub fn extract_references(modules: &Modules, structures: &Structures) -> ReferencedTypes {
    let struct_parameter_types: BTreeSet<Symbol> = structures
        .values()
        .flat_map(|fields| fields.values())
        .map(|field| &field.type_name)
        .filter(|ty| !structures.contains_key(*ty))
        .cloned()
        .collect();

    let parameter_types = modules
        .values()
        .flat_map(|functions| functions.values())
        .filter_map(|descriptor| descriptor.parameters.as_ref())
        .flat_map(|parameters| parameters.values())
        .filter(|ty| !structures.contains_key(*ty))
        .chain(struct_parameter_types.iter())
        .cloned()
        .collect();

    ReferencedTypes {
        parameter_types,
        struct_parameter_types,
    }
}

impl ReferencedTypes {
    /// Extract from a whole document.
    pub fn from_definitions(definitions: &FunctionDefinitions) -> Self {
        extract_references(&definitions.modules, &definitions.structures)
    }
}

impl SymbolTable {
    /// Collect the defining namespaces. Empty partitions yield empty sets.
    pub fn build(
        structures: &Structures,
        high_level: &HighLevelParameterTypes,
        backing: &BackingParameterTypes,
    ) -> Self {
        let mut highlevel_names = BTreeSet::new();
        let mut highlevel_targets = BTreeSet::new();
        for (name, target) in high_level.values().flat_map(|aliases| aliases.iter()) {
            highlevel_names.insert(name.clone());
            highlevel_targets.insert(target.clone());
        }

        Self {
            struct_names: structures.keys().cloned().collect(),
            highlevel_names,
            highlevel_targets,
            backing_names: backing.keys().cloned().collect(),
        }
    }

    /// Build from a whole document.
    pub fn from_definitions(definitions: &FunctionDefinitions) -> Self {
        Self::build(
            &definitions.structures,
            &definitions.high_level_parameter_types,
            &definitions.backing_parameter_types,
        )
    }

    /// Whether `symbol` is declared by any of the three namespaces.
    pub fn defines(&self, symbol: &str) -> bool {
        self.struct_names.contains(symbol)
            || self.highlevel_names.contains(symbol)
            || self.backing_names.contains(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(yaml: &str) -> FunctionDefinitions {
        FunctionDefinitions::from_yaml_str(yaml).unwrap()
    }

    fn symbols(names: &[&str]) -> BTreeSet<Symbol> {
        names.iter().copied().map(Symbol::from).collect()
    }

    const DOC: &str = r#"
Modules:
  user32.dll:
    GetCursorPos:
      Parameters:
        lpPoint: POINT
    MessageBoxW:
      Parameters:
        hWnd: HWND
        lpText: LPCWSTR
        uType: UINT
    GetDesktopWindow: {}
Structures:
  POINT:
    x:
      type: LONG
    y:
      type: LONG
  RECT_PAIR:
    first:
      type: POINT
    tag:
      type: BYTE
HighLevelParameterTypes:
  AddressWidth32Bit:
    HWND: HANDLE
    HANDLE: uint32_t
  AddressWidth64Bit:
    HWND: HANDLE
    HANDLE: uint64_t
BackingParameterTypes:
  LONG: 4
  UINT: 4
  BYTE: 1
  uint32_t: 4
  uint64_t: 8
"#;

    #[test]
    fn struct_parameter_expands_into_field_types() {
        let refs = ReferencedTypes::from_definitions(&definitions(DOC));
        assert_eq!(
            refs.parameter_types,
            symbols(&["BYTE", "HWND", "LONG", "LPCWSTR", "UINT"])
        );
        assert!(!refs.parameter_types.contains("POINT"));
        assert!(!refs.parameter_types.contains("RECT_PAIR"));
    }

    #[test]
    fn unused_structure_fields_join_parameter_types() {
        let doc = r#"
Modules:
  kernel32.dll:
    GetTickCount:
      Parameters:
        dwMilliseconds: DWORD
Structures:
  FILETIME:
    dwLowDateTime:
      type: LOW_PART
    dwHighDateTime:
      type: DWORD
HighLevelParameterTypes: {}
BackingParameterTypes: {}
"#;
        let refs = ReferencedTypes::from_definitions(&definitions(doc));
        assert_eq!(refs.parameter_types, symbols(&["DWORD", "LOW_PART"]));
        assert!(refs.struct_parameter_types.is_subset(&refs.parameter_types));
    }

    #[test]
    fn nested_struct_field_is_not_a_struct_parameter() {
        let refs = ReferencedTypes::from_definitions(&definitions(DOC));
        assert_eq!(refs.struct_parameter_types, symbols(&["BYTE", "LONG"]));
    }

    #[test]
    fn parameterless_function_contributes_nothing() {
        let doc = r#"
Modules:
  ntdll.dll:
    NtYieldExecution: {}
Structures: {}
HighLevelParameterTypes: {}
BackingParameterTypes: {}
"#;
        let refs = ReferencedTypes::from_definitions(&definitions(doc));
        assert!(refs.parameter_types.is_empty());
        assert!(refs.struct_parameter_types.is_empty());
    }

    #[test]
    fn symbol_table_merges_address_widths() {
        let table = SymbolTable::from_definitions(&definitions(DOC));
        assert_eq!(table.struct_names, symbols(&["POINT", "RECT_PAIR"]));
        assert_eq!(table.highlevel_names, symbols(&["HANDLE", "HWND"]));
        assert_eq!(
            table.highlevel_targets,
            symbols(&["HANDLE", "uint32_t", "uint64_t"])
        );
        assert_eq!(
            table.backing_names,
            symbols(&["BYTE", "LONG", "UINT", "uint32_t", "uint64_t"])
        );
    }

    #[test]
    fn symbol_table_defines() {
        let table = SymbolTable::from_definitions(&definitions(DOC));
        assert!(table.defines("POINT"));
        assert!(table.defines("HWND"));
        assert!(table.defines("uint64_t"));
        assert!(!table.defines("LPCWSTR"));
    }

    #[test]
    fn empty_partitions_yield_empty_table() {
        let table = SymbolTable::from_definitions(&FunctionDefinitions::default());
        assert_eq!(table, SymbolTable::default());
    }
}
