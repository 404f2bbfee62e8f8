//! # Parameter Resolution
//!
//! Resolves the parameters of a traced function down to backing types and
//! sizes for one address width, the way the tracer consumes a validated
//! document.
//!
//! ## Resolution Rules
//!
//! For a symbol `s` in address width `w`:
//!
//! 1. `s` is a backing type → `s`.
//! 2. `s` is a structure → structures are passed by pointer, so `s`
//!    resolves as [`HANDLE_TYPE`].
//! 3. `s` is a high-level name in `w` → resolve its target.
//! 4. otherwise → [`ResolveError::UnresolvedSymbol`].
//!
//! A structure-typed parameter additionally carries its fields, recursively,
//! each with its declared offset.

use std::collections::BTreeSet;

use fndef_core::{AddressWidth, FndefError, Symbol};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::document::{AliasTable, FieldDescriptor, FunctionDefinitions};

/// Pointer-sized type structures resolve to.
pub const HANDLE_TYPE: &str = "HANDLE";

/// Failure to resolve a function's parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The module is not defined.
    #[error("requested module {module} could not be found")]
    UnknownModule {
        /// Requested module.
        module: String,
    },

    /// The function is not defined in the module.
    #[error("requested function {function} could not be found in module {module}")]
    UnknownFunction {
        /// Requested module.
        module: String,
        /// Requested function.
        function: String,
    },

    /// `HighLevelParameterTypes` has no such address width.
    #[error("unsupported address width {address_width}")]
    UnknownAddressWidth {
        /// Requested width key.
        address_width: String,
    },

    /// The symbol is neither backing, structure nor high-level in this width.
    #[error("could not find high level parameter type {symbol} for address width {address_width}")]
    UnresolvedSymbol {
        /// Symbol that failed to resolve.
        symbol: Symbol,
        /// Width it was resolved in.
        address_width: AddressWidth,
    },

    /// Resolution revisited a name before reaching a backing type.
    #[error("resolution of {symbol} in address width {address_width} does not terminate")]
    AliasCycle {
        /// Symbol resolution started from.
        symbol: Symbol,
        /// Width it was resolved in.
        address_width: AddressWidth,
    },

    /// A structure contains itself.
    #[error("structure {structure} contains itself")]
    RecursiveStructure {
        /// Structure met twice on the expansion path.
        structure: Symbol,
    },

    /// A backing size is not an unsigned integer.
    #[error("backing type {symbol} has invalid size {size}")]
    InvalidSize {
        /// Backing type.
        symbol: Symbol,
        /// Size as written in the document.
        size: String,
    },
}

impl From<ResolveError> for FndefError {
    fn from(err: ResolveError) -> Self {
        FndefError::Resolution(err.to_string())
    }
}

/// A parameter or structure field resolved to its backing type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInformation {
    /// Parameter or field name.
    pub name: String,
    /// Backing type the declared type resolves to.
    pub basic_type: Symbol,
    /// Size of `basic_type` in bytes.
    pub size: u64,
    /// Offset inside the enclosing structure; 0 for function parameters.
    pub offset: u64,
    /// Fields of a structure-typed parameter, in document order.
    pub backing_parameters: Vec<ParameterInformation>,
}

/// Resolver bound to a document and one address width.
#[derive(Debug)]
pub struct ParameterResolver<'a> {
    definitions: &'a FunctionDefinitions,
    address_width: AddressWidth,
    aliases: &'a AliasTable,
}

impl<'a> ParameterResolver<'a> {
    /// Bind a resolver to `address_width`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownAddressWidth`] if the document does not
    /// define that width.
    pub fn new(
        definitions: &'a FunctionDefinitions,
        address_width: &str,
    ) -> Result<Self, ResolveError> {
        let aliases =
            definitions
                .aliases(address_width)
                .ok_or_else(|| ResolveError::UnknownAddressWidth {
                    address_width: address_width.to_string(),
                })?;
        Ok(Self {
            definitions,
            address_width: AddressWidth::new(address_width),
            aliases,
        })
    }

    /// Resolve `symbol` to a backing type.
    pub fn basic_type(&self, symbol: &Symbol) -> Result<Symbol, ResolveError> {
        let mut visited = BTreeSet::new();
        let mut current = symbol.clone();
        loop {
            if self.definitions.backing_parameter_types.contains_key(&current) {
                return Ok(current);
            }
            if !visited.insert(current.clone()) {
                return Err(ResolveError::AliasCycle {
                    symbol: symbol.clone(),
                    address_width: self.address_width.clone(),
                });
            }
            current = if self.definitions.structures.contains_key(&current) {
                Symbol::from(HANDLE_TYPE)
            } else if let Some(target) = self.aliases.get(&current) {
                target.clone()
            } else {
                return Err(ResolveError::UnresolvedSymbol {
                    symbol: current,
                    address_width: self.address_width.clone(),
                });
            };
        }
    }

    /// Size in bytes of the backing type `symbol` resolves to.
    pub fn size(&self, symbol: &Symbol) -> Result<u64, ResolveError> {
        let basic = self.basic_type(symbol)?;
        let raw = self
            .definitions
            .backing_parameter_types
            .get(&basic)
            .ok_or_else(|| ResolveError::UnresolvedSymbol {
                symbol: basic.clone(),
                address_width: self.address_width.clone(),
            })?;
        raw.as_u64().ok_or_else(|| ResolveError::InvalidSize {
            symbol: basic.clone(),
            size: serde_yaml::to_string(raw)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_else(|_| format!("{raw:?}")),
        })
    }

    /// Resolve every parameter of `module`'s `function`, in calling order.
    pub fn function_parameters(
        &self,
        module: &str,
        function: &str,
    ) -> Result<Vec<ParameterInformation>, ResolveError> {
        let functions =
            self.definitions
                .modules
                .get(module)
                .ok_or_else(|| ResolveError::UnknownModule {
                    module: module.to_string(),
                })?;
        let descriptor = functions
            .get(function)
            .ok_or_else(|| ResolveError::UnknownFunction {
                module: module.to_string(),
                function: function.to_string(),
            })?;

        let Some(parameters) = descriptor.parameters.as_ref() else {
            return Ok(Vec::new());
        };

        let mut expanding = Vec::new();
        parameters
            .iter()
            .map(|(name, ty)| self.describe(name, ty, 0, &mut expanding))
            .collect()
    }

    fn describe(
        &self,
        name: &str,
        ty: &Symbol,
        offset: u64,
        expanding: &mut Vec<Symbol>,
    ) -> Result<ParameterInformation, ResolveError> {
        let backing_parameters = match self.definitions.structures.get(ty) {
            Some(fields) => self.struct_fields(ty, fields, expanding)?,
            None => Vec::new(),
        };
        Ok(ParameterInformation {
            name: name.to_string(),
            basic_type: self.basic_type(ty)?,
            size: self.size(ty)?,
            offset,
            backing_parameters,
        })
    }

    fn struct_fields(
        &self,
        structure: &Symbol,
        fields: &IndexMap<String, FieldDescriptor>,
        expanding: &mut Vec<Symbol>,
    ) -> Result<Vec<ParameterInformation>, ResolveError> {
        if expanding.contains(structure) {
            return Err(ResolveError::RecursiveStructure {
                structure: structure.clone(),
            });
        }
        expanding.push(structure.clone());
        let resolved = fields
            .iter()
            .map(|(name, field)| {
                self.describe(name, &field.type_name, field.offset.unwrap_or(0), expanding)
            })
            .collect();
        expanding.pop();
        resolved
    }
}

/// Resolve `module`'s `function` for `address_width` in one call.
pub fn describe_function(
    definitions: &FunctionDefinitions,
    module: &str,
    function: &str,
    address_width: &str,
) -> Result<Vec<ParameterInformation>, FndefError> {
    let resolver = ParameterResolver::new(definitions, address_width)?;
    Ok(resolver.function_parameters(module, function)?)
}
