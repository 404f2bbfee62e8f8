//! # Function Definitions Document
//!
//! Typed model of the four partitions of a function definitions document
//! and the loader that turns YAML text into it.
//!
//! ## Load Contract
//!
//! Loading is the trust boundary of a run. The document is parsed in two
//! steps: first as an untyped YAML tree (syntax errors become
//! [`LoadError::Parse`]), then into the typed partitions (shape errors become
//! [`LoadError::Structural`]). No validation stage runs unless both succeed.
//!
//! All four partitions are required. A partition written as an empty block
//! (`Structures:` with nothing beneath it) is an empty partition, not an error.

use std::collections::BTreeMap;
use std::path::Path;

use fndef_core::{AddressWidth, FndefError, StructuralError, Symbol};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Top-level key of the module partition.
pub const MODULES_PARTITION: &str = "Modules";
/// Top-level key of the structure partition.
pub const STRUCTURES_PARTITION: &str = "Structures";
/// Top-level key of the high-level parameter type partition.
pub const HIGH_LEVEL_PARTITION: &str = "HighLevelParameterTypes";
/// Top-level key of the backing parameter type partition.
pub const BACKING_PARTITION: &str = "BackingParameterTypes";

/// Partitions every document must define, in the order they are checked.
pub const REQUIRED_PARTITIONS: [&str; 4] = [
    MODULES_PARTITION,
    STRUCTURES_PARTITION,
    HIGH_LEVEL_PARTITION,
    BACKING_PARTITION,
];

/// Well-known location of the definitions document, relative to the
/// directory the checker is run from.
pub const DEFAULT_DEFINITIONS_PATH: &str =
    "../configuration/functiondefinitions/functionDefinitions.yaml";

/// Module name → function name → descriptor.
pub type Modules = BTreeMap<String, BTreeMap<String, FunctionDescriptor>>;

/// Structure name → field name → field descriptor (fields in document order).
pub type Structures = BTreeMap<Symbol, IndexMap<String, FieldDescriptor>>;

/// Alias name → alias target, for one address width.
pub type AliasTable = BTreeMap<Symbol, Symbol>;

/// Address width → alias table.
pub type HighLevelParameterTypes = BTreeMap<AddressWidth, AliasTable>;

/// Backing type name → size. The size is kept as raw YAML; only the
/// parameter resolver interprets it.
pub type BackingParameterTypes = BTreeMap<Symbol, serde_yaml::Value>;

/// A parsed function definitions document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinitions {
    /// Traced modules and their function descriptors.
    #[serde(rename = "Modules", deserialize_with = "null_as_empty")]
    pub modules: Modules,

    /// Structure layouts usable as parameter types.
    #[serde(rename = "Structures", deserialize_with = "null_as_empty")]
    pub structures: Structures,

    /// Alias chains, partitioned by address width.
    #[serde(rename = "HighLevelParameterTypes", deserialize_with = "null_as_empty")]
    pub high_level_parameter_types: HighLevelParameterTypes,

    /// Terminal types with their sizes.
    #[serde(rename = "BackingParameterTypes", deserialize_with = "null_as_empty")]
    pub backing_parameter_types: BackingParameterTypes,
}

/// Descriptor of a single traced function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Parameter name → parameter type, in calling order. Absent for
    /// parameterless functions.
    #[serde(rename = "Parameters", default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, Symbol>>,
}

/// Descriptor of one structure field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field type symbol.
    #[serde(rename = "type", alias = "Type")]
    pub type_name: Symbol,

    /// Byte offset inside the structure.
    #[serde(rename = "offset", alias = "Offset", default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Error raised before any validation stage runs.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("invalid YAML in '{path}': {reason}")]
    Parse {
        /// Path (or `<memory>`) of the document.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The document parsed but has the wrong shape.
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl From<LoadError> for FndefError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Structural(e) => FndefError::Structural(e),
            other => FndefError::Load(other.to_string()),
        }
    }
}

impl FunctionDefinitions {
    /// Load and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, otherwise the
    /// errors of [`FunctionDefinitions::parse`].
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "read definitions document");
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a document held in memory.
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        Self::parse(content, "<memory>")
    }

    /// Parse `content`, attributing errors to `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for YAML syntax errors and
    /// [`LoadError::Structural`] if the root is not a mapping, a required
    /// partition is absent, or any entry has the wrong shape.
    pub fn parse(content: &str, origin: &str) -> Result<Self, LoadError> {
        let tree: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| LoadError::Parse {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        check_partitions(&tree)?;

        serde_yaml::from_str(content).map_err(|e| {
            let location = e
                .location()
                .map(|l| format!("line {} column {}", l.line(), l.column()))
                .unwrap_or_else(|| origin.to_string());
            LoadError::Structural(StructuralError::Malformed {
                location,
                reason: e.to_string(),
            })
        })
    }

    /// Alias table for one address width, if that width is defined.
    pub fn aliases(&self, width: &str) -> Option<&AliasTable> {
        self.high_level_parameter_types.get(width)
    }

    /// Total number of function descriptors across all modules.
    pub fn function_count(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }
}

/// Verify the root is a mapping carrying every required partition.
fn check_partitions(tree: &serde_yaml::Value) -> Result<(), StructuralError> {
    let root = tree.as_mapping().ok_or_else(|| StructuralError::RootNotMapping {
        found: yaml_kind(tree).to_string(),
    })?;

    for partition in REQUIRED_PARTITIONS {
        if !root.contains_key(partition) {
            return Err(StructuralError::MissingPartition {
                partition: partition.to_string(),
            });
        }
    }
    Ok(())
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// Deserialize a partition, treating an explicit `null` as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
