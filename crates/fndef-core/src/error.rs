//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Structural errors name the partition or location that has the wrong
//!   shape. They abort a run before any validation stage executes.
//! - Validation findings are never represented here; they are plain data
//!   produced by `fndef-schema`.

use thiserror::Error;

/// Top-level error type for the function definitions checker.
#[derive(Error, Debug)]
pub enum FndefError {
    /// The document does not have the expected structural shape.
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// The document could not be read or parsed.
    #[error("document load error: {0}")]
    Load(String),

    /// A symbol could not be resolved to a backing type.
    #[error("resolution error: {0}")]
    Resolution(String),
}


/// A partition or field is absent or of the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The document root is not a mapping.
    #[error("document root must be a mapping, found {found}")]
    RootNotMapping {
        /// YAML kind found at the root.
        found: String,
    },

    /// A required top-level partition is absent.
    #[error("required partition '{partition}' is undefined")]
    MissingPartition {
        /// Name of the absent partition.
        partition: String,
    },

    /// A partition, entry or field has the wrong shape.
    #[error("malformed definitions at {location}: {reason}")]
    Malformed {
        /// Where the shape mismatch was detected (line/column or partition).
        location: String,
        /// What was expected and what was found.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_partition_names_partition() {
        let err = StructuralError::MissingPartition {
            partition: "BackingParameterTypes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required partition 'BackingParameterTypes' is undefined"
        );
    }

    #[test]
    fn structural_error_wraps_into_top_level() {
        let err: FndefError = StructuralError::RootNotMapping {
            found: "sequence".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("structural error:"));
        assert!(err.to_string().contains("sequence"));
    }
}
