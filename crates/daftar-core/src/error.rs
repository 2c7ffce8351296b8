//! # Error Types
//!
//! Domain-specific error types for daftar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  daftar-core errors (this file)                                        │
//! │  └── ValidationError  - Input / invariant violations                   │
//! │                                                                         │
//! │  daftar-db errors (separate crate)                                     │
//! │  └── DbError          - Storage, format and validation failures        │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → CliError → stderr                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ValidationError` is always raised before anything is written, so a
//! failed save never leaves a collection half-updated.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a record handed to the store (or to one of the
/// builders in [`crate::references`]) does not satisfy the data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A referenced record could not be resolved at construction time.
    ///
    /// ## When This Occurs
    /// - Building an invoice for a customer id that is not in the collection
    /// - Building an invoice line for a product id that is not in the collection
    #[error("{entity} could not be resolved: {id}")]
    Unresolved { entity: String, id: String },

    /// Derived fields disagree with their inputs (e.g., total != subtotal + tax).
    #[error("{field} is inconsistent: expected {expected}, found {found}")]
    Inconsistent {
        field: String,
        expected: String,
        found: String,
    },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a MustBePositive error for the given field.
    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }

    /// Creates an Unresolved error for a reference.
    pub fn unresolved(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ValidationError::Unresolved {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("sku");
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::must_be_positive("salePrice");
        assert_eq!(err.to_string(), "salePrice must be positive");

        let err = ValidationError::Duplicate {
            field: "sku".to_string(),
            value: "P1".to_string(),
        };
        assert_eq!(err.to_string(), "sku 'P1' already exists");
    }

    #[test]
    fn test_unresolved_message() {
        let err = ValidationError::unresolved("Customer", "c-42");
        assert_eq!(err.to_string(), "Customer could not be resolved: c-42");
    }
}
