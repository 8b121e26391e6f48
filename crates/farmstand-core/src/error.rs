//! # Error Types
//!
//! Domain-specific error types for farmstand-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farmstand-core errors                                                 │
//! │  ├── BarcodeError     - Malformed code / check digit mismatch          │
//! │  ├── CoreError        - Cart and sale rule violations (this file)      │
//! │  └── ValidationError  - Input validation failures (this file)          │
//! │                                                                         │
//! │  farmstand-db errors (separate crate)                                  │
//! │  └── DbError          - Persistence failures                           │
//! │                                                                         │
//! │  Register errors (in app)                                              │
//! │  └── ApiError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError / BarcodeError → CoreError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error is returned as a value. Nothing in this crate panics on bad
//! input, so the caller can always render a message.

use thiserror::Error;

use crate::barcode::BarcodeError;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and sale rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product has no stock left, so no cart line can be created.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan "Free-range Eggs" (stock: 0)
    ///      │
    ///      ▼
    /// OutOfStock { product: "Free-range Eggs" }
    ///      │
    ///      ▼
    /// UI shows: "Free-range Eggs is out of stock"
    /// ```
    #[error("{product} is out of stock")]
    OutOfStock { product: String },

    /// Quantity change for a product that has no cart line.
    #[error("Product {0} is not in the cart")]
    ItemNotInCart(String),

    /// Attempt to complete a sale with no lines.
    #[error("Cannot complete a sale with an empty cart")]
    EmptyCart,

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Barcode failed to parse or validate.
    #[error("Invalid barcode: {0}")]
    Barcode(#[from] BarcodeError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when operator input doesn't meet requirements, before any
/// cart or catalog logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::FormatError;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            product: "Free-range Eggs".to_string(),
        };
        assert_eq!(err.to_string(), "Free-range Eggs is out of stock");
        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cannot complete a sale with an empty cart"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "stock".to_string(),
        };
        assert_eq!(err.to_string(), "stock cannot be negative");
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = BarcodeError::Format(FormatError::Empty).into();
        assert!(matches!(core_err, CoreError::Barcode(_)));
    }
}
