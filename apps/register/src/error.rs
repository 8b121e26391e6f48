//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Farmstand POS                          │
//! │                                                                         │
//! │  Operator types: scan 123456789013                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Barcode Error? ── BarcodeError::CheckDigitMismatch ──┐         │  │
//! │  │  Cart Error?    ── CoreError::OutOfStock ─────────────┤         │  │
//! │  │  Storage Error? ── DbError::InsufficientStock ────────┴► ApiError│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stdout: error: Invalid check digit. Expected 2, got 3                 │
//! │  stderr: WARN Command failed error=[INVALID_BARCODE] Invalid check …   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details that mean nothing to the operator are logged and
//! replaced with a generic message.

use serde::Serialize;
use thiserror::Error;

use farmstand_core::{BarcodeError, CoreError, ValidationError};
use farmstand_db::DbError;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "OUT_OF_STOCK",
///   "message": "Pickled Beets is out of stock"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{}] {message}", code.as_str())]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, sale, or cart line not found
    NotFound,

    /// Input validation failed (bad number, empty name, unknown command)
    ValidationError,

    /// Scanned or typed barcode failed UPC-A validation
    InvalidBarcode,

    /// Cart operation failed
    CartError,

    /// Checkout attempted with nothing in the cart
    EmptyCart,

    /// Product has no stock left to add
    OutOfStock,

    /// Stock changed since the item was added; sale not applied
    InsufficientStock,

    /// Duplicate barcode or sale id
    Conflict,

    /// Stored data is unreadable
    CorruptData,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidBarcode => "INVALID_BARCODE",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::EmptyCart => "EMPTY_CART",
            ErrorCode::OutOfStock => "OUT_OF_STOCK",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::CorruptData => "CORRUPT_DATA",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            err @ DbError::InsufficientStock { .. } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("{}. Sale not recorded", err),
            ),
            DbError::CorruptData { key, message } => {
                tracing::error!(key = %key, "Corrupt stored data: {}", message);
                ApiError::new(
                    ErrorCode::CorruptData,
                    format!("Stored data under '{}' is unreadable", key),
                )
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Unexpected storage failure")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotInCart(id) => ApiError::not_found("Cart item", &id),
            err @ CoreError::OutOfStock { .. } => {
                ApiError::new(ErrorCode::OutOfStock, err.to_string())
            }
            err @ CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            err @ CoreError::CartTooLarge { .. } => {
                ApiError::new(ErrorCode::CartError, err.to_string())
            }
            CoreError::Barcode(e) => e.into(),
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Barcode failures carry the codec's own message.
impl From<BarcodeError> for ApiError {
    fn from(err: BarcodeError) -> Self {
        ApiError::new(ErrorCode::InvalidBarcode, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::barcode;

    #[test]
    fn test_display_includes_code() {
        let err = ApiError::not_found("Product", "p-1");
        assert_eq!(err.to_string(), "[NOT_FOUND] Product not found: p-1");
    }

    #[test]
    fn test_barcode_error_keeps_message() {
        let err: ApiError = barcode::validate("123456789013").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidBarcode);
        assert_eq!(err.message, "Invalid check digit. Expected 2, got 3");

        let err: ApiError = CoreError::from(barcode::validate("12345").unwrap_err()).into();
        assert_eq!(err.code, ErrorCode::InvalidBarcode);
        assert_eq!(err.message, "Barcode must be exactly 12 digits, got 5");
    }

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::EmptyCart);

        let err: ApiError = CoreError::OutOfStock {
            product: "Pickled Beets".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::OutOfStock);
        assert_eq!(err.message, "Pickled Beets is out of stock");
    }

    #[test]
    fn test_db_error_codes() {
        let err: ApiError = DbError::InsufficientStock {
            product_id: "eggs".to_string(),
            available: 1,
            requested: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));

        let err: ApiError = DbError::Internal("key must be a string".to_string()).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.to_string(), "[INTERNAL] Unexpected storage failure");
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
