//! # Service Error Types
//!
//! Errors raised by the stateful desks, plus a machine-readable code for
//! whatever request layer sits on top.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request layer ──► OrderDesk / ReservationBook / CashRegister           │
//! │                              │                                          │
//! │             mesa-core rule broken? ── CoreError ──┐                     │
//! │             unknown id?  ─────────── NotFound ────┤                     │
//! │             slot taken?  ─────────── Conflict ────┼──► ServiceError     │
//! │                                                   │        │            │
//! │                                                   │        ▼            │
//! │                                                   │  ErrorCode +        │
//! │                                                   │  message (JSON)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mesa_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A mesa-core rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Entity with the given id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Table already held for an overlapping slot.
    #[error("Table {table_id} is already reserved from {start} (reservation {reservation_id})")]
    Conflict {
        table_id: String,
        reservation_id: String,
        start: String,
    },

    /// A shift is already open on this register.
    #[error("Shift {0} is already open")]
    ShiftAlreadyOpen(String),

    /// Cash operation with no open shift.
    #[error("No shift is open")]
    NoOpenShift,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        ServiceError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Core(core) => ErrorCode::from(core),
            ServiceError::NotFound { .. } => ErrorCode::NotFound,
            ServiceError::Conflict { .. } => ErrorCode::ReservationConflict,
            ServiceError::ShiftAlreadyOpen(_) | ServiceError::NoOpenShift => ErrorCode::ShiftError,
            ServiceError::InvalidConfig(_)
            | ServiceError::ConfigLoadFailed(_)
            | ServiceError::ConfigSaveFailed(_)
            | ServiceError::Io(_) => ErrorCode::Internal,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfig(_)
                | ServiceError::ConfigLoadFailed(_)
                | ServiceError::ConfigSaveFailed(_)
        )
    }

    /// Converts to the serializable shape handed to clients.
    pub fn to_payload(&self) -> ErrorPayload {
        let message = match self {
            // Keep internals out of client messages.
            ServiceError::Io(e) => {
                tracing::error!("I/O failure: {}", e);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };
        ErrorPayload {
            code: self.code(),
            message,
        }
    }
}

/// Error codes for client responses.
///
/// ```json
/// { "code": "RESERVATION_CONFLICT", "message": "Table T4 is already reserved ..." }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Business rule violated (422)
    BusinessLogic,

    /// Order line or draft operation failed
    OrderError,

    /// Requested slot overlaps an active reservation (409)
    ReservationConflict,

    /// Shift open/close problem
    ShiftError,

    /// Payment could not be applied
    PaymentError,

    /// Internal error (500)
    Internal,
}

impl From<&CoreError> for ErrorCode {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Validation(_)
            | CoreError::InvalidQuantity { .. }
            | CoreError::InvalidDuration { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::InvalidAdjustment { .. } => ErrorCode::ValidationError,
            CoreError::OrderTooLarge { .. }
            | CoreError::EmptyOrder
            | CoreError::OrderLineNotFound(_)
            | CoreError::MenuItemUnavailable(_)
            | CoreError::VariantNotFound { .. }
            | CoreError::ModifierNotFound { .. } => ErrorCode::OrderError,
            CoreError::ShiftClosed(_) => ErrorCode::ShiftError,
            CoreError::ChangeWithoutCash { .. } => ErrorCode::PaymentError,
            CoreError::InvalidStatusTransition { .. }
            | CoreError::ReceiptSequenceExhausted { .. } => ErrorCode::BusinessLogic,
            CoreError::AmountOverflow { .. } | CoreError::TimeOutOfRange(_) => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<mesa_core::ValidationError> for ServiceError {
    fn from(err: mesa_core::ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ServiceError {
    fn from(err: toml::ser::Error) -> Self {
        ServiceError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let err = ServiceError::from(CoreError::EmptyOrder);
        assert_eq!(err.code(), ErrorCode::OrderError);

        let err = ServiceError::from(CoreError::InvalidDuration { minutes: 0 });
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = ServiceError::from(CoreError::ChangeWithoutCash {
            change_cents: 100,
            cash_cents: 0,
        });
        assert_eq!(err.code(), ErrorCode::PaymentError);
    }

    #[test]
    fn test_payload_serialization() {
        let err = ServiceError::Conflict {
            table_id: "T4".into(),
            reservation_id: "r-1".into(),
            start: "2025-06-14T14:00:00Z".into(),
        };
        let json = serde_json::to_value(err.to_payload()).unwrap();
        assert_eq!(json["code"], "RESERVATION_CONFLICT");
        assert!(json["message"].as_str().unwrap().contains("T4"));
    }

    #[test]
    fn test_core_message_is_transparent() {
        let err = ServiceError::from(CoreError::OrderLineNotFound("l-9".into()));
        assert_eq!(err.to_string(), "Order line not found: l-9");
        assert_eq!(ServiceError::not_found("Order", "o-1").to_string(), "Order not found: o-1");
    }

    #[test]
    fn test_config_errors() {
        assert!(ServiceError::InvalidConfig("bad".into()).is_config_error());
        assert!(!ServiceError::NoOpenShift.is_config_error());
    }
}
