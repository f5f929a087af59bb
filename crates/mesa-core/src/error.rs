//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mesa-service errors (separate crate)                                  │
//! │  └── ServiceError     - Lookup, conflict and config failures           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → request layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant carries the value that was rejected so the request layer
//! can build a message without re-inspecting the input.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A cart line has quantity below one.
    ///
    /// ## When This Occurs
    /// - `compute_order_totals` sees a line with quantity 0 or negative
    /// - A line is constructed with a non-positive quantity (`line: None`)
    /// - A draft line is added or updated to a non-positive quantity
    #[error("{} has invalid quantity {quantity}: must be at least 1", line_label(.line))]
    InvalidQuantity { line: Option<usize>, quantity: i64 },

    /// A reservation duration is zero or negative.
    #[error("Invalid reservation duration {minutes} minutes: must be positive")]
    InvalidDuration { minutes: i64 },

    /// Line quantity exceeds `MAX_ITEM_QUANTITY`.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Order has reached the maximum number of lines.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Submitting an order without lines.
    #[error("Order has no items")]
    EmptyOrder,

    /// Line id not present in the draft.
    #[error("Order line not found: {0}")]
    OrderLineNotFound(String),

    /// Menu item is switched off (86'd) and cannot be ordered.
    #[error("Menu item is not available: {0}")]
    MenuItemUnavailable(String),

    /// Variant id is not offered by the menu item.
    #[error("Variant {variant_id} not offered for menu item {menu_item_id}")]
    VariantNotFound {
        menu_item_id: String,
        variant_id: String,
    },

    /// Modifier id is not offered by the menu item.
    #[error("Modifier {modifier_id} not offered for menu item {menu_item_id}")]
    ModifierNotFound {
        menu_item_id: String,
        modifier_id: String,
    },

    /// Discount, tax or tip amount is invalid.
    #[error("Invalid {field}: {reason}")]
    InvalidAdjustment { field: String, reason: String },

    /// Monetary arithmetic left the representable range.
    #[error("Monetary amount overflow while computing {context}")]
    AmountOverflow { context: String },

    /// Instant arithmetic left chrono's representable range.
    #[error("Time out of range: {0}")]
    TimeOutOfRange(String),

    /// Status change not allowed by the lifecycle.
    ///
    /// ## When This Occurs
    /// - Confirming a cancelled reservation
    /// - Marking a voided order as paid
    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidStatusTransition {
        entity: String,
        from: String,
        to: String,
    },

    /// Cash movement recorded against a closed shift.
    #[error("Shift {0} is already closed")]
    ShiftClosed(String),

    /// More than 9999 receipts on one business date.
    #[error("Receipt sequence exhausted for {date}")]
    ReceiptSequenceExhausted { date: String },

    /// Over-payment on a non-cash tender.
    #[error("Change of {change_cents} cents cannot be given: only {cash_cents} cents tendered in cash")]
    ChangeWithoutCash { change_cents: i64, cash_cents: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidStatusTransition error from any two displayable states.
    pub fn transition(
        entity: impl Into<String>,
        from: impl std::fmt::Debug,
        to: impl std::fmt::Debug,
    ) -> Self {
        CoreError::InvalidStatusTransition {
            entity: entity.into(),
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }

    /// Creates an AmountOverflow error.
    pub fn overflow(context: impl Into<String>) -> Self {
        CoreError::AmountOverflow {
            context: context.into(),
        }
    }
}

fn line_label(line: &Option<usize>) -> String {
    match line {
        Some(idx) => format!("Line {}", idx),
        None => "Line".to_string(),
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs, usually from [`crate::validation`].
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

    /// Invalid format (e.g., invalid UUID, bad device code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity {
            line: Some(2),
            quantity: 0,
        };
        assert_eq!(
            err.to_string(),
            "Line 2 has invalid quantity 0: must be at least 1"
        );

        let err = CoreError::InvalidQuantity {
            line: None,
            quantity: -1,
        };
        assert_eq!(err.to_string(), "Line has invalid quantity -1: must be at least 1");

        let err = CoreError::InvalidDuration { minutes: -15 };
        assert_eq!(
            err.to_string(),
            "Invalid reservation duration -15 minutes: must be positive"
        );
    }

    #[test]
    fn test_transition_helper_formats_states() {
        #[derive(Debug)]
        enum Light {
            Red,
            Green,
        }

        let err = CoreError::transition("light", Light::Red, Light::Green);
        assert_eq!(err.to_string(), "Cannot move light from Red to Green");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
