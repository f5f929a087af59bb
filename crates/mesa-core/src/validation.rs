//! # Validation Module
//!
//! Input validation for values that arrive from the request layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Frontend form        basic format checks, instant feedback   │
//! │  Layer 2: THIS MODULE          business rule validation                │
//! │  Layer 3: Constructors         CartLineItem::new, Reservation::new     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::validation::{validate_party_size, validate_table_id};
//!
//! assert!(validate_table_id("patio-3").is_ok());
//! assert!(validate_party_size(4, 12).is_ok());
//! assert!(validate_party_size(0, 12).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (menu item, guest, operator).
///
/// Must be non-empty after trimming and at most 200 characters.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a table identifier such as `T12` or `patio-3`.
pub fn validate_table_id(table_id: &str) -> ValidationResult<()> {
    let table_id = table_id.trim();

    if table_id.is_empty() {
        return Err(ValidationError::Required {
            field: "table_id".to_string(),
        });
    }

    if table_id.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "table_id".to_string(),
            max: 32,
        });
    }

    if !table_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "table_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates the two-character device code printed in receipt numbers.
pub fn validate_device_code(code: &str) -> ValidationResult<()> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "device_code".to_string(),
            reason: "must be exactly two letters or digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string.
///
/// ```rust
/// use mesa_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a menu, variant or modifier price. Zero is allowed (free add-ons).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a non-negative monetary input such as a cash count or tip.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    validate_price(field, amount)
}

/// Validates a tender amount; zero and negative payments are rejected.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a reservation party size against the configured maximum.
pub fn validate_party_size(party_size: u32, max: u32) -> ValidationResult<()> {
    if party_size == 0 || party_size > max {
        return Err(ValidationError::OutOfRange {
            field: "party_size".to_string(),
            min: 1,
            max: max as i64,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Margherita").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_table_id() {
        assert!(validate_table_id("T12").is_ok());
        assert!(validate_table_id("patio_3").is_ok());
        assert!(validate_table_id("").is_err());
        assert!(validate_table_id("table 4").is_err());
        assert!(validate_table_id(&"T".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_device_code() {
        assert!(validate_device_code("01").is_ok());
        assert!(validate_device_code("A7").is_ok());
        assert!(validate_device_code("1").is_err());
        assert!(validate_device_code("001").is_err());
        assert!(validate_device_code("0-").is_err());
    }

    #[test]
    fn test_validate_money_inputs() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_cents(-1)).is_err());
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(1, 12).is_ok());
        assert!(validate_party_size(12, 12).is_ok());
        assert!(validate_party_size(0, 12).is_err());
        assert!(validate_party_size(13, 12).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
