//! # Tendering
//!
//! Applies payments against an order total.
//!
//! ```text
//! total 63.00 ── Card 40.00 ──► remaining 23.00
//!             ── Cash 30.00 ──► paid 70.00, change 7.00, cash kept 23.00
//! ```
//!
//! ## Rules
//!
//! - Every tender amount must be positive.
//! - Change is only ever handed back from cash.
//! - `cash_collected` is what stays in the drawer: cash tendered minus change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_non_negative, validate_payment_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub method: PaymentMethod,
    pub amount: Money,
    /// Card terminal reference, if any.
    pub reference: Option<String>,
}

impl Tender {
    pub fn cash(amount: Money) -> Self {
        Tender {
            method: PaymentMethod::Cash,
            amount,
            reference: None,
        }
    }

    pub fn card(amount: Money, reference: Option<String>) -> Self {
        Tender {
            method: PaymentMethod::Card,
            amount,
            reference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub total: Money,
    pub paid: Money,
    pub remaining: Money,
    pub change: Money,
    pub cash_collected: Money,
}

impl Settlement {
    pub fn is_fully_paid(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Settles `total` against a list of tenders.
///
/// ## Errors
///
/// - `Validation` for a negative total or a non-positive tender
/// - `ChangeWithoutCash` when the overpayment exceeds the cash tendered
/// - `AmountOverflow` if the tender sum does not fit
///
/// ```rust
/// use mesa_core::money::Money;
/// use mesa_core::tender::{settle, Tender};
///
/// let s = settle(Money::from_cents(6_300), &[Tender::cash(Money::from_cents(7_000))]).unwrap();
/// assert_eq!(s.change.cents(), 700);
/// assert_eq!(s.cash_collected.cents(), 6_300);
/// ```
pub fn settle(total: Money, tenders: &[Tender]) -> CoreResult<Settlement> {
    validate_non_negative("total", total)?;
    for tender in tenders {
        validate_payment_amount(tender.amount)?;
    }

    let paid = Money::checked_sum(tenders.iter().map(|t| t.amount))
        .ok_or_else(|| CoreError::overflow("tendered amount"))?;
    let cash = Money::checked_sum(
        tenders
            .iter()
            .filter(|t| t.method == PaymentMethod::Cash)
            .map(|t| t.amount),
    )
    .ok_or_else(|| CoreError::overflow("cash tendered"))?;

    // Both operands are non-negative, so these cannot overflow.
    let remaining = if total > paid { total - paid } else { Money::zero() };
    let change = if paid > total { paid - total } else { Money::zero() };

    if change > cash {
        return Err(CoreError::ChangeWithoutCash {
            change_cents: change.cents(),
            cash_cents: cash.cents(),
        });
    }

    Ok(Settlement {
        total,
        paid,
        remaining,
        change,
        cash_collected: cash - change,
    })
}
