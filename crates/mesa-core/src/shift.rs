//! # Cash Register Shifts
//!
//! Tracks the cash drawer between opening and closing a shift and
//! reconciles the counted cash against what the drawer should hold.
//!
//! ```text
//! expected = opening float
//!          + cash sales      (net of change given)
//!          − cash refunds
//!          + paid in         (float top-ups)
//!          − paid out        (petty cash, supplier on delivery)
//!
//! discrepancy = counted − expected      > 0 over, < 0 short
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_name, validate_non_negative, validate_payment_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    #[default]
    Open,
    Closed,
}

/// A single movement of cash into or out of the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum CashMovement {
    Sale(Money),
    Refund(Money),
    PaidIn(Money),
    PaidOut(Money),
}

impl CashMovement {
    pub fn amount(&self) -> Money {
        match *self {
            CashMovement::Sale(m)
            | CashMovement::Refund(m)
            | CashMovement::PaidIn(m)
            | CashMovement::PaidOut(m) => m,
        }
    }
}

/// Result of comparing counted cash with expected cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationOutcome {
    /// Within tolerance.
    Balanced,
    Over,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReconciliation {
    pub expected: Money,
    pub counted: Money,
    /// `counted − expected`.
    pub discrepancy: Money,
    pub outcome: ReconciliationOutcome,
}

/// Compares a cash count with the expected drawer amount.
///
/// A discrepancy whose absolute value is at most `tolerance` is `Balanced`.
///
/// ```rust
/// use mesa_core::money::Money;
/// use mesa_core::shift::{reconcile, ReconciliationOutcome};
///
/// let r = reconcile(Money::from_cents(50_000), Money::from_cents(49_950), Money::zero()).unwrap();
/// assert_eq!(r.discrepancy.cents(), -50);
/// assert_eq!(r.outcome, ReconciliationOutcome::Short);
/// ```
pub fn reconcile(expected: Money, counted: Money, tolerance: Money) -> CoreResult<ShiftReconciliation> {
    let discrepancy = counted
        .checked_sub(expected)
        .ok_or_else(|| CoreError::overflow("cash discrepancy"))?;

    let outcome = if discrepancy.abs() <= tolerance.abs() {
        ReconciliationOutcome::Balanced
    } else if discrepancy.is_positive() {
        ReconciliationOutcome::Over
    } else {
        ReconciliationOutcome::Short
    };

    Ok(ShiftReconciliation {
        expected,
        counted,
        discrepancy,
        outcome,
    })
}

/// One operator's session on a cash drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashShift {
    pub id: String,
    pub operator: String,
    pub status: ShiftStatus,
    pub opening_float: Money,
    pub cash_sales: Money,
    pub cash_refunds: Money,
    pub paid_in: Money,
    pub paid_out: Money,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    pub reconciliation: Option<ShiftReconciliation>,
}

impl CashShift {
    pub fn open(operator: impl Into<String>, opening_float: Money, at: DateTime<Utc>) -> CoreResult<Self> {
        let operator = operator.into();
        validate_name("operator", &operator)?;
        validate_non_negative("opening float", opening_float)?;

        Ok(CashShift {
            id: Uuid::new_v4().to_string(),
            operator,
            status: ShiftStatus::Open,
            opening_float,
            cash_sales: Money::zero(),
            cash_refunds: Money::zero(),
            paid_in: Money::zero(),
            paid_out: Money::zero(),
            opened_at: at,
            closed_at: None,
            reconciliation: None,
        })
    }

    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::ShiftClosed(self.id.clone()));
        }
        Ok(())
    }

    /// Records a positive cash movement on an open shift.
    pub fn record(&mut self, movement: CashMovement) -> CoreResult<()> {
        self.ensure_open()?;
        let amount = movement.amount();
        validate_payment_amount(amount)?;

        let bucket = match movement {
            CashMovement::Sale(_) => &mut self.cash_sales,
            CashMovement::Refund(_) => &mut self.cash_refunds,
            CashMovement::PaidIn(_) => &mut self.paid_in,
            CashMovement::PaidOut(_) => &mut self.paid_out,
        };
        *bucket = bucket
            .checked_add(amount)
            .ok_or_else(|| CoreError::overflow("cash movement"))?;
        Ok(())
    }

    /// Cash the drawer should hold right now.
    pub fn expected_cash(&self) -> CoreResult<Money> {
        self.opening_float
            .checked_add(self.cash_sales)
            .and_then(|m| m.checked_sub(self.cash_refunds))
            .and_then(|m| m.checked_add(self.paid_in))
            .and_then(|m| m.checked_sub(self.paid_out))
            .ok_or_else(|| CoreError::overflow("expected cash"))
    }

    /// Closes the shift with the counted cash and stores the reconciliation.
    pub fn close(
        &mut self,
        counted: Money,
        tolerance: Money,
        at: DateTime<Utc>,
    ) -> CoreResult<ShiftReconciliation> {
        self.ensure_open()?;
        validate_non_negative("counted cash", counted)?;

        let result = reconcile(self.expected_cash()?, counted, tolerance)?;
        self.status = ShiftStatus::Closed;
        self.closed_at = Some(at);
        self.reconciliation = Some(result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    fn busy_shift() -> CashShift {
        let mut shift = CashShift::open("Dana", m(20_000), Utc::now()).unwrap();
        shift.record(CashMovement::Sale(m(6_300))).unwrap();
        shift.record(CashMovement::Sale(m(1_250))).unwrap();
        shift.record(CashMovement::Refund(m(800))).unwrap();
        shift.record(CashMovement::PaidIn(m(5_000))).unwrap();
        shift.record(CashMovement::PaidOut(m(2_400))).unwrap();
        shift
    }

    #[test]
    fn test_expected_cash() {
        // 200.00 + 63.00 + 12.50 − 8.00 + 50.00 − 24.00
        assert_eq!(busy_shift().expected_cash().unwrap(), m(29_350));
    }

    #[test]
    fn test_close_balanced() {
        let mut shift = busy_shift();
        let r = shift.close(m(29_350), Money::zero(), Utc::now()).unwrap();

        assert_eq!(r.discrepancy, Money::zero());
        assert_eq!(r.outcome, ReconciliationOutcome::Balanced);
        assert_eq!(shift.status, ShiftStatus::Closed);
        assert!(shift.closed_at.is_some());
        assert_eq!(shift.reconciliation, Some(r));
    }

    #[test]
    fn test_close_over_and_short() {
        let mut over = busy_shift();
        let r = over.close(m(29_500), Money::zero(), Utc::now()).unwrap();
        assert_eq!(r.discrepancy, m(150));
        assert_eq!(r.outcome, ReconciliationOutcome::Over);

        let mut short = busy_shift();
        let r = short.close(m(29_000), Money::zero(), Utc::now()).unwrap();
        assert_eq!(r.discrepancy, m(-350));
        assert_eq!(r.outcome, ReconciliationOutcome::Short);
    }

    #[test]
    fn test_tolerance() {
        let r = reconcile(m(10_000), m(9_995), m(5)).unwrap();
        assert_eq!(r.outcome, ReconciliationOutcome::Balanced);
        assert_eq!(r.discrepancy, m(-5));

        let r = reconcile(m(10_000), m(9_994), m(5)).unwrap();
        assert_eq!(r.outcome, ReconciliationOutcome::Short);
    }

    #[test]
    fn test_closed_shift_rejects_changes() {
        let mut shift = busy_shift();
        shift.close(m(29_350), Money::zero(), Utc::now()).unwrap();

        assert!(matches!(
            shift.record(CashMovement::Sale(m(100))),
            Err(CoreError::ShiftClosed(_))
        ));
        assert!(matches!(
            shift.close(m(0), Money::zero(), Utc::now()),
            Err(CoreError::ShiftClosed(_))
        ));
    }

    #[test]
    fn test_invalid_amounts() {
        let mut shift = CashShift::open("Dana", m(0), Utc::now()).unwrap();
        assert!(shift.record(CashMovement::Sale(m(0))).is_err());
        assert!(shift.record(CashMovement::PaidOut(m(-100))).is_err());
        assert!(shift.close(m(-1), Money::zero(), Utc::now()).is_err());
        assert!(shift.is_open());

        assert!(CashShift::open("", m(0), Utc::now()).is_err());
        assert!(CashShift::open("Dana", m(-1), Utc::now()).is_err());
    }

    #[test]
    fn test_movement_wire_format() {
        let json = serde_json::to_value(CashMovement::PaidOut(m(2_400))).unwrap();
        assert_eq!(json["kind"], "paid_out");
        assert_eq!(json["amount"], 2400);
    }
}
