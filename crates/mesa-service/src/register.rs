//! # Cash Register
//!
//! Holds the drawer's current shift and feeds it cash from settlements.
//!
//! ```text
//! open_shift ──► record / record_settlement ... ──► close_shift(counted)
//!      ▲                                                   │
//!      └────────────── next operator ◄─────────────────────┘
//! ```
//!
//! One shift is open at a time. Closed shifts are kept for the day's report.

use chrono::Utc;
use mesa_core::money::Money;
use mesa_core::{settle, CashMovement, CashShift, ReconciliationOutcome, Settlement, ShiftReconciliation, Tender};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Default)]
struct Drawer {
    current: Option<CashShift>,
    closed: Vec<CashShift>,
}

impl Drawer {
    fn open_shift_mut(&mut self) -> ServiceResult<&mut CashShift> {
        self.current.as_mut().ok_or(ServiceError::NoOpenShift)
    }
}

#[derive(Debug)]
pub struct CashRegister {
    tolerance: Money,
    drawer: Mutex<Drawer>,
}

impl CashRegister {
    pub fn new(tolerance: Money) -> Self {
        CashRegister {
            tolerance,
            drawer: Mutex::new(Drawer::default()),
        }
    }

    pub async fn open_shift(&self, operator: &str, opening_float: Money) -> ServiceResult<CashShift> {
        let mut drawer = self.drawer.lock().await;
        if let Some(open) = &drawer.current {
            return Err(ServiceError::ShiftAlreadyOpen(open.id.clone()));
        }

        let shift = CashShift::open(operator, opening_float, Utc::now())?;
        info!(shift_id = %shift.id, operator, float = %opening_float, "Shift opened");

        drawer.current = Some(shift.clone());
        Ok(shift)
    }

    /// Records a sale, refund, paid-in or paid-out against the open shift.
    pub async fn record(&self, movement: CashMovement) -> ServiceResult<()> {
        let mut drawer = self.drawer.lock().await;
        drawer.open_shift_mut()?.record(movement)?;
        debug!(?movement, "Cash movement recorded");
        Ok(())
    }

    /// Settles a total against tenders and books the cash that stays in the
    /// drawer as a sale.
    pub async fn record_settlement(&self, total: Money, tenders: &[Tender]) -> ServiceResult<Settlement> {
        let mut drawer = self.drawer.lock().await;
        let shift = drawer.open_shift_mut()?;

        let settlement = settle(total, tenders)?;
        if settlement.cash_collected.is_positive() {
            shift.record(CashMovement::Sale(settlement.cash_collected))?;
        }

        debug!(
            total = %settlement.total,
            paid = %settlement.paid,
            change = %settlement.change,
            remaining = %settlement.remaining,
            "Settlement recorded"
        );
        Ok(settlement)
    }

    pub async fn current(&self) -> Option<CashShift> {
        self.drawer.lock().await.current.clone()
    }

    /// Cash the open drawer should hold.
    pub async fn expected_cash(&self) -> ServiceResult<Money> {
        let mut drawer = self.drawer.lock().await;
        Ok(drawer.open_shift_mut()?.expected_cash()?)
    }

    /// Closes the open shift against the counted cash.
    pub async fn close_shift(&self, counted: Money) -> ServiceResult<ShiftReconciliation> {
        let mut drawer = self.drawer.lock().await;
        let mut shift = drawer.current.take().ok_or(ServiceError::NoOpenShift)?;

        let result = match shift.close(counted, self.tolerance, Utc::now()) {
            Ok(result) => result,
            Err(e) => {
                drawer.current = Some(shift);
                return Err(e.into());
            }
        };

        match result.outcome {
            ReconciliationOutcome::Balanced => {
                info!(shift_id = %shift.id, expected = %result.expected, "Shift closed balanced")
            }
            ReconciliationOutcome::Over | ReconciliationOutcome::Short => warn!(
                shift_id = %shift.id,
                expected = %result.expected,
                counted = %result.counted,
                discrepancy = %result.discrepancy,
                outcome = ?result.outcome,
                "Shift closed with discrepancy"
            ),
        }

        drawer.closed.push(shift);
        Ok(result)
    }

    /// Shifts closed since the register was created, oldest first.
    pub async fn closed_shifts(&self) -> Vec<CashShift> {
        self.drawer.lock().await.closed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_core::CoreError;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[tokio::test]
    async fn test_one_shift_at_a_time() {
        let register = CashRegister::new(Money::zero());
        let shift = register.open_shift("Dana", m(20_000)).await.unwrap();

        let err = register.open_shift("Sam", m(10_000)).await.unwrap_err();
        assert!(matches!(err, ServiceError::ShiftAlreadyOpen(id) if id == shift.id));

        register.close_shift(m(20_000)).await.unwrap();
        assert!(register.open_shift("Sam", m(10_000)).await.is_ok());
        assert_eq!(register.closed_shifts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_requires_open_shift() {
        let register = CashRegister::new(Money::zero());
        assert!(matches!(
            register.record(CashMovement::PaidIn(m(100))).await,
            Err(ServiceError::NoOpenShift)
        ));
        assert!(matches!(
            register.close_shift(m(0)).await,
            Err(ServiceError::NoOpenShift)
        ));
        assert!(register.current().await.is_none());
    }

    #[tokio::test]
    async fn test_settlement_feeds_drawer() {
        let register = CashRegister::new(Money::zero());
        register.open_shift("Dana", m(20_000)).await.unwrap();

        let s = register
            .record_settlement(m(6_300), &[Tender::card(m(4_000), None), Tender::cash(m(3_000))])
            .await
            .unwrap();
        assert_eq!(s.change, m(700));

        register
            .record_settlement(m(1_250), &[Tender::card(m(1_250), None)])
            .await
            .unwrap();

        // Only the 23.00 kept from the split payment reaches the drawer.
        assert_eq!(register.expected_cash().await.unwrap(), m(22_300));
    }

    #[tokio::test]
    async fn test_rejected_settlement_leaves_drawer_alone() {
        let register = CashRegister::new(Money::zero());
        register.open_shift("Dana", m(10_000)).await.unwrap();

        let err = register
            .record_settlement(m(1_000), &[Tender::card(m(1_500), None)])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::ChangeWithoutCash { .. })));
        assert_eq!(register.expected_cash().await.unwrap(), m(10_000));
    }

    #[tokio::test]
    async fn test_close_with_tolerance() {
        let register = CashRegister::new(m(50));
        register.open_shift("Dana", m(10_000)).await.unwrap();
        register.record(CashMovement::PaidOut(m(1_500))).await.unwrap();

        let r = register.close_shift(m(8_460)).await.unwrap();
        assert_eq!(r.expected, m(8_500));
        assert_eq!(r.discrepancy, m(-40));
        assert_eq!(r.outcome, ReconciliationOutcome::Balanced);

        register.open_shift("Sam", m(10_000)).await.unwrap();
        let r = register.close_shift(m(9_900)).await.unwrap();
        assert_eq!(r.outcome, ReconciliationOutcome::Short);
    }

    #[tokio::test]
    async fn test_invalid_count_keeps_shift_open() {
        let register = CashRegister::new(Money::zero());
        register.open_shift("Dana", m(10_000)).await.unwrap();

        assert!(register.close_shift(m(-1)).await.is_err());
        assert!(register.current().await.unwrap().is_open());
    }
}
