//! # Orders
//!
//! An order starts as an [`OrderDraft`] (the cart the server edits at the
//! table) and becomes an immutable [`SubmittedOrder`] once sent.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderDraft                                                             │
//! │    add_line / update_quantity / remove_line / clear                     │
//! │        │                                                                │
//! │        ▼ submit(adjustments, receipt_number)                            │
//! │  SubmittedOrder (lines and money frozen)                                │
//! │    Submitted ──► InKitchen ──► Ready ──► Served ──► Paid                │
//! │        │             │           │         │                           │
//! │        └─────────────┴───────────┴─────────┴──► Voided                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft holds no derived state: totals are recomputed from the lines
//! with [`compute_order_totals`] whenever they are asked for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pricing::{
    check_line_quantity, compute_order_totals, CartLineItem, OrderAdjustments, OrderSummary,
    OrderTotals,
};
use crate::MAX_ORDER_LINES;

// =============================================================================
// Order Line
// =============================================================================

/// A cart line with a stable id so the UI can address it after reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub line_id: String,
    pub item: CartLineItem,
}

// =============================================================================
// Order Draft
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub id: String,
    /// Dine-in table, `None` for takeaway.
    pub table_id: Option<String>,
    /// Insertion order is display order.
    pub lines: Vec<OrderLine>,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Creates an empty draft with a fresh UUID.
    pub fn new(table_id: Option<String>, opened_at: DateTime<Utc>) -> Self {
        OrderDraft {
            id: Uuid::new_v4().to_string(),
            table_id,
            lines: Vec::new(),
            opened_at,
        }
    }

    /// Appends a line and returns its id.
    ///
    /// Identical items are kept as separate lines: two steaks with different
    /// kitchen notes must reach the pass separately.
    pub fn add_line(&mut self, item: CartLineItem) -> CoreResult<String> {
        check_line_quantity(Some(self.lines.len()), item.quantity)?;

        if self.lines.len() >= MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            });
        }

        let line_id = Uuid::new_v4().to_string();
        self.lines.push(OrderLine {
            line_id: line_id.clone(),
            item,
        });
        Ok(line_id)
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(line_id).map(|_| ());
        }

        let idx = self
            .lines
            .iter()
            .position(|l| l.line_id == line_id)
            .ok_or_else(|| CoreError::OrderLineNotFound(line_id.to_string()))?;
        check_line_quantity(Some(idx), quantity)?;

        self.lines[idx].item.quantity = quantity;
        Ok(())
    }

    /// Removes a line, returning it.
    pub fn remove_line(&mut self, line_id: &str) -> CoreResult<OrderLine> {
        let pos = self
            .lines
            .iter()
            .position(|l| l.line_id == line_id)
            .ok_or_else(|| CoreError::OrderLineNotFound(line_id.to_string()))?;
        Ok(self.lines.remove(pos))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.item.quantity).sum()
    }

    pub fn items(&self) -> Vec<CartLineItem> {
        self.lines.iter().map(|l| l.item.clone()).collect()
    }

    pub fn totals(&self) -> CoreResult<OrderTotals> {
        compute_order_totals(&self.items())
    }

    /// Freezes the draft into a submitted order.
    ///
    /// ## Errors
    /// - `EmptyOrder` when there are no lines
    /// - any pricing or adjustment error from the totals
    pub fn submit(
        &self,
        adjustments: OrderAdjustments,
        receipt_number: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> CoreResult<SubmittedOrder> {
        if self.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let totals = self.totals()?;
        let summary = totals.summarize(&adjustments)?;

        Ok(SubmittedOrder {
            id: self.id.clone(),
            receipt_number: receipt_number.into(),
            table_id: self.table_id.clone(),
            lines: self.lines.clone(),
            totals,
            summary,
            status: OrderStatus::Submitted,
            opened_at: self.opened_at,
            submitted_at,
            status_changed_at: submitted_at,
        })
    }
}

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Submitted,
    /// Shown on the kitchen display.
    InKitchen,
    Ready,
    Served,
    Paid,
    Voided,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Voided)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        match (self, next) {
            (Submitted, InKitchen) | (InKitchen, Ready) | (Ready, Served) | (Served, Paid) => true,
            (from, Voided) => !from.is_terminal(),
            _ => false,
        }
    }
}

// =============================================================================
// Submitted Order
// =============================================================================

/// A finalized order. Lines and money never change; only `status` moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedOrder {
    pub id: String,
    pub receipt_number: String,
    pub table_id: Option<String>,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub summary: OrderSummary,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub submitted_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub status_changed_at: DateTime<Utc>,
}

impl SubmittedOrder {
    pub fn transition(&mut self, next: OrderStatus, at: DateTime<Utc>) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::transition(
                format!("order {}", self.receipt_number),
                self.status,
                next,
            ));
        }
        self.status = next;
        self.status_changed_at = at;
        Ok(())
    }
}
