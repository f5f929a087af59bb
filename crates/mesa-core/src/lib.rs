//! # mesa-core: Pure Business Logic for Mesa POS
//!
//! Pricing, reservations and cash handling for a restaurant point of sale,
//! as deterministic functions over plain values.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Mesa POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 mesa-service (stateful shell)                   │   │
//! │  │     OrderDesk  •  ReservationBook  •  CashRegister  •  config   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain function calls                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ mesa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌─────────────┐ ┌──────────────┐   │   │
//! │  │   │  menu    │ │ pricing  │ │ reservation │ │ shift/tender │   │   │
//! │  │   │ MenuItem │ │ totals   │ │ is_available│ │ reconcile    │   │   │
//! │  │   │ Variant  │ │ summary  │ │ intervals   │ │ settle       │   │   │
//! │  │   └──────────┘ └──────────┘ └─────────────┘ └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS IN CALCULATIONS • INTEGER MONEY       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer cents, tax rates in basis points
//! - [`menu`] - Menu items, variants and modifiers
//! - [`pricing`] - Line totals, order subtotal and the discount/tax/tip summary
//! - [`order`] - Open order drafts and submitted orders
//! - [`reservation`] - Reservations and table availability
//! - [`shift`] - Cash drawer shifts and reconciliation
//! - [`tender`] - Applying payments and computing change
//! - [`receipt`] - Daily receipt numbering
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mesa_core::money::Money;
//! use mesa_core::pricing::{compute_order_totals, CartLineItem};
//!
//! let lines = vec![
//!     CartLineItem::new("burger", "Burger", Money::from_cents(1_250), None, vec![], 2).unwrap(),
//!     CartLineItem::new("soda", "Soda", Money::from_cents(300), None, vec![], 1).unwrap(),
//! ];
//!
//! let totals = compute_order_totals(&lines).unwrap();
//! assert_eq!(totals.subtotal.cents(), 2_800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod menu;
pub mod money;
pub mod order;
pub mod pricing;
pub mod receipt;
pub mod reservation;
pub mod shift;
pub mod tender;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use menu::{MenuCatalog, MenuItem, Modifier, Variant};
pub use money::{Money, TaxRate};
pub use order::{OrderDraft, OrderLine, OrderStatus, SubmittedOrder};
pub use pricing::{
    check_line_quantity, compute_order_totals, CartLineItem, LineTotal, OrderAdjustments,
    OrderSummary, OrderTotals,
};
pub use receipt::ReceiptSequence;
pub use reservation::{is_available, Availability, Reservation, ReservationInterval, ReservationStatus};
pub use shift::{CashMovement, CashShift, ReconciliationOutcome, ShiftReconciliation, ShiftStatus};
pub use tender::{settle, PaymentMethod, Settlement, Tender};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines on a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// Catches typing 100 instead of 10 on the order screen.
pub const MAX_ITEM_QUANTITY: i64 = 999;
