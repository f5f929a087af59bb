//! # Order Desk
//!
//! Shared menu and order state for the front of house.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderDesk                                                              │
//! │                                                                         │
//! │   menu:  RwLock<MenuCatalog>     many readers (every add_line)          │
//! │   state: Mutex<DeskState>        drafts, submitted orders, receipt seq  │
//! │                                                                         │
//! │   add_line:  read menu ──► snapshot item ──► release ──► lock state     │
//! │   submit:    lock state ──► price ──► issue receipt ──► move draft      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two locks are never held together.

use std::collections::HashMap;

use chrono::Utc;
use mesa_core::money::{Money, TaxRate};
use mesa_core::validation::validate_table_id;
use mesa_core::{
    CartLineItem, MenuCatalog, MenuItem, OrderAdjustments, OrderDraft, OrderStatus, OrderSummary,
    OrderTotals, ReceiptSequence, SubmittedOrder,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::config::MesaConfig;
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug)]
struct DeskState {
    drafts: HashMap<String, OrderDraft>,
    submitted: HashMap<String, SubmittedOrder>,
    receipts: ReceiptSequence,
}

impl DeskState {
    fn draft_mut(&mut self, order_id: &str) -> ServiceResult<&mut OrderDraft> {
        self.drafts
            .get_mut(order_id)
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }
}

#[derive(Debug)]
pub struct OrderDesk {
    tax_rate: TaxRate,
    menu: RwLock<MenuCatalog>,
    state: Mutex<DeskState>,
}

impl OrderDesk {
    pub fn new(config: &MesaConfig) -> ServiceResult<Self> {
        Ok(OrderDesk {
            tax_rate: config.tax_rate(),
            menu: RwLock::new(MenuCatalog::new()),
            state: Mutex::new(DeskState {
                drafts: HashMap::new(),
                submitted: HashMap::new(),
                receipts: ReceiptSequence::new(config.device.code.clone())?,
            }),
        })
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Adds or replaces a menu item. Open drafts keep the prices they captured.
    pub async fn upsert_menu_item(&self, item: MenuItem) -> Option<MenuItem> {
        debug!(menu_item_id = %item.id, price = %item.price, "Upserting menu item");
        self.menu.write().await.upsert(item)
    }

    /// Marks an item sold out or back on.
    pub async fn set_available(&self, menu_item_id: &str, available: bool) -> ServiceResult<()> {
        if !self.menu.write().await.set_available(menu_item_id, available) {
            return Err(ServiceError::not_found("Menu item", menu_item_id));
        }
        info!(menu_item_id, available, "Menu item availability changed");
        Ok(())
    }

    pub async fn menu_item(&self, menu_item_id: &str) -> ServiceResult<MenuItem> {
        self.menu
            .read()
            .await
            .get(menu_item_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Menu item", menu_item_id))
    }

    pub async fn menu(&self) -> MenuCatalog {
        self.menu.read().await.clone()
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    /// Opens an empty order, for a table or takeaway (`None`).
    pub async fn open_order(&self, table_id: Option<String>) -> ServiceResult<OrderDraft> {
        if let Some(table) = table_id.as_deref() {
            validate_table_id(table)?;
        }

        let draft = OrderDraft::new(table_id, Utc::now());
        info!(order_id = %draft.id, table_id = ?draft.table_id, "Order opened");

        self.state
            .lock()
            .await
            .drafts
            .insert(draft.id.clone(), draft.clone());
        Ok(draft)
    }

    /// Prices a menu item with the chosen variant and modifiers and appends it.
    ///
    /// Returns the new line id.
    pub async fn add_line(
        &self,
        order_id: &str,
        menu_item_id: &str,
        variant_id: Option<&str>,
        modifier_ids: &[&str],
        quantity: i64,
    ) -> ServiceResult<String> {
        let item = self.menu_item(menu_item_id).await?;
        let line = CartLineItem::from_menu(&item, variant_id, modifier_ids, quantity)?;

        let mut state = self.state.lock().await;
        let line_id = state.draft_mut(order_id)?.add_line(line)?;

        debug!(order_id, menu_item_id, quantity, line_id = %line_id, "Line added");
        Ok(line_id)
    }

    /// Sets a line's quantity; zero removes it.
    pub async fn update_quantity(&self, order_id: &str, line_id: &str, quantity: i64) -> ServiceResult<()> {
        let mut state = self.state.lock().await;
        state.draft_mut(order_id)?.update_quantity(line_id, quantity)?;
        debug!(order_id, line_id, quantity, "Line quantity updated");
        Ok(())
    }

    pub async fn remove_line(&self, order_id: &str, line_id: &str) -> ServiceResult<()> {
        let mut state = self.state.lock().await;
        state.draft_mut(order_id)?.remove_line(line_id)?;
        debug!(order_id, line_id, "Line removed");
        Ok(())
    }

    pub async fn draft(&self, order_id: &str) -> ServiceResult<OrderDraft> {
        self.state
            .lock()
            .await
            .drafts
            .get(order_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    /// Drafts that have not been submitted yet.
    pub async fn open_orders(&self) -> Vec<OrderDraft> {
        let state = self.state.lock().await;
        let mut drafts: Vec<_> = state.drafts.values().cloned().collect();
        drafts.sort_by_key(|d| d.opened_at);
        drafts
    }

    /// Recomputes line totals and the subtotal for an open draft.
    pub async fn totals(&self, order_id: &str) -> ServiceResult<OrderTotals> {
        let mut state = self.state.lock().await;
        Ok(state.draft_mut(order_id)?.totals()?)
    }

    /// Full summary the draft would submit with, without submitting it.
    pub async fn preview(&self, order_id: &str, discount: Money, tip: Money) -> ServiceResult<OrderSummary> {
        let totals = self.totals(order_id).await?;
        let adjustments = self.adjustments(&totals, discount, tip);
        Ok(totals.summarize(&adjustments)?)
    }

    fn adjustments(&self, totals: &OrderTotals, discount: Money, tip: Money) -> OrderAdjustments {
        OrderAdjustments::with_tax_rate(totals.subtotal, discount, self.tax_rate, tip)
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submits a draft with the configured tax rate and the next receipt number.
    ///
    /// Submitting an order id that was already submitted returns the stored
    /// order unchanged, so a client may safely retry.
    pub async fn submit(&self, order_id: &str, discount: Money, tip: Money) -> ServiceResult<SubmittedOrder> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.submitted.get(order_id) {
            debug!(order_id, receipt_number = %existing.receipt_number, "Order already submitted");
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let draft = state
            .drafts
            .get(order_id)
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;
        let adjustments = self.adjustments(&draft.totals()?, discount, tip);

        // Only consume a receipt number if the submission succeeds.
        let mut receipts = state.receipts.clone();
        let receipt_number = receipts.next(now.date_naive())?;
        let order = draft.submit(adjustments, receipt_number, now)?;

        state.receipts = receipts;
        state.drafts.remove(order_id);
        state.submitted.insert(order.id.clone(), order.clone());

        info!(
            order_id,
            receipt_number = %order.receipt_number,
            total = %order.summary.total,
            "Order submitted"
        );
        Ok(order)
    }

    pub async fn order(&self, order_id: &str) -> ServiceResult<SubmittedOrder> {
        self.state
            .lock()
            .await
            .submitted
            .get(order_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    /// Moves a submitted order along its lifecycle.
    pub async fn advance_status(&self, order_id: &str, next: OrderStatus) -> ServiceResult<SubmittedOrder> {
        let mut state = self.state.lock().await;
        let order = state
            .submitted
            .get_mut(order_id)
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;

        let from = order.status;
        order.transition(next, Utc::now())?;

        info!(order_id, ?from, to = ?next, "Order status changed");
        Ok(order.clone())
    }
}
