//! # Order Pricing
//!
//! Turns a list of cart lines into per-line totals and an order subtotal.
//!
//! ## Price Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLineItem                                                           │
//! │    unit_price      = variant.price  OR  base_price                      │
//! │    modifiers_total = Σ modifier.price                                   │
//! │    line_total      = (unit_price + modifiers_total) × quantity          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  compute_order_totals ──► OrderTotals { subtotal = Σ line_total }       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  summarize(discount, tax, tip) ──► total = subtotal − discount          │
//! │                                            + tax + tip                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its inputs: the same lines always
//! produce the same totals, which is what makes resubmitting an order safe.
//!
//! ## Example
//! ```rust
//! use mesa_core::menu::Modifier;
//! use mesa_core::money::Money;
//! use mesa_core::pricing::{compute_order_totals, CartLineItem};
//!
//! let line = CartLineItem::new(
//!     "steak",
//!     "Steak Frites",
//!     "28.00".parse().unwrap(),
//!     None,
//!     vec![
//!         Modifier::new("pepper", "Pepper sauce", "2.00".parse().unwrap()).unwrap(),
//!         Modifier::new("egg", "Fried egg", "1.50".parse().unwrap()).unwrap(),
//!     ],
//!     2,
//! )
//! .unwrap();
//!
//! let totals = compute_order_totals(&[line]).unwrap();
//! assert_eq!(totals.subtotal, Money::from_cents(6300));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::menu::{MenuItem, Modifier, Variant};
use crate::money::{Money, TaxRate};
use crate::validation::{validate_non_negative, validate_price};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Cart Line Item
// =============================================================================

/// Checks a line quantity against `1..=MAX_ITEM_QUANTITY`.
///
/// `line` is the index within the order, `None` for a line not yet placed.
///
/// ## Errors
/// - `InvalidQuantity` below 1
/// - `QuantityTooLarge` above `MAX_ITEM_QUANTITY`
pub fn check_line_quantity(line: Option<usize>, quantity: i64) -> CoreResult<()> {
    if quantity < 1 {
        return Err(CoreError::InvalidQuantity { line, quantity });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// One menu item, with optional variant and modifiers, at a quantity.
///
/// Prices are frozen copies taken when the line was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub menu_item_id: String,
    pub name: String,
    pub base_price: Money,
    pub variant: Option<Variant>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub quantity: i64,
    /// Free-text kitchen note ("no onions").
    #[serde(default)]
    pub note: Option<String>,
}

impl CartLineItem {
    /// Builds a line from already-resolved price data.
    pub fn new(
        menu_item_id: impl Into<String>,
        name: impl Into<String>,
        base_price: Money,
        variant: Option<Variant>,
        modifiers: Vec<Modifier>,
        quantity: i64,
    ) -> CoreResult<Self> {
        check_line_quantity(None, quantity)?;
        validate_price("base price", base_price)?;

        Ok(CartLineItem {
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            base_price,
            variant,
            modifiers,
            quantity,
            note: None,
        })
    }

    /// Builds a line by resolving variant and modifier ids against a menu item.
    ///
    /// ## Errors
    /// - `MenuItemUnavailable` if the item is sold out
    /// - `VariantNotFound` / `ModifierNotFound` for ids the item does not offer
    /// - `InvalidQuantity` / `QuantityTooLarge` for a quantity outside 1..=999
    pub fn from_menu(
        item: &MenuItem,
        variant_id: Option<&str>,
        modifier_ids: &[&str],
        quantity: i64,
    ) -> CoreResult<Self> {
        if !item.is_available {
            return Err(CoreError::MenuItemUnavailable(item.id.clone()));
        }

        let variant = match variant_id {
            Some(vid) => Some(item.variant(vid).cloned().ok_or_else(|| {
                CoreError::VariantNotFound {
                    menu_item_id: item.id.clone(),
                    variant_id: vid.to_string(),
                }
            })?),
            None => None,
        };

        let modifiers = modifier_ids
            .iter()
            .map(|mid| {
                item.modifier(mid)
                    .cloned()
                    .ok_or_else(|| CoreError::ModifierNotFound {
                        menu_item_id: item.id.clone(),
                        modifier_id: mid.to_string(),
                    })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        CartLineItem::new(
            item.id.clone(),
            item.name.clone(),
            item.price,
            variant,
            modifiers,
            quantity,
        )
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Variant price if a variant is selected, otherwise the base price.
    pub fn unit_price(&self) -> Money {
        self.variant
            .as_ref()
            .map(|v| v.price)
            .unwrap_or(self.base_price)
    }

    /// Sum of the selected modifiers' prices.
    pub fn modifiers_total(&self) -> CoreResult<Money> {
        Money::checked_sum(self.modifiers.iter().map(|m| m.price))
            .ok_or_else(|| CoreError::overflow("modifier total"))
    }

    /// Price of a single unit including modifiers.
    pub fn effective_unit_price(&self) -> CoreResult<Money> {
        self.unit_price()
            .checked_add(self.modifiers_total()?)
            .ok_or_else(|| CoreError::overflow("unit price"))
    }

    /// Effective unit price × quantity.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.effective_unit_price()?
            .checked_mul_quantity(self.quantity)
            .ok_or_else(|| CoreError::overflow("line total"))
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Pricing breakdown of one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineTotal {
    /// Position of the line in the input (display order).
    pub line: u32,
    pub unit_price: Money,
    pub modifiers_total: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// Result of [`compute_order_totals`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub lines: Vec<LineTotal>,
}

/// Computes per-line totals and the order subtotal.
///
/// ## Rules
/// - Every line must have quantity ≥ 1, otherwise `InvalidQuantity` naming the
///   offending line index. No partial result is returned.
/// - An empty list yields a zero subtotal.
/// - Integer arithmetic throughout; nothing is rounded.
pub fn compute_order_totals(lines: &[CartLineItem]) -> CoreResult<OrderTotals> {
    let mut subtotal = Money::zero();
    let mut per_line = Vec::with_capacity(lines.len());

    for (idx, item) in lines.iter().enumerate() {
        if item.quantity < 1 {
            return Err(CoreError::InvalidQuantity {
                line: Some(idx),
                quantity: item.quantity,
            });
        }

        let line_total = item.line_total()?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or_else(|| CoreError::overflow("order subtotal"))?;

        per_line.push(LineTotal {
            line: idx as u32,
            unit_price: item.unit_price(),
            modifiers_total: item.modifiers_total()?,
            quantity: item.quantity,
            line_total,
        });
    }

    Ok(OrderTotals {
        subtotal,
        lines: per_line,
    })
}

// =============================================================================
// Adjustments & Summary
// =============================================================================

/// Discount, tax and tip supplied by the caller's business configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderAdjustments {
    pub discount: Money,
    pub tax: Money,
    pub tip: Money,
}

impl OrderAdjustments {
    pub fn new(discount: Money, tax: Money, tip: Money) -> Self {
        OrderAdjustments { discount, tax, tip }
    }

    /// Derives tax from a rate applied to the discounted subtotal.
    ///
    /// ```rust
    /// use mesa_core::money::{Money, TaxRate};
    /// use mesa_core::pricing::OrderAdjustments;
    ///
    /// let adj = OrderAdjustments::with_tax_rate(
    ///     Money::from_cents(10000),
    ///     Money::from_cents(1000),
    ///     TaxRate::from_bps(1000),
    ///     Money::zero(),
    /// );
    /// assert_eq!(adj.tax.cents(), 900);
    /// ```
    pub fn with_tax_rate(subtotal: Money, discount: Money, rate: TaxRate, tip: Money) -> Self {
        let taxable = subtotal
            .checked_sub(discount)
            .filter(|t| !t.is_negative())
            .unwrap_or(Money::zero());

        OrderAdjustments {
            discount,
            tax: taxable.calculate_tax(rate),
            tip,
        }
    }
}

/// Final figures for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Applies caller-supplied adjustments: `total = subtotal − discount + tax + tip`.
    ///
    /// ## Errors
    /// - `InvalidAdjustment` for a negative amount or a discount above the subtotal
    pub fn summarize(&self, adjustments: &OrderAdjustments) -> CoreResult<OrderSummary> {
        for (field, amount) in [
            ("discount", adjustments.discount),
            ("tax", adjustments.tax),
            ("tip", adjustments.tip),
        ] {
            validate_non_negative(field, amount).map_err(|_| CoreError::InvalidAdjustment {
                field: field.to_string(),
                reason: format!("{} is negative", amount),
            })?;
        }

        if adjustments.discount > self.subtotal {
            return Err(CoreError::InvalidAdjustment {
                field: "discount".to_string(),
                reason: format!(
                    "{} exceeds subtotal {}",
                    adjustments.discount, self.subtotal
                ),
            });
        }

        let total = (self.subtotal - adjustments.discount)
            .checked_add(adjustments.tax)
            .and_then(|t| t.checked_add(adjustments.tip))
            .ok_or_else(|| CoreError::overflow("order total"))?;

        Ok(OrderSummary {
            subtotal: self.subtotal,
            discount: adjustments.discount,
            tax: adjustments.tax,
            tip: adjustments.tip,
            total,
        })
    }
}
