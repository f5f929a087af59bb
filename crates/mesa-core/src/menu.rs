//! # Menu Types
//!
//! Catalog entries that cart lines are priced from.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ MenuItem "Flat White"  4.00  │
//! │  variants (replace price)    │──► Small 3.50 / Large 4.80
//! │  modifiers (add to price)    │──► Oat milk +0.60 / Extra shot +0.90
//! └──────────────────────────────┘
//! ```
//!
//! A cart line snapshots whatever it needs from these records when it is
//! added (see [`crate::pricing::CartLineItem::from_menu`]), so later menu
//! edits never change an order already in progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{validate_name, validate_price};

/// An alternate priced version of a menu item (e.g. size). Replaces the base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// An optional add-on with its own additive price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub id: String,
    pub name: String,
    pub price: Money,
}

impl Variant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> CoreResult<Self> {
        let name = name.into();
        validate_name("variant name", &name)?;
        validate_price("variant price", price)?;
        Ok(Variant {
            id: id.into(),
            name,
            price,
        })
    }
}

impl Modifier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> CoreResult<Self> {
        let name = name.into();
        validate_name("modifier name", &name)?;
        validate_price("modifier price", price)?;
        Ok(Modifier {
            id: id.into(),
            name,
            price,
        })
    }
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,

    pub name: String,

    /// Menu section, e.g. "Mains" or "Drinks".
    pub category: String,

    /// Base price, used when no variant is selected.
    pub price: Money,

    #[serde(default)]
    pub variants: Vec<Variant>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// False when the kitchen has run out ("86'd").
    pub is_available: bool,
}

impl MenuItem {
    /// Creates an available menu item without variants or modifiers.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_name("name", &name)?;
        validate_price("price", price)?;
        Ok(MenuItem {
            id: id.into(),
            name,
            category: category.into(),
            price,
            variants: Vec::new(),
            modifiers: Vec::new(),
            is_available: true,
        })
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    pub fn modifier(&self, modifier_id: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.id == modifier_id)
    }
}

/// The menu, keyed by item id. Iteration order is by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuCatalog {
    items: BTreeMap<String, MenuItem>,
}

impl MenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an item, returning the previous version if any.
    pub fn upsert(&mut self, item: MenuItem) -> Option<MenuItem> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// Marks an item available or sold out. Returns false if the id is unknown.
    pub fn set_available(&mut self, id: &str, available: bool) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.is_available = available;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<MenuItem> {
        self.items.remove(id)
    }

    /// Items of one category, in id order.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items.values().filter(move |i| i.category == category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
