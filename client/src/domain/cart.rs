//! Shopping cart line items and the in-memory cart snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// One line of the shopping cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub product: Product,
}

/// Cached cart contents. The count is always the number of lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartSnapshot {
    items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Wrap fetched line items, preserving order.
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Line items in backend order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of lines (not the summed quantity).
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shared handle to the current [`CartSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct CartState {
    inner: Arc<RwLock<CartSnapshot>>,
}

impl CartState {
    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the snapshot wholesale.
    pub fn replace(&self, snapshot: CartSnapshot) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Drop every line.
    pub fn clear(&self) {
        self.replace(CartSnapshot::default());
    }
}
