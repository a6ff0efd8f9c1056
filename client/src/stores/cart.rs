//! Cart store: cached cart lines for badge counts and checkout.

use tracing::warn;

use crate::api::OrderApi;
use crate::domain::{CartSnapshot, CartState};

/// Cart cache refreshed through [`OrderApi`].
#[derive(Clone)]
pub struct CartStore {
    orders: OrderApi,
    state: CartState,
}

impl CartStore {
    /// Store caching into `state`.
    pub fn new(orders: OrderApi, state: CartState) -> Self {
        Self { orders, state }
    }

    /// Copy of the cached cart.
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.snapshot()
    }

    /// Reload the cart from the backend; failures keep the stale snapshot.
    pub async fn fetch_cart(&self) {
        match self.orders.cart_list().await {
            Ok(items) => self.state.replace(CartSnapshot::new(items)),
            Err(error) => warn!(%error, "failed to fetch cart"),
        }
    }

    /// Empty the cached cart without contacting the backend.
    pub fn clear_cart(&self) {
        self.state.clear();
    }
}
