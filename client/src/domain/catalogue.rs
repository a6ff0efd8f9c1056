//! Mall catalogue entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product listed in the community mall.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub original_price: f64,
    pub stock: i32,
    pub image_url: String,
    /// `1` when the product is on promotion.
    pub is_promotion: i32,
    pub sales: i32,
    /// `1` listed, `0` withdrawn.
    pub status: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product is part of a running promotion.
    pub fn on_promotion(&self) -> bool {
        self.is_promotion == 1
    }
}
