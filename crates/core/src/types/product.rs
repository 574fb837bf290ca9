//! Catalog records returned by the product and stock endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A catalog product.
///
/// Only `id` drives cart behaviour; the remaining fields are carried along so
/// the cart can be rendered without another catalog round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Image URL.
    pub image: String,
}

/// Authoritative available quantity for a product.
///
/// Always fetched fresh before a mutation that depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Product identifier.
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl StockRecord {
    /// Whether at least `amount` units are available.
    #[must_use]
    pub const fn covers(&self, amount: u32) -> bool {
        self.amount >= amount
    }
}
