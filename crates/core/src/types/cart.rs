//! The cart and its transitions.
//!
//! A [`Cart`] is an insertion-ordered list of line items, at most one per
//! product, each with an amount of at least one. Transitions never mutate the
//! receiver: they validate first and hand back the next cart, leaving the
//! caller to decide when (and whether) to commit it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, ProductId, StockRecord};

/// Reasons a cart transition is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    /// A new line was requested for a product with no stock at all.
    #[error("product {0} is unavailable")]
    Unavailable(ProductId),
    /// The requested amount is above the available stock.
    #[error("requested {requested} of product {product_id}, only {available} in stock")]
    ExceedsStock {
        /// Product the request was for.
        product_id: ProductId,
        /// Amount the line would have ended up with.
        requested: u32,
        /// Stock observed for the product.
        available: u32,
    },
    /// Line amounts must be at least one; removal is a separate operation.
    #[error("amount must be at least 1")]
    ZeroAmount,
    /// Two lines share a product identifier.
    #[error("product {0} appears more than once")]
    DuplicateItem(ProductId),
}

/// A product in the cart together with its requested quantity.
///
/// Serializes flat, as the catalog product plus an `amount` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLineItem {
    /// A fresh line holding a single unit.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}

/// Ordered, duplicate-free collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing line items, checking the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroAmount`] if any line has amount 0, or
    /// [`CartError::DuplicateItem`] if two lines share a product.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CartError> {
        for (index, item) in items.iter().enumerate() {
            if item.amount == 0 {
                return Err(CartError::ZeroAmount);
            }
            if items.iter().take(index).any(|other| other.id() == item.id()) {
                return Err(CartError::DuplicateItem(item.id()));
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLineItem> {
        self.items.iter()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == product_id)
    }

    /// The cart after adding one unit of `product`.
    ///
    /// An existing line is incremented if stock leaves headroom; otherwise a
    /// new line with amount 1 is appended, provided anything is in stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::ExceedsStock`] when the existing line already holds
    ///   every unit in stock.
    /// - [`CartError::Unavailable`] when the product is new to the cart and
    ///   stock is zero.
    pub fn with_product_added(
        &self,
        product: &Product,
        stock: &StockRecord,
    ) -> Result<Self, CartError> {
        let mut next = self.clone();

        match next.items.iter_mut().find(|item| item.id() == product.id) {
            Some(line) => {
                if stock.amount <= line.amount {
                    return Err(CartError::ExceedsStock {
                        product_id: product.id,
                        requested: line.amount.saturating_add(1),
                        available: stock.amount,
                    });
                }
                line.amount += 1;
            }
            None => {
                if stock.amount == 0 {
                    return Err(CartError::Unavailable(product.id));
                }
                next.items.push(CartLineItem::new(product.clone()));
            }
        }

        Ok(next)
    }

    /// The cart without the line for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if there is no such line.
    pub fn without_product(&self, product_id: ProductId) -> Result<Self, CartError> {
        let index = self
            .position(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        let mut next = self.clone();
        next.items.remove(index);
        Ok(next)
    }

    /// The cart with the line for `product_id` set to exactly `amount`.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroAmount`] if `amount` is 0.
    /// - [`CartError::NotInCart`] if there is no such line.
    /// - [`CartError::ExceedsStock`] if `stock` cannot cover `amount`.
    pub fn with_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
        stock: &StockRecord,
    ) -> Result<Self, CartError> {
        if amount == 0 {
            return Err(CartError::ZeroAmount);
        }

        if !self.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }

        if !stock.covers(amount) {
            return Err(CartError::ExceedsStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut next = self.clone();
        if let Some(line) = next.items.iter_mut().find(|item| item.id() == product_id) {
            line.amount = amount;
        }
        Ok(next)
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Decimal::new(13_990, 2),
            image: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    const fn stock(id: i32, amount: u32) -> StockRecord {
        StockRecord {
            id: ProductId::new(id),
            amount,
        }
    }

    fn ids(cart: &Cart) -> Vec<i32> {
        cart.iter().map(|item| item.id().as_i32()).collect()
    }

    #[test]
    fn test_add_new_product_appends_single_unit() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 5))
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_add_existing_product_increments() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 5))
            .unwrap()
            .with_product_added(&product(1), &stock(1, 5))
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let cart = Cart::new()
            .with_product_added(&product(3), &stock(3, 1))
            .unwrap()
            .with_product_added(&product(1), &stock(1, 2))
            .unwrap()
            .with_product_added(&product(3), &stock(3, 2))
            .unwrap();

        assert_eq!(ids(&cart), vec![3, 1]);
    }

    #[test]
    fn test_add_without_headroom_is_rejected() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 1))
            .unwrap();

        let err = cart
            .with_product_added(&product(1), &stock(1, 1))
            .unwrap_err();
        assert_eq!(
            err,
            CartError::ExceedsStock {
                product_id: ProductId::new(1),
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_add_new_product_without_stock_is_unavailable() {
        let err = Cart::new()
            .with_product_added(&product(1), &stock(1, 0))
            .unwrap_err();
        assert_eq!(err, CartError::Unavailable(ProductId::new(1)));
    }

    #[test]
    fn test_without_product_removes_line() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 1))
            .unwrap()
            .with_product_added(&product(2), &stock(2, 1))
            .unwrap();

        let next = cart.without_product(ProductId::new(1)).unwrap();
        assert_eq!(ids(&next), vec![2]);
        // Receiver is untouched
        assert_eq!(ids(&cart), vec![1, 2]);
    }

    #[test]
    fn test_without_missing_product_fails() {
        assert_eq!(
            Cart::new().without_product(ProductId::new(9)).unwrap_err(),
            CartError::NotInCart(ProductId::new(9))
        );
    }

    #[test]
    fn test_with_amount_sets_exact_value() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 5))
            .unwrap()
            .with_product_amount(ProductId::new(1), 5, &stock(1, 5))
            .unwrap();

        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 5);
    }

    #[test]
    fn test_with_amount_zero_rejected_before_lookup() {
        assert_eq!(
            Cart::new()
                .with_product_amount(ProductId::new(1), 0, &stock(1, 5))
                .unwrap_err(),
            CartError::ZeroAmount
        );
    }

    #[test]
    fn test_with_amount_above_stock_rejected() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 3))
            .unwrap();

        let err = cart
            .with_product_amount(ProductId::new(1), 4, &stock(1, 3))
            .unwrap_err();
        assert!(matches!(err, CartError::ExceedsStock { requested: 4, .. }));
    }

    #[test]
    fn test_with_amount_missing_product_fails() {
        assert_eq!(
            Cart::new()
                .with_product_amount(ProductId::new(1), 1, &stock(1, 3))
                .unwrap_err(),
            CartError::NotInCart(ProductId::new(1))
        );
    }

    #[test]
    fn test_totals() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 5))
            .unwrap()
            .with_product_added(&product(2), &stock(2, 5))
            .unwrap()
            .with_product_amount(ProductId::new(2), 3, &stock(2, 5))
            .unwrap();

        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.items()[1].subtotal(), Decimal::new(41_970, 2));
        assert_eq!(cart.total(), Decimal::new(55_960, 2));
    }

    #[test]
    fn test_serializes_as_flat_array() {
        let cart = Cart::new()
            .with_product_added(&product(1), &stock(1, 5))
            .unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["amount"], 1);
        assert_eq!(value[0]["title"], "Tênis 1");
    }

    #[test]
    fn test_deserializes_snapshot_with_numeric_prices() {
        let json = r#"[
            {"id":2,"title":"A","price":139.9,"image":"a.jpg","amount":2},
            {"id":1,"title":"B","price":"99.90","image":"b.jpg","amount":1}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(ids(&cart), vec![2, 1]);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 2);
    }

    #[test]
    fn test_deserialize_rejects_duplicates_and_zero_amounts() {
        let duplicate = r#"[
            {"id":1,"title":"A","price":1,"image":"a","amount":1},
            {"id":1,"title":"A","price":1,"image":"a","amount":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(duplicate).is_err());

        let zero = r#"[{"id":1,"title":"A","price":1,"image":"a","amount":0}]"#;
        assert!(serde_json::from_str::<Cart>(zero).is_err());
    }
}
