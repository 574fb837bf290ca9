//! The cart store.
//!
//! [`CartStore`] owns the shopper's cart, a [`Catalog`] to check products and
//! stock against, and a [`CartStorage`] that mirrors every change. The cart is
//! hydrated once when the store is opened and only changes through
//! [`add_product`](CartStore::add_product),
//! [`remove_product`](CartStore::remove_product) and
//! [`update_product_amount`](CartStore::update_product_amount).
//!
//! Each operation computes the next cart from the current one, writes it to
//! storage, and only then swaps it into memory. A failure at any step returns
//! a [`CartFailure`] and leaves both copies exactly as they were.

use rocketshoes_core::{Cart, CartError, ProductId};
use tracing::{info, instrument, warn};

use crate::catalog::Catalog;
use crate::error::{CartFailure, CartOperation, StoreError};
use crate::storage::{CART_STORAGE_KEY, CartStorage};

/// Shopping cart backed by a remote catalog and local storage.
///
/// Mutating operations take `&mut self`; share a store between tasks by
/// wrapping it in a mutex.
pub struct CartStore<C, S> {
    catalog: C,
    storage: S,
    key: String,
    cart: Cart,
}

impl<C: Catalog, S: CartStorage> CartStore<C, S> {
    /// Open the store under the default storage key.
    pub fn open(catalog: C, storage: S) -> Self {
        Self::open_with_key(catalog, storage, CART_STORAGE_KEY)
    }

    /// Open the store, hydrating the cart from `key`.
    ///
    /// A missing or unreadable snapshot yields an empty cart.
    pub fn open_with_key(catalog: C, storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = hydrate(&storage, &key);
        info!(key = %key, items = cart.len(), "Cart store opened");

        Self {
            catalog,
            storage,
            key,
            cart,
        }
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Add one unit of a product.
    ///
    /// Fetches the product and its stock, then either appends a new line with
    /// amount 1 or increments the existing line if stock allows.
    ///
    /// # Errors
    ///
    /// Returns a [`CartFailure`] if the product or stock can't be fetched,
    /// stock doesn't allow another unit, or the cart can't be persisted.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<&Cart, CartFailure> {
        let next = self.cart_after_add(product_id).await;
        self.apply(CartOperation::AddProduct, next)
    }

    /// Remove a product's line. No catalog calls are made.
    ///
    /// # Errors
    ///
    /// Returns a [`CartFailure`] if the product is not in the cart or the
    /// cart can't be persisted.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<&Cart, CartFailure> {
        let next = self
            .cart
            .without_product(product_id)
            .map_err(StoreError::from);
        self.apply(CartOperation::RemoveProduct, next)
    }

    /// Set a line's amount, checked against fresh stock.
    ///
    /// An amount of 0 is always rejected; use
    /// [`remove_product`](Self::remove_product) instead.
    ///
    /// # Errors
    ///
    /// Returns a [`CartFailure`] if `amount` is 0, stock can't be fetched,
    /// the product is not in the cart, stock can't cover `amount`, or the
    /// cart can't be persisted.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(
        &mut self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<&Cart, CartFailure> {
        let next = self.cart_after_update(product_id, amount).await;
        self.apply(CartOperation::UpdateProductAmount, next)
    }

    async fn cart_after_add(&self, product_id: ProductId) -> Result<Cart, StoreError> {
        let (product, stock) = tokio::join!(
            self.catalog.product(product_id),
            self.catalog.stock(product_id)
        );
        Ok(self.cart.with_product_added(&product?, &stock?)?)
    }

    async fn cart_after_update(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<Cart, StoreError> {
        if amount == 0 {
            return Err(CartError::ZeroAmount.into());
        }
        let stock = self.catalog.stock(product_id).await?;
        Ok(self.cart.with_product_amount(product_id, amount, &stock)?)
    }

    /// Commit `next` if it was computed, logging and wrapping any failure.
    fn apply(
        &mut self,
        operation: CartOperation,
        next: Result<Cart, StoreError>,
    ) -> Result<&Cart, CartFailure> {
        match next.and_then(|cart| self.commit(cart)) {
            Ok(()) => {
                info!(
                    %operation,
                    items = self.cart.len(),
                    quantity = self.cart.total_quantity(),
                    "Cart updated"
                );
                Ok(&self.cart)
            }
            Err(e) => {
                let failure = CartFailure::new(operation, e);
                if failure.is_infrastructure() {
                    tracing::error!(%operation, error = %failure.cause(), "Cart operation failed");
                } else {
                    warn!(%operation, reason = %failure.cause(), "Cart operation rejected");
                }
                Err(failure)
            }
        }
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(&next)?;
        self.storage.set(&self.key, &snapshot)?;
        self.cart = next;
        Ok(())
    }
}

/// Load the persisted cart, falling back to empty.
fn hydrate<S: CartStorage>(storage: &S, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(snapshot)) => serde_json::from_str(&snapshot).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Discarding unreadable cart snapshot");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "Could not read cart snapshot");
            Cart::new()
        }
    }
}
