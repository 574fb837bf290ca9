//! Cart commands.
//!
//! Each command opens the store from the configured storage directory, runs
//! one operation, and prints the resulting cart. A rejected operation prints
//! its shopper-facing notice on stderr and exits non-zero.

use std::fmt::Write as _;

use rocketshoes_core::{Cart, CurrencyCode, Price, ProductId};
use rocketshoes_storefront::{
    CartFailure, CartStore, CatalogError, FileStorage, HttpCatalog, Notice, StorefrontConfig,
};
use thiserror::Error;

/// Errors that can occur running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The catalog client could not be built.
    #[error("Catalog setup error: {0}")]
    Catalog(#[from] CatalogError),

    /// The store rejected the operation. The notice has already been shown
    /// and the cause logged by the store.
    #[error("{0}")]
    Rejected(Notice),
}

impl CartCommandError {
    /// Whether the shopper has already been told about this error.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

type Store = CartStore<HttpCatalog, FileStorage>;

fn open_store(config: &StorefrontConfig) -> Result<Store, CartCommandError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    let storage = FileStorage::new(&config.storage.dir);
    Ok(CartStore::open_with_key(catalog, storage, config.storage.key.clone()))
}

/// Print the current cart.
///
/// # Errors
///
/// Returns an error if the catalog client cannot be built.
pub fn show(config: &StorefrontConfig) -> Result<(), CartCommandError> {
    let store = open_store(config)?;
    print_cart(store.cart(), config.currency);
    Ok(())
}

/// Add one unit of `product_id`.
///
/// # Errors
///
/// Returns an error if the store rejects the addition.
pub async fn add(
    config: &StorefrontConfig,
    product_id: ProductId,
) -> Result<(), CartCommandError> {
    let mut store = open_store(config)?;
    let result = store.add_product(product_id).await;
    report(result, config.currency)
}

/// Remove `product_id` from the cart.
///
/// # Errors
///
/// Returns an error if the product is not in the cart or storage fails.
pub fn remove(config: &StorefrontConfig, product_id: ProductId) -> Result<(), CartCommandError> {
    let mut store = open_store(config)?;
    let result = store.remove_product(product_id);
    report(result, config.currency)
}

/// Set the amount of `product_id`.
///
/// # Errors
///
/// Returns an error if the store rejects the new amount.
pub async fn update(
    config: &StorefrontConfig,
    product_id: ProductId,
    amount: u32,
) -> Result<(), CartCommandError> {
    let mut store = open_store(config)?;
    let result = store.update_product_amount(product_id, amount).await;
    report(result, config.currency)
}

fn report(
    result: Result<&Cart, CartFailure>,
    currency: CurrencyCode,
) -> Result<(), CartCommandError> {
    match result {
        Ok(cart) => {
            print_cart(cart, currency);
            Ok(())
        }
        Err(failure) => {
            let notice = failure.notice();
            notify(notice);
            Err(CartCommandError::Rejected(notice))
        }
    }
}

#[allow(clippy::print_stderr)]
fn notify(notice: Notice) {
    eprintln!("{notice}");
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart, currency: CurrencyCode) {
    print!("{}", render_cart(cart, currency));
}

/// Format the cart as one line per item plus a summary line.
pub fn render_cart(cart: &Cart, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "#{:<5} {}  {} x {} = {}",
            item.id().as_i32(),
            item.product.title,
            item.amount,
            Price::new(item.product.price, currency),
            Price::new(item.subtotal(), currency),
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), {} unit(s), total {}",
        cart.len(),
        cart.total_quantity(),
        Price::new(cart.total(), currency),
    );
    out
}
