//! Catalog lookup commands.

use rocketshoes_core::{Price, ProductId};
use rocketshoes_storefront::{Catalog, CatalogError, HttpCatalog, StorefrontConfig};
use tracing::info;

/// Print a product and its current stock.
///
/// # Errors
///
/// Returns an error if either lookup fails.
#[allow(clippy::print_stdout)]
pub async fn show(config: &StorefrontConfig, product_id: ProductId) -> Result<(), CatalogError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    info!(base_url = %catalog.base_url(), %product_id, "Looking up product");

    let (product, stock) = tokio::try_join!(catalog.product(product_id), catalog.stock(product_id))?;

    println!("#{} {}", product.id, product.title);
    println!("  price: {}", Price::new(product.price, config.currency));
    println!("  stock: {}", stock.amount);
    println!("  image: {}", product.image);
    Ok(())
}
