//! Remote product catalog and stock lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] is the seam the cart store depends on; anything that can
//!   answer "what is product N" and "how many of N are in stock" fits
//! - [`HttpCatalog`] talks to the JSON REST catalog service
//! - The catalog is source of truth for stock - stock is never cached,
//!   product display data is cached via `moka`
//!
//! # Endpoints
//!
//! - `GET {base}/products/{id}` - product record
//! - `GET {base}/stock/{id}` - `{ "id": N, "amount": M }`
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::catalog::{Catalog, HttpCatalog};
//!
//! let catalog = HttpCatalog::new(&config.catalog)?;
//! let stock = catalog.stock(ProductId::new(1)).await?;
//! ```

mod http;

pub use http::HttpCatalog;

use std::sync::Arc;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockRecord};
use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog has no record for the product.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog answered with something other than 200 OK.
    #[error("Unexpected status {status} for {resource}")]
    UnexpectedStatus {
        /// Resource path that was requested.
        resource: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read-only access to products and their stock.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the product record for `id`.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Fetch the current stock for `id`.
    ///
    /// Implementations must not cache this.
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        (**self).product(id).await
    }

    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError> {
        (**self).stock(id).await
    }
}
