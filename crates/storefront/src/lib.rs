//! RocketShoes Storefront library.
//!
//! The shopper-facing cart: a [`CartStore`] that checks every change against
//! the remote catalog and mirrors the cart to local storage.
//!
//! # Modules
//!
//! - [`catalog`] - Product and stock lookups (`Catalog` trait, HTTP client)
//! - [`storage`] - Key-value persistence for the cart snapshot
//! - [`store`] - The cart store and its three operations
//! - [`error`] - Failure types and the fixed shopper-facing notices
//! - [`config`] - Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::{CartStore, FileStorage, HttpCatalog, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let catalog = HttpCatalog::new(&config.catalog)?;
//! let storage = FileStorage::new(&config.storage.dir);
//! let mut store = CartStore::open_with_key(catalog, storage, &config.storage.key);
//!
//! if let Err(failure) = store.add_product(ProductId::new(1)).await {
//!     show_toast(failure.notice().message());
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, CatalogError, HttpCatalog};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{CartFailure, CartOperation, Notice, StoreError};
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::CartStore;
