//! Unified error handling for cart operations.
//!
//! Every cart operation returns `Result<_, CartFailure>`. A failure carries the
//! underlying cause for logging and maps to one fixed user-facing [`Notice`],
//! which is all a shopper should ever be shown.

use core::fmt;

use rocketshoes_core::CartError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Anything that can stop a cart operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested transition is not allowed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The cart operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddProduct => write!(f, "add_product"),
            Self::RemoveProduct => write!(f, "remove_product"),
            Self::UpdateProductAmount => write!(f, "update_product_amount"),
        }
    }
}

/// Fixed messages shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    AddFailed,
    RemoveFailed,
    UpdateFailed,
    OutOfStock,
}

impl Notice {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AddFailed => "could not add product",
            Self::RemoveFailed => "could not remove product",
            Self::UpdateFailed => "could not change quantity",
            Self::OutOfStock => "requested quantity exceeds stock",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A cart operation that did not go through. The cart is unchanged.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct CartFailure {
    operation: CartOperation,
    #[source]
    source: StoreError,
}

impl CartFailure {
    pub fn new(operation: CartOperation, source: impl Into<StoreError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> CartOperation {
        self.operation
    }

    /// The underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &StoreError {
        &self.source
    }

    /// Message to show the shopper.
    ///
    /// Stock shortfalls get their own message; every other failure, including
    /// transport and storage errors, gets the operation's generic one.
    #[must_use]
    pub const fn notice(&self) -> Notice {
        if matches!(
            self.source,
            StoreError::Cart(CartError::ExceedsStock { .. })
        ) {
            return Notice::OutOfStock;
        }

        match self.operation {
            CartOperation::AddProduct => Notice::AddFailed,
            CartOperation::RemoveProduct => Notice::RemoveFailed,
            CartOperation::UpdateProductAmount => Notice::UpdateFailed,
        }
    }

    /// Whether the failure came from a collaborator rather than a rejected
    /// transition. A product the catalog doesn't know is a rejection.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        !matches!(
            self.source,
            StoreError::Cart(_) | StoreError::Catalog(CatalogError::NotFound(_))
        )
    }
}
