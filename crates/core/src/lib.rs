//! RocketShoes Core - Shared cart and catalog types.
//!
//! This crate provides the domain types used across all RocketShoes components:
//! - `storefront` - Cart store, catalog client and local cart storage
//! - `cli` - Command-line client for driving the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transitions - no I/O, no
//! HTTP clients, no storage. Every transition takes the current cart by
//! reference and returns the next one, so a rejected operation can never
//! leave a half-applied cart behind.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
