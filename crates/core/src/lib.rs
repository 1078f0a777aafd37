//! Atelier Cart Core - Shared value types.
//!
//! This crate provides the value types the cart engine is built from:
//! - [`ProductId`] - opaque product identifier taken from page data
//! - [`Money`] - non-negative decimal amount with display rounding
//! - [`Quantity`] - unit count that can never be zero
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no rendering.
//! This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
