//! Core types for the storefront cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::*;
pub use price::{DISPLAY_DECIMAL_PLACES, Money, MoneyError};
pub use quantity::Quantity;
