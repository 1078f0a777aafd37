//! Atelier Cart - Client-side cart state engine for the storefront page.
//!
//! The engine tracks which fragrances a shopper has picked, how many of each,
//! and what they cost. It persists the cart across page loads and hands the
//! display layer a fresh description of the cart after every change.
//!
//! # Architecture
//!
//! UI events flow through three components:
//!
//! - [`bridge`] - Event Bridge: parses raw UI input into store calls
//! - [`store`] - Cart Store: the ordered line items and their invariants
//! - [`sync`] - Presentation Sync: write-through persistence and rendering
//!
//! Supporting modules:
//!
//! - [`render`] - render descriptions and HTML fragments
//! - [`storage`] - named persistence slots (memory and file backed)
//! - [`config`] - engine configuration
//! - [`error`] - error types and Sentry breadcrumbs
//! - [`telemetry`] - tracing and Sentry setup for hosts
//!
//! Everything runs synchronously inside one event handler at a time. There is
//! no locking and no fatal error path: bad input leaves the cart unchanged.
//!
//! # Example
//!
//! ```rust
//! use atelier_cart::bridge::{EventBridge, Intent};
//! use atelier_cart::config::CartConfig;
//! use atelier_cart::storage::MemoryStorage;
//! use atelier_cart::store::ProductDescriptor;
//! use atelier_cart_core::Money;
//!
//! let mut bridge = EventBridge::open(MemoryStorage::new(), &CartConfig::default());
//! let rose = ProductDescriptor::new("P1", "Rose Oud", Money::from_cents(1000), "rose.jpg");
//!
//! bridge.dispatch(Intent::AddToCart(rose.clone()));
//! let dispatch = bridge.dispatch(Intent::AddToCart(rose));
//!
//! assert_eq!(dispatch.render.item_count, 2);
//! assert_eq!(dispatch.render.formatted_total, "$20.00");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bridge;
pub mod config;
pub mod error;
pub mod render;
pub mod storage;
pub mod store;
pub mod sync;
pub mod telemetry;

pub use bridge::{CheckoutFlow, Dispatch, EventBridge, Intent, Notice};
pub use config::CartConfig;
pub use render::RenderDescription;
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage};
pub use store::{CartSnapshot, CartStore, LineItem, ProductDescriptor};
pub use sync::PresentationSync;
