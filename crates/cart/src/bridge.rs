//! Event Bridge: shopper intents in, store calls and render passes out.
//!
//! The bridge is the only place raw UI values are interpreted. Product data
//! attributes and quantity field text are parsed with explicit checks here;
//! anything that does not parse is dropped as a no-op instead of being coerced.
//!
//! Every dispatch is followed by a [`PresentationSync`] pass, so the display
//! layer always receives a fresh [`RenderDescription`].

use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;
use tracing::instrument;

use atelier_cart_core::{Money, ProductId};

use crate::config::CartConfig;
use crate::error::{DescriptorError, add_breadcrumb};
use crate::render::RenderDescription;
use crate::storage::SnapshotStorage;
use crate::store::{CartStore, ProductDescriptor};
use crate::sync::PresentationSync;

/// Data attribute names on an "add to cart" product card.
pub mod dataset_keys {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const PRICE: &str = "price";
    pub const IMAGE: &str = "image";
}

impl ProductDescriptor {
    /// Read a product card's data attributes.
    ///
    /// `id` and `price` are required and the price must be a non-negative
    /// decimal. A missing `name` or `image` becomes an empty string.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError` if the id or price is missing, the id is
    /// blank, or the price does not parse.
    pub fn from_dataset(dataset: &HashMap<String, String>) -> Result<Self, DescriptorError> {
        let id = dataset
            .get(dataset_keys::ID)
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .ok_or(DescriptorError::MissingAttribute(dataset_keys::ID))?;
        let price = dataset
            .get(dataset_keys::PRICE)
            .ok_or(DescriptorError::MissingAttribute(dataset_keys::PRICE))?;
        let unit_price = Money::parse(price)?;

        Ok(Self::new(
            id,
            dataset.get(dataset_keys::NAME).cloned().unwrap_or_default(),
            unit_price,
            dataset.get(dataset_keys::IMAGE).cloned().unwrap_or_default(),
        ))
    }
}

/// A quantity field held something other than an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityParseError {
    #[error("quantity is empty")]
    Empty,
    #[error("quantity {0:?} is not an integer: {1}")]
    NotAnInteger(String, ParseIntError),
}

/// Strictly parse quantity field text.
///
/// Surrounding whitespace is ignored. Fractions, exponents, trailing garbage
/// and empty input are rejected. Zero and negative values parse; the store
/// treats them as removals.
///
/// # Errors
///
/// Returns `QuantityParseError` if the text is not a base-10 integer.
pub fn parse_quantity(raw: &str) -> Result<i64, QuantityParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QuantityParseError::Empty);
    }
    trimmed
        .parse::<i64>()
        .map_err(|e| QuantityParseError::NotAnInteger(trimmed.to_string(), e))
}

/// What the shopper did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// "Add to cart" on a product card.
    AddToCart(ProductDescriptor),
    /// "Remove" on a cart row.
    RemoveItem { id: ProductId },
    /// A cart row's quantity field changed. `raw` is the field text as typed.
    QuantityChanged { id: ProductId, raw: String },
    /// "Checkout" in the cart panel.
    BeginCheckout,
    /// The checkout panel was dismissed.
    CancelCheckout,
    /// The checkout form was submitted.
    ConfirmCheckout,
}

impl Intent {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "add_to_cart",
            Self::RemoveItem { .. } => "remove_item",
            Self::QuantityChanged { .. } => "quantity_changed",
            Self::BeginCheckout => "begin_checkout",
            Self::CancelCheckout => "cancel_checkout",
            Self::ConfirmCheckout => "confirm_checkout",
        }
    }
}

/// Where the shopper is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckoutFlow {
    #[default]
    Browsing,
    CheckingOut,
}

/// A message the display layer should show the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Checkout was attempted with nothing in the cart.
    EmptyCart,
    /// The (simulated) payment went through and the cart was cleared.
    PaymentSuccessful,
}

impl Notice {
    /// Shopper-facing text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty!",
            Self::PaymentSuccessful => "Payment successful! Your fragrances will be delivered soon.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of handling one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub render: RenderDescription,
    pub notice: Option<Notice>,
    pub flow: CheckoutFlow,
}

/// Owns the session's cart and routes intents into it.
#[derive(Debug)]
pub struct EventBridge<S> {
    store: CartStore,
    sync: PresentationSync<S>,
    flow: CheckoutFlow,
}

impl<S: SnapshotStorage> EventBridge<S> {
    /// Start a page session: load the persisted cart (or an empty one).
    #[must_use]
    pub fn open(storage: S, config: &CartConfig) -> Self {
        let sync = PresentationSync::new(storage, config);
        let store = sync.load();
        Self {
            store,
            sync,
            flow: CheckoutFlow::Browsing,
        }
    }

    /// The first render of the session, before any intent.
    pub fn initial_render(&mut self) -> RenderDescription {
        self.sync.sync(&mut self.store)
    }

    /// Handle one intent to completion.
    #[instrument(skip_all, fields(intent = intent.name()))]
    pub fn dispatch(&mut self, intent: Intent) -> Dispatch {
        add_breadcrumb("cart", intent.name(), None);

        let notice = match intent {
            Intent::AddToCart(descriptor) => {
                self.store.add_or_increment(descriptor);
                None
            }
            Intent::RemoveItem { id } => {
                self.store.remove(&id);
                None
            }
            Intent::QuantityChanged { id, raw } => {
                match parse_quantity(&raw) {
                    Ok(quantity) => {
                        self.store.set_quantity(&id, quantity);
                    }
                    Err(e) => tracing::debug!(%id, error = %e, "ignored quantity edit"),
                }
                None
            }
            Intent::BeginCheckout => self.begin_checkout(),
            Intent::CancelCheckout => {
                self.flow = CheckoutFlow::Browsing;
                None
            }
            Intent::ConfirmCheckout => self.confirm_checkout(),
        };

        if let Some(notice) = notice {
            tracing::info!(?notice, "cart notice");
        }

        Dispatch {
            render: self.sync.sync(&mut self.store),
            notice,
            flow: self.flow,
        }
    }

    /// Handle an "add to cart" trigger straight from its data attributes.
    ///
    /// Unusable attributes make this a no-op apart from the render pass.
    pub fn dispatch_dataset(&mut self, dataset: &HashMap<String, String>) -> Dispatch {
        match ProductDescriptor::from_dataset(dataset) {
            Ok(descriptor) => self.dispatch(Intent::AddToCart(descriptor)),
            Err(e) => {
                tracing::debug!(error = %e, "ignored add to cart");
                Dispatch {
                    render: self.sync.sync(&mut self.store),
                    notice: None,
                    flow: self.flow,
                }
            }
        }
    }

    fn begin_checkout(&mut self) -> Option<Notice> {
        if self.store.is_empty() {
            return Some(Notice::EmptyCart);
        }
        self.flow = CheckoutFlow::CheckingOut;
        None
    }

    fn confirm_checkout(&mut self) -> Option<Notice> {
        if self.store.is_empty() {
            self.flow = CheckoutFlow::Browsing;
            return Some(Notice::EmptyCart);
        }
        if self.flow != CheckoutFlow::CheckingOut {
            tracing::debug!("checkout confirmed outside the checkout flow; ignoring");
            return None;
        }
        self.store.clear();
        self.flow = CheckoutFlow::Browsing;
        Some(Notice::PaymentSuccessful)
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    #[must_use]
    pub const fn flow(&self) -> CheckoutFlow {
        self.flow
    }

    #[must_use]
    pub const fn sync(&self) -> &PresentationSync<S> {
        &self.sync
    }

    /// End the session, handing back the storage.
    #[must_use]
    pub fn close(self) -> S {
        self.sync.into_storage()
    }
}
