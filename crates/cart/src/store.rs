//! Cart Store: the ordered collection of line items and its mutations.
//!
//! The store is the single owner of cart state for a page session. Every
//! mutation runs to completion synchronously and leaves two invariants
//! intact:
//!
//! - at most one line item per [`ProductId`]
//! - every line item has a quantity of at least one
//!
//! Mutations report whether anything changed and mark the store dirty so the
//! next [`PresentationSync`](crate::sync::PresentationSync) pass writes it
//! through to storage.

use serde::{Deserialize, Serialize};

use atelier_cart_core::{Money, ProductId, Quantity};

/// What an "add to cart" trigger knows about a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub image_ref: String,
}

impl ProductDescriptor {
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
        }
    }
}

/// One product currently in the cart.
///
/// Name, price and image are captured when the product is first added and
/// never change afterwards. Only the quantity is mutable, and only through
/// [`CartStore`].
///
/// Serialized with the persisted slot layout: `id`, `name`, `unitPrice`,
/// `imageRef`, `quantity`. Snapshots written by the legacy page script used
/// `price` and `image`, which are accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: ProductId,
    name: String,
    #[serde(alias = "price")]
    unit_price: Money,
    #[serde(alias = "image", default)]
    image_ref: String,
    quantity: Quantity,
}

impl LineItem {
    /// A fresh line item with a quantity of one.
    #[must_use]
    pub fn from_descriptor(descriptor: ProductDescriptor) -> Self {
        Self::with_quantity(descriptor, Quantity::ONE)
    }

    #[must_use]
    pub fn with_quantity(descriptor: ProductDescriptor, quantity: Quantity) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            unit_price: descriptor.unit_price,
            image_ref: descriptor.image_ref,
            quantity,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `unit_price × quantity`, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Read-only view of the cart and its derived values.
#[derive(Debug, Clone, Copy)]
pub struct CartSnapshot<'a> {
    items: &'a [LineItem],
}

impl<'a> CartSnapshot<'a> {
    /// Line items in insertion order.
    #[must_use]
    pub const fn items(&self) -> &'a [LineItem] {
        self.items
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&'a LineItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of all line subtotals at full precision.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

/// Owner of the cart collection for one page session.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<LineItem>,
    dirty: bool,
}

impl CartStore {
    /// An empty, clean cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted line items.
    ///
    /// Duplicate ids are merged into the first occurrence (quantities add).
    /// A merge marks the store dirty so the normalized form is written back.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut store = Self::new();
        for item in items {
            if let Some(existing) = store.find_mut(&item.id) {
                tracing::warn!(id = %item.id, "merging duplicate line item from snapshot");
                existing.quantity = existing.quantity.merge(item.quantity);
                store.dirty = true;
            } else {
                store.items.push(item);
            }
        }
        store
    }

    /// Add one unit of a product, appending a new line if it is not yet in
    /// the cart.
    pub fn add_or_increment(&mut self, candidate: ProductDescriptor) {
        if let Some(existing) = self.find_mut(&candidate.id) {
            existing.quantity = existing.quantity.increment();
            tracing::debug!(id = %candidate.id, quantity = %existing.quantity, "incremented line item");
        } else {
            tracing::debug!(id = %candidate.id, "added line item");
            self.items.push(LineItem::from_descriptor(candidate));
        }
        self.dirty = true;
    }

    /// Delete the line item for `id`. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != *id);
        let removed = self.items.len() != before;
        if removed {
            tracing::debug!(%id, "removed line item");
            self.dirty = true;
        }
        removed
    }

    /// Replace the quantity for `id`.
    ///
    /// A requested quantity of zero or less removes the line item. Requests
    /// above `u32::MAX` are rejected. Unknown ids are ignored. Returns whether
    /// the cart changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let Some(quantity) = Quantity::from_i64(quantity) else {
            tracing::debug!(%id, quantity, "rejected out-of-range quantity");
            return false;
        };
        let Some(item) = self.find_mut(id) else {
            return false;
        };
        if item.quantity == quantity {
            return false;
        }
        item.quantity = quantity;
        tracing::debug!(%id, %quantity, "set line item quantity");
        self.dirty = true;
        true
    }

    /// Empty the cart. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        tracing::debug!(lines = self.items.len(), "cleared cart");
        self.items.clear();
        self.dirty = true;
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot<'_> {
        CartSnapshot { items: &self.items }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether there are changes not yet written to storage.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current state has been persisted.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == *id)
    }
}
