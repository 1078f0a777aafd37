//! Presentation Sync: persistence and render passes.
//!
//! Loading never fails the page. An absent slot, an unreadable slot, or
//! content that does not decode into valid line items all yield an empty
//! cart. Writes happen on every sync pass that follows a change; a failed
//! write leaves the store dirty so the next pass tries again.

use tracing::instrument;

use crate::config::CartConfig;
use crate::error::{SnapshotError, add_breadcrumb};
use crate::render::{RenderDescription, Renderer};
use crate::storage::SnapshotStorage;
use crate::store::{CartStore, LineItem};

/// Encode line items in the persisted slot layout.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn encode_items(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decode the persisted slot layout.
///
/// # Errors
///
/// Returns `SnapshotError::Json` if the content is not a JSON array of valid
/// line items (including negative prices and quantities below one).
pub fn decode_items(raw: &str) -> Result<Vec<LineItem>, SnapshotError> {
    Ok(serde_json::from_str(raw)?)
}

/// Owns the storage slot and renders the cart after each change.
#[derive(Debug)]
pub struct PresentationSync<S> {
    storage: S,
    storage_key: String,
    renderer: Renderer,
}

impl<S: SnapshotStorage> PresentationSync<S> {
    #[must_use]
    pub fn new(storage: S, config: &CartConfig) -> Self {
        Self {
            storage,
            storage_key: config.storage_key.clone(),
            renderer: Renderer::new(config.currency_symbol.clone()),
        }
    }

    /// Build the session's store from the persisted slot, or empty.
    #[instrument(skip(self), fields(key = %self.storage_key))]
    pub fn load(&self) -> CartStore {
        match self.try_load() {
            Ok(Some(items)) => {
                tracing::debug!(lines = items.len(), "restored cart");
                CartStore::from_items(items)
            }
            Ok(None) => CartStore::new(),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unusable cart snapshot");
                add_breadcrumb("cart", "discarded unusable snapshot", None);
                CartStore::new()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Vec<LineItem>>, SnapshotError> {
        self.storage
            .read(&self.storage_key)?
            .map(|raw| decode_items(&raw))
            .transpose()
    }

    /// Write the store through if it changed, then describe it.
    pub fn sync(&mut self, store: &mut CartStore) -> RenderDescription {
        if store.is_dirty() {
            self.persist(store);
        }
        self.render(store)
    }

    /// Write the full item list to the slot, regardless of the dirty flag.
    ///
    /// Returns whether the write succeeded.
    #[instrument(skip_all, fields(key = %self.storage_key))]
    pub fn persist(&mut self, store: &mut CartStore) -> bool {
        let encoded = match encode_items(store.snapshot().items()) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode cart snapshot");
                return false;
            }
        };

        match self.storage.write(&self.storage_key, &encoded) {
            Ok(()) => {
                store.mark_clean();
                true
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "failed to persist cart snapshot");
                add_breadcrumb(
                    "cart",
                    "snapshot write failed",
                    Some(&[("error", message.as_str())]),
                );
                false
            }
        }
    }

    /// Describe the store for the display layer. No side effects.
    #[must_use]
    pub fn render(&self, store: &CartStore) -> RenderDescription {
        self.renderer.render(&store.snapshot())
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }
}
