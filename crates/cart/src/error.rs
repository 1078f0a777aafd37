//! Error types and Sentry helpers.
//!
//! Nothing in this module is fatal to the page. Store operations and bridge
//! dispatches never return these errors; they are logged, recorded as Sentry
//! breadcrumbs, and converted into "cart unchanged".

use thiserror::Error;

use atelier_cart_core::MoneyError;

/// A persistence slot could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot names must be non-empty and path-safe.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A persisted snapshot could not be turned into a cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The slot content is not the expected JSON layout.
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The slot could not be read at all.
    #[error("Unreadable snapshot: {0}")]
    Storage(#[from] StorageError),
}

/// The "add to cart" element carried unusable product data.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Missing product attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("Invalid product price: {0}")]
    InvalidPrice(#[from] MoneyError),
}

/// Add a breadcrumb for cart actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of shopper
/// actions leading up to an error. Without an initialized Sentry client this
/// is a no-op.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
