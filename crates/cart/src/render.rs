//! Render descriptions for the display layer.
//!
//! A [`RenderDescription`] says what the cart panel should show without
//! saying how to draw it. Hosts either consume it directly, as JSON, or as
//! the HTML fragments produced by the askama templates below.

use askama::Template;
use serde::Serialize;

use atelier_cart_core::{Money, ProductId};

use crate::store::{CartSnapshot, LineItem};

/// One row of the cart panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLine {
    pub id: ProductId,
    pub name: String,
    pub image_ref: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_subtotal: Money,
    pub formatted_unit_price: String,
    pub formatted_line_subtotal: String,
}

/// Everything the display layer needs after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDescription {
    pub lines: Vec<RenderedLine>,
    pub item_count: u64,
    /// Unrounded total.
    pub total: Money,
    pub formatted_total: String,
    pub is_empty: bool,
}

impl RenderDescription {
    /// Serialize for a JSON-speaking display layer.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The cart list markup: one `.cart-item` per line plus the total.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn items_html(&self) -> askama::Result<String> {
        CartItemsFragment { cart: self }.render()
    }

    /// The item count badge markup.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn count_html(&self) -> askama::Result<String> {
        CartCountFragment {
            count: self.item_count,
        }
        .render()
    }
}

/// Cart items fragment template.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsFragment<'a> {
    pub cart: &'a RenderDescription,
}

/// Cart count badge fragment template.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountFragment {
    pub count: u64,
}

/// Turns cart snapshots into render descriptions.
#[derive(Debug, Clone)]
pub struct Renderer {
    currency_symbol: String,
}

impl Renderer {
    #[must_use]
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Describe `snapshot`. Pure: equal snapshots give equal descriptions.
    #[must_use]
    pub fn render(&self, snapshot: &CartSnapshot<'_>) -> RenderDescription {
        let total = snapshot.total();
        RenderDescription {
            lines: snapshot
                .items()
                .iter()
                .map(|item| self.render_line(item))
                .collect(),
            item_count: snapshot.item_count(),
            total,
            formatted_total: self.format(total),
            is_empty: snapshot.is_empty(),
        }
    }

    fn render_line(&self, item: &LineItem) -> RenderedLine {
        let line_subtotal = item.subtotal();
        RenderedLine {
            id: item.id().clone(),
            name: item.name().to_string(),
            image_ref: item.image_ref().to_string(),
            unit_price: item.unit_price(),
            quantity: item.quantity().get(),
            line_subtotal,
            formatted_unit_price: self.format(item.unit_price()),
            formatted_line_subtotal: self.format(line_subtotal),
        }
    }

    fn format(&self, amount: Money) -> String {
        amount.display(&self.currency_symbol)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CURRENCY_SYMBOL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{CartStore, ProductDescriptor};

    fn sample_store() -> CartStore {
        let mut store = CartStore::new();
        store.add_or_increment(ProductDescriptor::new(
            "P1",
            "Vétiver <Intense>",
            Money::parse("10").unwrap(),
            "img/vetiver.jpg",
        ));
        store.add_or_increment(ProductDescriptor::new(
            "P1",
            "Vétiver <Intense>",
            Money::parse("10").unwrap(),
            "img/vetiver.jpg",
        ));
        store.add_or_increment(ProductDescriptor::new(
            "P2",
            "Ambre",
            Money::parse("0.125").unwrap(),
            "img/ambre.jpg",
        ));
        store
    }

    #[test]
    fn test_render_lines_and_totals() {
        let store = sample_store();
        let description = Renderer::default().render(&store.snapshot());

        assert_eq!(description.lines.len(), 2);
        let first = description.lines.first().unwrap();
        assert_eq!(first.quantity, 2);
        assert_eq!(first.formatted_unit_price, "$10.00");
        assert_eq!(first.formatted_line_subtotal, "$20.00");
        assert_eq!(description.item_count, 3);
        assert_eq!(description.formatted_total, "$20.13");
        assert_eq!(description.total, Money::parse("20.125").unwrap());
        assert!(!description.is_empty);
    }

    #[test]
    fn test_render_empty() {
        let description = Renderer::new("€").render(&CartStore::new().snapshot());
        assert!(description.lines.is_empty());
        assert_eq!(description.item_count, 0);
        assert_eq!(description.formatted_total, "€0.00");
        assert!(description.is_empty);
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = sample_store();
        let renderer = Renderer::default();
        let first = renderer.render(&store.snapshot()).to_json().unwrap();
        let second = renderer.render(&store.snapshot()).to_json().unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let description = Renderer::default().render(&sample_store().snapshot());
        let json: serde_json::Value = serde_json::from_str(&description.to_json().unwrap()).unwrap();
        assert_eq!(json["formattedTotal"], "$20.13");
        assert_eq!(json["itemCount"], 3);
        assert_eq!(json["lines"][0]["lineSubtotal"], 20.0);
        assert_eq!(json["lines"][1]["id"], "P2");
    }

    #[test]
    fn test_items_html_escapes_and_lists_lines() {
        let description = Renderer::default().render(&sample_store().snapshot());
        let html = description.items_html().unwrap();

        assert_eq!(html.matches("class=\"cart-item\"").count(), 2);
        assert!(html.contains("data-id=\"P1\" class=\"quantity-input\""));
        assert!(html.contains("value=\"2\""));
        assert!(html.contains("Vétiver &#60;Intense&#62;") || html.contains("Vétiver &lt;Intense&gt;"));
        assert!(!html.contains("<Intense>"));
        assert!(html.contains("Total: $20.13"));
        assert!(!html.contains("cart-empty"));
    }

    #[test]
    fn test_items_html_empty_cart() {
        let description = Renderer::default().render(&CartStore::new().snapshot());
        let html = description.items_html().unwrap();
        assert!(html.contains("cart-empty"));
        assert!(html.contains("Total: $0.00"));
    }

    #[test]
    fn test_count_html() {
        let description = Renderer::default().render(&sample_store().snapshot());
        assert_eq!(
            description.count_html().unwrap().trim(),
            "<span class=\"cart-count\">3</span>"
        );
    }
}
