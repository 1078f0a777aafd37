//! Whole page sessions driven through the event bridge.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use atelier_cart::bridge::{CheckoutFlow, EventBridge, Intent, Notice};
use atelier_cart::config::CartConfig;
use atelier_cart::storage::{FileStorage, MemoryStorage, SnapshotStorage};
use atelier_cart::store::ProductDescriptor;
use atelier_cart_core::{Money, ProductId};

fn product(id: &str, price: &str) -> ProductDescriptor {
    ProductDescriptor::new(
        id,
        format!("Eau de Parfum {id}"),
        Money::parse(price).unwrap(),
        format!("images/{id}.webp"),
    )
}

fn card(id: &str, price: &str) -> HashMap<String, String> {
    HashMap::from([
        ("id".to_string(), id.to_string()),
        ("name".to_string(), format!("Card {id}")),
        ("price".to_string(), price.to_string()),
        ("image".to_string(), format!("{id}.jpg")),
    ])
}

#[test]
fn cart_survives_page_reload() {
    let dir = tempfile::tempdir().unwrap();
    let config = CartConfig::default();

    let mut first = EventBridge::open(FileStorage::new(dir.path()), &config);
    assert!(first.initial_render().is_empty);
    first.dispatch(Intent::AddToCart(product("P1", "10")));
    first.dispatch(Intent::AddToCart(product("P1", "10")));
    first.dispatch_dataset(&card("P2", "24.99"));
    let before = first.dispatch(Intent::QuantityChanged {
        id: ProductId::new("P2"),
        raw: "3".to_string(),
    });
    drop(first.close());

    let mut second = EventBridge::open(FileStorage::new(dir.path()), &config);
    let after = second.initial_render();

    assert_eq!(after, before.render);
    assert_eq!(after.item_count, 5);
    assert_eq!(after.formatted_total, "$94.97");
}

#[test]
fn malformed_snapshot_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path());
    storage.write("cart", "{{ definitely not json").unwrap();

    let mut bridge = EventBridge::open(storage, &CartConfig::default());
    assert!(bridge.initial_render().is_empty);

    bridge.dispatch(Intent::AddToCart(product("P1", "5")));
    let storage = bridge.close();
    let raw = storage.read("cart").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], "P1");
    assert_eq!(json[0]["quantity"], 1);
}

#[test]
fn legacy_page_script_snapshot_is_restored() {
    let legacy = r#"[
        {"id":"1","name":"Midnight Oud","price":120,"image":"images/oud.jpg","quantity":1},
        {"id":"4","name":"Citrus Bloom","price":65.5,"image":"images/citrus.jpg","quantity":2}
    ]"#;
    let storage = MemoryStorage::new().with_slot("cart", legacy);
    let mut bridge = EventBridge::open(storage, &CartConfig::default());

    let render = bridge.initial_render();
    assert_eq!(render.item_count, 3);
    assert_eq!(render.formatted_total, "$251.00");
    assert_eq!(render.lines[1].name, "Citrus Bloom");
    assert_eq!(render.lines[1].image_ref, "images/citrus.jpg");
}

#[test]
fn full_checkout_journey() {
    let mut bridge = EventBridge::open(MemoryStorage::new(), &CartConfig::default());

    let blocked = bridge.dispatch(Intent::BeginCheckout);
    assert_eq!(blocked.notice, Some(Notice::EmptyCart));
    assert_eq!(blocked.flow, CheckoutFlow::Browsing);

    bridge.dispatch(Intent::AddToCart(product("P1", "10")));
    bridge.dispatch(Intent::AddToCart(product("P2", "15")));
    bridge.dispatch(Intent::QuantityChanged {
        id: ProductId::new("P1"),
        raw: "seven".to_string(),
    });
    let removed = bridge.dispatch(Intent::QuantityChanged {
        id: ProductId::new("P2"),
        raw: "0".to_string(),
    });
    assert_eq!(removed.render.lines.len(), 1);

    assert_eq!(
        bridge.dispatch(Intent::BeginCheckout).flow,
        CheckoutFlow::CheckingOut
    );
    let done = bridge.dispatch(Intent::ConfirmCheckout);
    assert_eq!(done.notice, Some(Notice::PaymentSuccessful));
    assert_eq!(done.render.item_count, 0);
    assert_eq!(done.render.formatted_total, "$0.00");
    assert!(bridge.store().is_empty());

    let storage = bridge.close();
    assert_eq!(storage.get("cart"), Some("[]"));
}

#[test]
fn html_fragments_follow_each_dispatch() {
    let mut bridge = EventBridge::open(MemoryStorage::new(), &CartConfig::default());
    let dispatch = bridge.dispatch_dataset(&card("P9", "49.5"));

    let items = dispatch.render.items_html().unwrap();
    assert!(items.contains("Card P9"));
    assert!(items.contains("$49.50 x"));
    assert!(items.contains("class=\"remove-item\" data-id=\"P9\""));
    assert!(dispatch.render.count_html().unwrap().contains(">1<"));
}

#[test]
fn currency_symbol_comes_from_config() {
    let config = CartConfig {
        currency_symbol: "€".to_string(),
        ..CartConfig::default()
    };
    let mut bridge = EventBridge::open(MemoryStorage::new(), &config);
    let dispatch = bridge.dispatch(Intent::AddToCart(product("P1", "7.5")));
    assert_eq!(dispatch.render.formatted_total, "€7.50");
}
