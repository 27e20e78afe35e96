//! Common test utilities for profitstat integration tests
//!
//! Record builders, a store pre-loaded with a small shop's week, and a
//! helper for writing ledger files to a temp directory.

#![allow(dead_code)]

use profitstat::analytics::ProfitAnalytics;
use profitstat_core::store::MemoryStore;
use profitstat_core::timezone::TimezoneConfig;
use profitstat_core::types::{
    ISOTimestamp, Item, ItemId, OverheadExpense, PaymentMethod, PurchaseBatch, Sale,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub fn ts(s: &str) -> ISOTimestamp {
    ISOTimestamp::parse(s).unwrap()
}

/// Builder for test sales
pub struct SaleBuilder {
    item_id: String,
    quantity: f64,
    price: f64,
    at: String,
    payment_method: PaymentMethod,
}

impl SaleBuilder {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            quantity: 1.0,
            price: 10.0,
            at: "2024-01-15T12:00:00Z".to_string(),
            payment_method: PaymentMethod::Cash,
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn at(mut self, at: &str) -> Self {
        self.at = at.to_string();
        self
    }

    pub fn paid_by(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    pub fn build(self) -> Sale {
        Sale::new(
            ItemId::new(self.item_id),
            self.quantity,
            self.price,
            ts(&self.at),
            self.payment_method,
        )
        .unwrap()
    }
}

pub fn purchase(item: &str, quantity: f64, cost: f64, at: &str) -> PurchaseBatch {
    PurchaseBatch::new(ItemId::new(item), quantity, cost, ts(at)).unwrap()
}

pub fn overhead(category: &str, amount: f64, at: &str) -> OverheadExpense {
    OverheadExpense::new(category, amount, ts(at)).unwrap()
}

/// Week of 2024-01-14 (Sunday) through 2024-01-20 (Saturday), UTC
///
/// - tea costs 5 per cup (two batches averaging out), rice costs 10 per bag
/// - Monday: three sales between 08:00 and 10:00
/// - Wednesday: one sale at 15:30
/// - Friday: one sale at 08:45 sold below cost
/// - overhead: 20 on Monday, 10 on Friday
pub async fn sample_week_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    store.insert_item(Item::new(ItemId::new("tea"), "Thai iced tea", "cup")).await;
    store.insert_item(Item::new(ItemId::new("rice"), "Sticky rice", "bag")).await;

    store.insert_purchase(purchase("tea", 10.0, 40.0, "2024-01-01T07:00:00Z")).await;
    store.insert_purchase(purchase("tea", 10.0, 60.0, "2024-01-08T07:00:00Z")).await;
    store.insert_purchase(purchase("rice", 5.0, 50.0, "2024-01-01T07:00:00Z")).await;

    for sale in [
        SaleBuilder::new("tea").quantity(2.0).price(20.0).at("2024-01-15T08:10:00Z"),
        SaleBuilder::new("rice").quantity(1.0).price(30.0).at("2024-01-15T08:50:00Z"),
        SaleBuilder::new("tea").quantity(1.0).price(20.0).at("2024-01-15T09:30:00Z"),
        SaleBuilder::new("rice").quantity(2.0).price(25.0).at("2024-01-17T15:30:00Z"),
        SaleBuilder::new("rice").quantity(1.0).price(5.0).at("2024-01-19T08:45:00Z"),
    ] {
        store.insert_sale(sale.build()).await;
    }

    store.insert_overhead(overhead("rent", 20.0, "2024-01-15T06:00:00Z")).await;
    store.insert_overhead(overhead("ice", 10.0, "2024-01-19T06:00:00Z")).await;

    store
}

pub fn utc_analytics(store: Arc<MemoryStore>) -> ProfitAnalytics {
    ProfitAnalytics::new(store, TimezoneConfig::utc())
}

/// Write `content` as a ledger file in a fresh temp directory
pub fn write_ledger(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
