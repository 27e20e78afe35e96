//! Shared test utilities for unit tests
//!
//! Integration tests (in tests/) cannot see this module because it is
//! compiled only under `#[cfg(test)]`; they keep their own helpers in
//! tests/common/mod.rs.

use crate::types::{ISOTimestamp, ItemId, OverheadExpense, PaymentMethod, PurchaseBatch, Sale};
use once_cell::sync::Lazy;
use std::env;

// Serializes environment variable modifications across tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// RAII guard restoring environment variables on drop
pub struct EnvVarGuard {
    vars: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set an environment variable, remembering its previous value
    pub fn set(&mut self, key: &str, value: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        // env::set_var is unsafe since Rust 2024
        unsafe {
            env::set_var(key, value);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.vars.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

impl Default for EnvVarGuard {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ts(s: &str) -> ISOTimestamp {
    ISOTimestamp::parse(s).unwrap()
}

pub fn sale(item: &str, quantity: f64, price: f64, at: &str) -> Sale {
    Sale::new(ItemId::new(item), quantity, price, ts(at), PaymentMethod::Cash).unwrap()
}

pub fn purchase(item: &str, quantity: f64, cost: f64, at: &str) -> PurchaseBatch {
    PurchaseBatch::new(ItemId::new(item), quantity, cost, ts(at)).unwrap()
}

pub fn overhead(category: &str, amount: f64, at: &str) -> OverheadExpense {
    OverheadExpense::new(category, amount, ts(at)).unwrap()
}
