//! JSON ledger support for profitstat
//!
//! This crate reads a shop's records from a single JSON ledger file and
//! exposes them through the `RecordStore` trait.

pub mod ledger;

pub use ledger::JsonLedger;
