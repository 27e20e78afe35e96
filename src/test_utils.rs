//! Record builders and store doubles for unit tests

use async_trait::async_trait;
use profitstat_core::error::{ProfitstatError, Result};
use profitstat_core::store::{MemoryStore, RecordStore};
use profitstat_core::types::{
    ISOTimestamp, ItemId, OverheadExpense, PaymentMethod, PurchaseBatch, Sale,
};

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

/// Which read a [`FailingStore`] refuses
#[derive(Debug, Clone, Copy)]
pub enum FailOn {
    Sales,
    Overhead,
    Purchases,
    /// Sales reads whose range covers this instant
    SalesCovering(ISOTimestamp),
}

/// A `MemoryStore` with one read that always errors
pub struct FailingStore {
    inner: MemoryStore,
    fail_on: FailOn,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, fail_on: FailOn) -> Self {
        Self { inner, fail_on }
    }
}

pub fn store_error() -> ProfitstatError {
    ProfitstatError::Store("connection reset".to_string())
}

pub fn is_store_error(err: &ProfitstatError) -> bool {
    matches!(err, ProfitstatError::Store(msg) if msg == "connection reset")
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn list_sales_in_range(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<Sale>> {
        match self.fail_on {
            FailOn::Sales => Err(store_error()),
            FailOn::SalesCovering(at) if *start <= at && at <= *end => Err(store_error()),
            _ => self.inner.list_sales_in_range(start, end).await,
        }
    }

    async fn list_overhead_in_range(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<OverheadExpense>> {
        match self.fail_on {
            FailOn::Overhead => Err(store_error()),
            _ => self.inner.list_overhead_in_range(start, end).await,
        }
    }

    async fn list_purchase_batches_for_item(&self, item_id: &ItemId) -> Result<Vec<PurchaseBatch>> {
        match self.fail_on {
            FailOn::Purchases => Err(store_error()),
            _ => self.inner.list_purchase_batches_for_item(item_id).await,
        }
    }
}
