//! Record store trait and in-memory implementation
//!
//! The analytics only ever read. [`RecordStore`] is the read surface they
//! consume; any persistence layer (SQLite, a ledger file, a remote API)
//! implements it. Whatever error a store returns is passed through the
//! analytics unchanged.
//!
//! All range queries are inclusive on both ends and compare UTC instants. No
//! timezone handling happens here: callers supply bounds already aligned to
//! the local day, week or month they want.

use crate::error::Result;
use crate::types::{ISOTimestamp, Item, ItemId, OverheadExpense, PurchaseBatch, RecordId, Sale};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Read access to the shop's records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Sales with `sale_date_time` in `[start, end]`
    async fn list_sales_in_range(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<Sale>>;

    /// Overhead expenses with `expense_date` in `[start, end]`
    async fn list_overhead_in_range(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<OverheadExpense>>;

    /// Every purchase batch ever recorded for an item
    async fn list_purchase_batches_for_item(&self, item_id: &ItemId) -> Result<Vec<PurchaseBatch>>;
}

#[derive(Debug, Default)]
struct Records {
    items: Vec<Item>,
    sales: Vec<Sale>,
    purchases: Vec<PurchaseBatch>,
    overheads: Vec<OverheadExpense>,
}

/// Record store held entirely in memory
///
/// Used by tests, benchmarks, and the CLI (which loads a ledger file into it).
/// Writers that add or remove purchase batches must invalidate any cost
/// estimator cache reading from this store; the store itself knows nothing
/// about caches.
///
/// # Examples
///
/// ```
/// use profitstat_core::store::{MemoryStore, RecordStore};
/// use profitstat_core::types::{ISOTimestamp, ItemId, PurchaseBatch};
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// let at = ISOTimestamp::parse("2024-01-01T08:00:00Z").unwrap();
/// store
///     .insert_purchase(PurchaseBatch::new(ItemId::new("rice"), 10.0, 100.0, at).unwrap())
///     .await;
///
/// let batches = store
///     .list_purchase_batches_for_item(&ItemId::new("rice"))
///     .await
///     .unwrap();
/// assert_eq!(batches.len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from pre-validated record sets
    pub fn from_records(
        items: Vec<Item>,
        sales: Vec<Sale>,
        purchases: Vec<PurchaseBatch>,
        overheads: Vec<OverheadExpense>,
    ) -> Self {
        Self {
            records: RwLock::new(Records {
                items,
                sales,
                purchases,
                overheads,
            }),
        }
    }

    pub async fn insert_item(&self, item: Item) {
        self.records.write().await.items.push(item);
    }

    pub async fn insert_sale(&self, sale: Sale) {
        self.records.write().await.sales.push(sale);
    }

    pub async fn insert_purchase(&self, batch: PurchaseBatch) {
        self.records.write().await.purchases.push(batch);
    }

    pub async fn insert_overhead(&self, expense: OverheadExpense) {
        self.records.write().await.overheads.push(expense);
    }

    /// Remove a sale; returns whether it existed
    pub async fn delete_sale(&self, id: &RecordId) -> bool {
        let mut records = self.records.write().await;
        let before = records.sales.len();
        records.sales.retain(|s| &s.id != id);
        records.sales.len() != before
    }

    /// Remove a purchase batch, returning it if it existed
    pub async fn delete_purchase(&self, id: &RecordId) -> Option<PurchaseBatch> {
        let mut records = self.records.write().await;
        let index = records.purchases.iter().position(|p| &p.id == id)?;
        Some(records.purchases.remove(index))
    }

    /// Remove an overhead expense; returns whether it existed
    pub async fn delete_overhead(&self, id: &RecordId) -> bool {
        let mut records = self.records.write().await;
        let before = records.overheads.len();
        records.overheads.retain(|o| &o.id != id);
        records.overheads.len() != before
    }

    /// All items, in insertion order
    pub async fn items(&self) -> Vec<Item> {
        self.records.read().await.items.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_sales_in_range(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<Sale>> {
        let records = self.records.read().await;
        let mut sales: Vec<Sale> = records
            .sales
            .iter()
            .filter(|s| s.sale_date_time.is_within(start, end))
            .cloned()
            .collect();
        sales.sort_by_key(|s| s.sale_date_time);
        Ok(sales)
    }

    async fn list_overhead_in_range(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<OverheadExpense>> {
        let records = self.records.read().await;
        let mut overheads: Vec<OverheadExpense> = records
            .overheads
            .iter()
            .filter(|o| o.expense_date.is_within(start, end))
            .cloned()
            .collect();
        overheads.sort_by_key(|o| o.expense_date);
        Ok(overheads)
    }

    async fn list_purchase_batches_for_item(&self, item_id: &ItemId) -> Result<Vec<PurchaseBatch>> {
        let records = self.records.read().await;
        Ok(records
            .purchases
            .iter()
            .filter(|p| &p.item_id == item_id)
            .cloned()
            .collect())
    }
}
