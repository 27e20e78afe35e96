//! Average unit cost estimation
//!
//! An item's unit cost is the weighted average over its entire purchase
//! history: total spent divided by total quantity bought. There is no FIFO
//! or LIFO layering and no time window.
//!
//! # Caching contract
//!
//! Computed costs are cached per item for a fixed time-to-live (60 seconds by
//! default). A lookup inside the TTL is served from the cache without reading
//! the store, so a purchase recorded after the value was cached stays
//! invisible until the entry expires or is invalidated. The estimator never
//! invalidates on its own: **any code that adds, edits, or deletes purchase
//! batches must call [`CostEstimator::invalidate`]** for the affected item
//! (or `None` to clear everything) once the write has landed.
//!
//! # Examples
//!
//! ```
//! use profitstat_core::store::MemoryStore;
//! use profitstat_core::types::{ISOTimestamp, ItemId, PurchaseBatch};
//! use profitstat_costing::CostEstimator;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let at = ISOTimestamp::parse("2024-01-01T08:00:00Z").unwrap();
//! let rice = ItemId::new("rice");
//! store.insert_purchase(PurchaseBatch::new(rice.clone(), 10.0, 100.0, at).unwrap()).await;
//! store.insert_purchase(PurchaseBatch::new(rice.clone(), 10.0, 200.0, at).unwrap()).await;
//!
//! let estimator = CostEstimator::new(store.clone());
//! assert_eq!(estimator.average_unit_cost(&rice).await.unwrap(), 15.0);
//!
//! // After writing purchases, invalidate the item
//! store.insert_purchase(PurchaseBatch::new(rice.clone(), 10.0, 0.0, at).unwrap()).await;
//! estimator.invalidate(Some(&rice)).await;
//! assert_eq!(estimator.average_unit_cost(&rice).await.unwrap(), 10.0);
//! # });
//! ```

use profitstat_core::error::Result;
use profitstat_core::store::RecordStore;
use profitstat_core::types::{ItemId, PurchaseBatch, Sale};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Default lifetime of a cached average cost
pub const DEFAULT_COST_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct CachedCost {
    value: f64,
    computed_at: Instant,
}

/// Computes per-item average unit costs from purchase history
pub struct CostEstimator {
    /// Store the purchase batches are read from
    store: Arc<dyn RecordStore>,
    /// Cached costs keyed by item
    cache: RwLock<HashMap<ItemId, CachedCost>>,
    /// Maximum age of a cached value
    ttl: Duration,
}

impl CostEstimator {
    /// Create an estimator with the default 60 second TTL
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
            ttl: DEFAULT_COST_CACHE_TTL,
        }
    }

    /// Override the cache TTL. A zero TTL disables caching.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The configured cache TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Average unit cost of an item, served from the cache when fresh
    ///
    /// Returns 0 for items with no purchases or zero total quantity.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if reading purchase batches fails
    pub async fn average_unit_cost(&self, item_id: &ItemId) -> Result<f64> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(item_id)
                && entry.computed_at.elapsed() < self.ttl
            {
                debug!("Average cost cache hit for item {}", item_id);
                return Ok(entry.value);
            }
        }

        let batches = self.store.list_purchase_batches_for_item(item_id).await?;
        let value = Self::average_from_batches(&batches);
        debug!(
            "Computed average cost {:.4} for item {} from {} purchase batches",
            value,
            item_id,
            batches.len()
        );

        // Concurrent misses for the same item may both land here; the entry
        // is replaced whole, so readers never see a mixed value.
        self.cache.write().await.insert(
            item_id.clone(),
            CachedCost {
                value,
                computed_at: Instant::now(),
            },
        );

        Ok(value)
    }

    /// Weighted average cost over a set of batches, without caching
    ///
    /// `sum(total_cost) / sum(quantity_purchased)`, or 0 when there are no
    /// batches or the summed quantity is zero.
    pub fn average_from_batches(batches: &[PurchaseBatch]) -> f64 {
        let (total_cost, total_quantity) = batches
            .iter()
            .fold((0.0, 0.0), |(cost, qty), b| {
                (cost + b.total_cost, qty + b.quantity_purchased)
            });

        if total_quantity == 0.0 {
            0.0
        } else {
            total_cost / total_quantity
        }
    }

    /// Cost of goods sold for one sale: quantity times average unit cost
    pub async fn cogs_for_sale(&self, sale: &Sale) -> Result<f64> {
        let unit_cost = self.average_unit_cost(&sale.item_id).await?;
        Ok(sale.quantity_sold * unit_cost)
    }

    /// Gross profit of one sale: revenue minus its cost of goods sold
    pub async fn gross_profit_for_sale(&self, sale: &Sale) -> Result<f64> {
        let cogs = self.cogs_for_sale(sale).await?;
        Ok(sale.total_revenue - cogs)
    }

    /// Drop cached costs: one item, or every item when `None`
    pub async fn invalidate(&self, item_id: Option<&ItemId>) {
        let mut cache = self.cache.write().await;
        match item_id {
            Some(id) => {
                cache.remove(id);
                debug!("Invalidated average cost cache for item {}", id);
            }
            None => {
                cache.clear();
                debug!("Cleared average cost cache");
            }
        }
    }

    /// Number of items currently cached (fresh or expired)
    pub async fn cached_entries(&self) -> usize {
        self.cache.read().await.len()
    }
}
