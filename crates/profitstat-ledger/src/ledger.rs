//! Ledger file loading
//!
//! A ledger is one JSON object holding every record of a shop:
//!
//! ```json
//! {
//!   "items":     [{ "id": "tea", "name": "Thai iced tea", "unit": "cup" }],
//!   "purchases": [{ "itemId": "tea", "quantityPurchased": 40, "totalCost": 400,
//!                   "purchaseDate": "2024-01-01T07:00:00+07:00" }],
//!   "sales":     [{ "itemId": "tea", "quantitySold": 2, "salePricePerUnit": 25,
//!                   "saleDateTime": "2024-01-01T10:15:00+07:00", "paymentMethod": "PROMPTPAY" }],
//!   "overheads": [{ "category": "ice", "amount": 30, "expenseDate": "2024-01-01T06:00:00+07:00" }]
//! }
//! ```
//!
//! Every array is optional. Records without an `id` get a fresh UUID. A
//! `totalRevenue` present on a sale is ignored and recomputed from quantity
//! and unit price. Any invalid record fails the whole load.
//!
//! The default ledger location is `<data dir>/profitstat/ledger.json`
//! (`~/.local/share` on Linux, `~/Library/Application Support` on macOS,
//! `%APPDATA%` on Windows); `PROFITSTAT_DATA` overrides it.

use profitstat_core::error::{ProfitstatError, Result};
use profitstat_core::store::MemoryStore;
use profitstat_core::types::{
    ISOTimestamp, Item, ItemId, OverheadExpense, PaymentMethod, PurchaseBatch, RecordId, Sale,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the ledger file
pub const LEDGER_PATH_ENV: &str = "PROFITSTAT_DATA";

#[derive(Debug, Default, Deserialize)]
struct RawLedger {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    purchases: Vec<RawPurchase>,
    #[serde(default)]
    sales: Vec<RawSale>,
    #[serde(default)]
    overheads: Vec<RawOverhead>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSale {
    #[serde(default)]
    id: Option<String>,
    item_id: String,
    quantity_sold: f64,
    sale_price_per_unit: f64,
    sale_date_time: String,
    #[serde(default)]
    payment_method: PaymentMethod,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPurchase {
    #[serde(default)]
    id: Option<String>,
    item_id: String,
    quantity_purchased: f64,
    total_cost: f64,
    purchase_date: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOverhead {
    #[serde(default)]
    id: Option<String>,
    category: String,
    amount: f64,
    expense_date: String,
    #[serde(default)]
    note: Option<String>,
}

fn record_id(id: Option<String>) -> RecordId {
    id.map(RecordId::new).unwrap_or_else(RecordId::generate)
}

impl RawSale {
    fn into_sale(self) -> Result<Sale> {
        let sale = Sale::with_id(
            record_id(self.id),
            ItemId::new(self.item_id),
            self.quantity_sold,
            self.sale_price_per_unit,
            ISOTimestamp::parse(&self.sale_date_time)?,
            self.payment_method,
        )?;
        Ok(Sale {
            note: self.note,
            ..sale
        })
    }
}

impl RawPurchase {
    fn into_batch(self) -> Result<PurchaseBatch> {
        let batch = PurchaseBatch::with_id(
            record_id(self.id),
            ItemId::new(self.item_id),
            self.quantity_purchased,
            self.total_cost,
            ISOTimestamp::parse(&self.purchase_date)?,
        )?;
        Ok(PurchaseBatch {
            note: self.note,
            ..batch
        })
    }
}

impl RawOverhead {
    fn into_expense(self) -> Result<OverheadExpense> {
        let expense = OverheadExpense::with_id(
            record_id(self.id),
            self.category,
            self.amount,
            ISOTimestamp::parse(&self.expense_date)?,
        )?;
        Ok(OverheadExpense {
            note: self.note,
            ..expense
        })
    }
}

/// A ledger file on disk
#[derive(Debug, Clone)]
pub struct JsonLedger {
    path: PathBuf,
}

impl JsonLedger {
    /// Ledger at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger at the path from `PROFITSTAT_DATA`, or the platform default
    pub fn discover() -> Result<Self> {
        if let Ok(custom) = std::env::var(LEDGER_PATH_ENV) {
            debug!("Using ledger path from {}: {}", LEDGER_PATH_ENV, custom);
            return Ok(Self::new(custom));
        }

        Self::default_path().map(Self::new).ok_or_else(|| {
            ProfitstatError::Config(format!(
                "could not determine a data directory; pass --data or set {LEDGER_PATH_ENV}"
            ))
        })
    }

    /// `<data dir>/profitstat/ledger.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("profitstat").join("ledger.json"))
    }

    /// Path of this ledger
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the ledger into an in-memory store
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Ledger` if it is not a
    /// valid ledger document or contains an invalid record
    pub async fn load(&self) -> Result<MemoryStore> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let store = Self::parse(&content, &self.path)?;
        info!("Loaded ledger from {}", self.path.display());
        Ok(store)
    }

    /// Parse ledger JSON; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<MemoryStore> {
        let ledger_error = |error: String| ProfitstatError::Ledger {
            file: path.to_path_buf(),
            error,
        };

        let raw: RawLedger =
            serde_json::from_str(content).map_err(|e| ledger_error(e.to_string()))?;

        for item in &raw.items {
            item.validate().map_err(|e| ledger_error(e.to_string()))?;
        }

        let sales = raw
            .sales
            .into_iter()
            .map(RawSale::into_sale)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| ledger_error(e.to_string()))?;
        let purchases = raw
            .purchases
            .into_iter()
            .map(RawPurchase::into_batch)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| ledger_error(e.to_string()))?;
        let overheads = raw
            .overheads
            .into_iter()
            .map(RawOverhead::into_expense)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| ledger_error(e.to_string()))?;

        let purchased: BTreeSet<&ItemId> = purchases.iter().map(|b| &b.item_id).collect();
        let unpriced: BTreeSet<&ItemId> = sales
            .iter()
            .map(|s| &s.item_id)
            .filter(|id| !purchased.contains(id))
            .collect();
        for item_id in unpriced {
            warn!(
                "{}: item '{}' has sales but no purchases; its cost basis is 0",
                path.display(),
                item_id
            );
        }

        debug!(
            "Parsed ledger: {} items, {} sales, {} purchases, {} overheads",
            raw.items.len(),
            sales.len(),
            purchases.len(),
            overheads.len()
        );

        Ok(MemoryStore::from_records(raw.items, sales, purchases, overheads))
    }
}
