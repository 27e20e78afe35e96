//! Core domain types for profitstat
//!
//! This module contains the record types the analytics consume: items, sales,
//! purchase batches and overhead expenses, along with strongly-typed wrappers
//! for identifiers, timestamps and calendar dates.

use crate::error::{ProfitstatError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Strongly-typed item identifier
///
/// # Examples
/// ```
/// use profitstat_core::types::ItemId;
///
/// let item = ItemId::new("mango-sticky-rice");
/// assert_eq!(item.as_str(), "mango-sticky-rice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new ItemId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a stored record (sale, purchase batch, overhead expense)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new RecordId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random (UUID v4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO timestamp wrapper for UTC instants
///
/// Records carry their times as RFC 3339 strings in storage; inside the
/// crates they are always UTC instants so that range comparisons are exact.
///
/// # Examples
/// ```
/// use profitstat_core::types::ISOTimestamp;
///
/// let ts = ISOTimestamp::parse("2024-03-04T09:15:00+07:00").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-03-04T02:15:00.000Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ISOTimestamp(DateTime<Utc>);

impl ISOTimestamp {
    /// Create a new ISOTimestamp
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an RFC 3339 / ISO-8601 string with offset
    pub fn parse(s: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| ProfitstatError::InvalidDate(format!("'{s}': {e}")))
    }

    /// Current instant
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner DateTime
    pub fn inner(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Format as RFC 3339 with millisecond precision and a `Z` suffix
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }

    /// Whether this instant falls inside `[start, end]`
    pub fn is_within(&self, start: &ISOTimestamp, end: &ISOTimestamp) -> bool {
        self >= start && self <= end
    }
}

impl AsRef<DateTime<Utc>> for ISOTimestamp {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for ISOTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

/// Calendar date without time information
///
/// # Examples
/// ```
/// use profitstat_core::types::DailyDate;
/// use chrono::NaiveDate;
///
/// let daily = DailyDate::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// assert_eq!(daily.format("%Y-%m-%d"), "2024-01-15");
/// assert_eq!(daily.short_label(), "01/15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Create a new DailyDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }

    /// Short `MM/DD` label used on chart axes
    pub fn short_label(&self) -> String {
        self.format("%m/%d")
    }
}

/// How a sale was paid for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Cash at the counter
    #[default]
    Cash,
    /// PromptPay QR transfer
    PromptPay,
    /// Anything else
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "CASH"),
            Self::PromptPay => write!(f, "PROMPTPAY"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// A product the shop sells
///
/// Items only provide display names; no analytics depend on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub default_sale_price: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<ISOTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<ISOTimestamp>,
}

impl Item {
    /// Create a new item with a display name and unit
    pub fn new(id: ItemId, name: impl Into<String>, unit: impl Into<String>) -> Self {
        let now = ISOTimestamp::now();
        Self {
            id,
            name: name.into(),
            category: None,
            default_sale_price: 0.0,
            unit: unit.into(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Check the rules deserialization cannot express: the default price must not be negative
    pub fn validate(&self) -> Result<()> {
        if !(self.default_sale_price >= 0.0) {
            return Err(ProfitstatError::InvalidRecord(format!(
                "item {}: default sale price must not be negative, got {}",
                self.id, self.default_sale_price
            )));
        }
        Ok(())
    }
}

/// A single sale of one item
///
/// `total_revenue` is fixed at construction as `quantity_sold * sale_price_per_unit`
/// and never recomputed afterwards.
///
/// # Examples
/// ```
/// use profitstat_core::types::{ISOTimestamp, ItemId, PaymentMethod, Sale};
///
/// let sale = Sale::new(
///     ItemId::new("iced-tea"),
///     5.0,
///     20.0,
///     ISOTimestamp::parse("2024-01-15T10:30:00Z").unwrap(),
///     PaymentMethod::Cash,
/// )
/// .unwrap();
/// assert_eq!(sale.total_revenue, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: RecordId,
    pub item_id: ItemId,
    pub quantity_sold: f64,
    pub sale_price_per_unit: f64,
    pub total_revenue: f64,
    pub sale_date_time: ISOTimestamp,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Sale {
    /// Create a sale with a fresh id, computing its revenue
    pub fn new(
        item_id: ItemId,
        quantity_sold: f64,
        sale_price_per_unit: f64,
        sale_date_time: ISOTimestamp,
        payment_method: PaymentMethod,
    ) -> Result<Self> {
        Self::with_id(
            RecordId::generate(),
            item_id,
            quantity_sold,
            sale_price_per_unit,
            sale_date_time,
            payment_method,
        )
    }

    /// Create a sale with a known id, computing its revenue
    pub fn with_id(
        id: RecordId,
        item_id: ItemId,
        quantity_sold: f64,
        sale_price_per_unit: f64,
        sale_date_time: ISOTimestamp,
        payment_method: PaymentMethod,
    ) -> Result<Self> {
        if !(quantity_sold > 0.0) {
            return Err(ProfitstatError::InvalidRecord(format!(
                "sale {id}: quantity sold must be positive, got {quantity_sold}"
            )));
        }
        if !(sale_price_per_unit >= 0.0) {
            return Err(ProfitstatError::InvalidRecord(format!(
                "sale {id}: price per unit must not be negative, got {sale_price_per_unit}"
            )));
        }

        Ok(Self {
            id,
            item_id,
            quantity_sold,
            sale_price_per_unit,
            total_revenue: quantity_sold * sale_price_per_unit,
            sale_date_time,
            payment_method,
            note: None,
        })
    }
}

/// One restocking event for an item; the only source of cost-basis data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBatch {
    pub id: RecordId,
    pub item_id: ItemId,
    pub quantity_purchased: f64,
    pub total_cost: f64,
    pub purchase_date: ISOTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PurchaseBatch {
    /// Create a purchase batch with a fresh id
    pub fn new(
        item_id: ItemId,
        quantity_purchased: f64,
        total_cost: f64,
        purchase_date: ISOTimestamp,
    ) -> Result<Self> {
        Self::with_id(
            RecordId::generate(),
            item_id,
            quantity_purchased,
            total_cost,
            purchase_date,
        )
    }

    /// Create a purchase batch with a known id
    pub fn with_id(
        id: RecordId,
        item_id: ItemId,
        quantity_purchased: f64,
        total_cost: f64,
        purchase_date: ISOTimestamp,
    ) -> Result<Self> {
        if !(quantity_purchased > 0.0) {
            return Err(ProfitstatError::InvalidRecord(format!(
                "purchase {id}: quantity purchased must be positive, got {quantity_purchased}"
            )));
        }
        if !(total_cost >= 0.0) {
            return Err(ProfitstatError::InvalidRecord(format!(
                "purchase {id}: total cost must not be negative, got {total_cost}"
            )));
        }

        Ok(Self {
            id,
            item_id,
            quantity_purchased,
            total_cost,
            purchase_date,
            note: None,
        })
    }
}

/// A running cost of the business not tied to any item (rent, gas, ice, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadExpense {
    pub id: RecordId,
    pub category: String,
    pub amount: f64,
    pub expense_date: ISOTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OverheadExpense {
    /// Create an overhead expense with a fresh id
    pub fn new(category: impl Into<String>, amount: f64, expense_date: ISOTimestamp) -> Result<Self> {
        Self::with_id(RecordId::generate(), category, amount, expense_date)
    }

    /// Create an overhead expense with a known id
    pub fn with_id(
        id: RecordId,
        category: impl Into<String>,
        amount: f64,
        expense_date: ISOTimestamp,
    ) -> Result<Self> {
        if !(amount >= 0.0) {
            return Err(ProfitstatError::InvalidRecord(format!(
                "overhead {id}: amount must not be negative, got {amount}"
            )));
        }

        Ok(Self {
            id,
            category: category.into(),
            amount,
            expense_date,
            note: None,
        })
    }
}
