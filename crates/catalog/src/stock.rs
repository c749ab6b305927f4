//! Stock ledger operation and stock status classifier.
//!
//! The only business rules in this system with real edge-case policy. Both
//! are pure functions over plain integers so they can back the write path,
//! the list filters, and the dashboard without drifting apart.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult};

/// A requested mutation of a product's on-hand quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Add,
    Subtract,
    Set,
}

impl StockOperation {
    /// Apply the operation to the current quantity.
    ///
    /// `subtract` clamps at zero; `set` intentionally does not (callers may
    /// write any integer, negative included). The asymmetry is inherited
    /// behavior and pinned by tests below.
    pub fn apply(self, current: i64, amount: i64) -> i64 {
        match self {
            StockOperation::Add => current + amount,
            StockOperation::Subtract => (current - amount).max(0),
            StockOperation::Set => amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockOperation::Add => "add",
            StockOperation::Subtract => "subtract",
            StockOperation::Set => "set",
        }
    }
}

impl FromStr for StockOperation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(StockOperation::Add),
            "subtract" => Ok(StockOperation::Subtract),
            "set" => Ok(StockOperation::Set),
            other => Err(DomainError::invalid_operation(other)),
        }
    }
}

/// Parse an operation token and apply it in one step.
///
/// An unrecognized token fails with [`DomainError::InvalidOperation`] and no
/// new quantity is produced, so callers cannot accidentally persist anything.
pub fn apply_stock_operation(current: i64, operation: &str, amount: i64) -> DomainResult<i64> {
    let op: StockOperation = operation.parse()?;
    Ok(op.apply(current, amount))
}

/// Advisory stock status derived from quantity and the configured minimum.
///
/// Never written back to a product's lifecycle `status` field; it exists for
/// display and for the low-stock filters/counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    LowStock,
    InStock,
}

/// Classify a quantity against its minimum-stock threshold.
///
/// Empty stock wins over the threshold check, so a product with
/// `min_stock == 0` and nothing on hand still reads as out of stock. The
/// low-stock boundary is inclusive. Quantities below zero (reachable via a
/// negative `set`) classify as out of stock.
pub fn classify_stock(quantity: i64, min_stock: i64) -> StockLevel {
    if quantity <= 0 {
        StockLevel::OutOfStock
    } else if quantity <= min_stock {
        StockLevel::LowStock
    } else {
        StockLevel::InStock
    }
}
