//! Sales order ledger: selling draws down inventory, picking draws down capacity.

pub mod book;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use book::{OrderBook, StockCheck};

use crate::{catalog::Category, errors::OrchardError};

/// Rounds a monetary amount half away from zero to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Harvested stock sold from inventory.
    Selling,
    /// Customers pick directly from the trees.
    Picking,
}

impl OrderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderKind::Selling => "selling",
            OrderKind::Picking => "picking",
        }
    }
}

impl FromStr for OrderKind {
    type Err = OrchardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "selling" => Ok(OrderKind::Selling),
            "picking" => Ok(OrderKind::Picking),
            other => Err(OrchardError::UnknownSalesType(other.to_string())),
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `orders.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub index: u64,
    #[serde(rename = "sales_type")]
    pub kind: OrderKind,
    #[serde(rename = "fruit_type")]
    pub category: Category,
    #[serde(rename = "fruit_variety")]
    pub variety: String,
    pub weight: f64,
    pub unit_price: f64,
    pub revenue: f64,
}

/// Column revenue totals are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    SalesType,
    FruitType,
}

impl GroupKey {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKey::SalesType => "sales_type",
            GroupKey::FruitType => "fruit_type",
        }
    }

    pub(crate) fn key_of(self, order: &OrderRecord) -> String {
        match self {
            GroupKey::SalesType => order.kind.as_str().to_string(),
            GroupKey::FruitType => order.category.number().to_string(),
        }
    }
}

impl FromStr for GroupKey {
    type Err = OrchardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "sales_type" => Ok(GroupKey::SalesType),
            "fruit_type" => Ok(GroupKey::FruitType),
            other => Err(OrchardError::UnknownGroupKey(other.to_string())),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueGroup {
    pub key: String,
    pub revenue: f64,
}
