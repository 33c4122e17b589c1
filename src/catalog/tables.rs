//! Fixed reference tables: unit prices and average yields per variety.

use std::collections::BTreeMap;

use crate::errors::{OrchardError, Result};

use super::variety::VARIETY_COLUMNS;

const STANDARD_PRICES: [(&str, f64); 3] = [("Ambrosia", 1.20), ("Elberta", 1.20), ("Lapins", 2.99)];

const AVERAGE_YIELDS: [(&str, f64); 9] = [
    ("Ambrosia", 1500.0),
    ("Gala", 1200.0),
    ("Honeycrisp", 1800.0),
    ("Lapins", 1000.0),
    ("Sweetheart", 2500.0),
    ("Skeena", 3500.0),
    ("Redhaven", 2000.0),
    ("Elberta", 1800.0),
    ("Cresthaven", 2200.0),
];

/// Planted area the capacity estimate is based on.
pub const PLANNED_AREAS: [(&str, f64); 3] =
    [("Ambrosia", 20.0), ("Lapins", 40.0), ("Elberta", 40.0)];

/// Unit price per variety used to value orders.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn new(prices: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new(
            STANDARD_PRICES
                .iter()
                .map(|(name, price)| (name.to_string(), *price)),
        )
    }

    /// A miss here is a configuration error, not bad input.
    pub fn price(&self, variety: &str) -> Result<f64> {
        self.prices
            .get(variety)
            .copied()
            .ok_or_else(|| OrchardError::Unpriced(variety.to_string()))
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Average yield per unit of planted area.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldTable {
    yields: BTreeMap<String, f64>,
}

impl YieldTable {
    pub fn standard() -> Self {
        Self {
            yields: AVERAGE_YIELDS
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    pub fn average_yield(&self, variety: &str) -> f64 {
        self.yields.get(variety).copied().unwrap_or(0.0)
    }

    /// Total production per ledger column: planted area times average yield.
    pub fn estimate_capacity(&self, areas: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
        VARIETY_COLUMNS
            .iter()
            .map(|variety| {
                let area = areas.get(*variety).copied().unwrap_or(0.0);
                (variety.to_string(), area * self.average_yield(variety))
            })
            .collect()
    }

    pub fn estimate_planned_capacity(&self) -> BTreeMap<String, f64> {
        let areas = PLANNED_AREAS
            .iter()
            .map(|(name, area)| (name.to_string(), *area))
            .collect();
        self.estimate_capacity(&areas)
    }
}

impl Default for YieldTable {
    fn default() -> Self {
        Self::standard()
    }
}
