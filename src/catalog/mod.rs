//! Static reference data: fruit varieties, seasons, prices, yields, and planting regions.

pub mod region;
pub mod tables;
pub mod variety;

use chrono::{Datelike, NaiveDate};

pub use region::{AreaType, Plantation, Region};
pub use tables::{PriceTable, YieldTable, PLANNED_AREAS};
pub use variety::{Category, SeasonStatus, Variety, VARIETY_COLUMNS};

use crate::errors::{OrchardError, Result};

/// True when `variety` is one of the fixed ledger columns.
pub fn is_known_variety(variety: &str) -> bool {
    VARIETY_COLUMNS.contains(&variety)
}

/// Parses an `MM-DD` date into its month number.
pub fn parse_month(input: &str) -> Result<u32> {
    // 2000 is a leap year so `02-29` parses.
    NaiveDate::parse_from_str(&format!("2000-{}", input.trim()), "%Y-%m-%d")
        .map(|date| date.month())
        .map_err(|_| OrchardError::Validation(format!("invalid date `{input}`, expected MM-DD")))
}

/// The set of varieties recorded in the fruit table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    varieties: Vec<Variety>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from stored rows without re-validating them.
    pub fn from_varieties(varieties: Vec<Variety>) -> Self {
        Self { varieties }
    }

    pub fn varieties(&self) -> &[Variety] {
        &self.varieties
    }

    pub fn len(&self) -> usize {
        self.varieties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.varieties.is_empty()
    }

    pub fn lookup(&self, category: Category, variety: &str) -> Option<&Variety> {
        self.varieties
            .iter()
            .find(|entry| entry.category == category && entry.name == variety)
    }

    pub fn get(&self, variety: &str) -> Option<&Variety> {
        self.varieties.iter().find(|entry| entry.name == variety)
    }

    pub fn varieties_of(&self, category: Category) -> Vec<&Variety> {
        self.varieties
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Adds a variety; the pair must be new and listed in the category's season table.
    pub fn add_variety(&mut self, variety: Variety) -> Result<()> {
        if self.lookup(variety.category, &variety.name).is_some() {
            return Err(OrchardError::DuplicateVariety {
                category: variety.category.number(),
                variety: variety.name,
            });
        }
        if variety.season().is_none() {
            return Err(OrchardError::Validation(format!(
                "{} is not a {} variety grown in this orchard",
                variety.name,
                variety.category.name()
            )));
        }
        tracing::info!(
            variety = %variety.name,
            category = variety.category.number(),
            "fruit added"
        );
        self.varieties.push(variety);
        Ok(())
    }

    pub fn remove_variety(&mut self, category: Category, variety: &str) -> Result<Variety> {
        let position = self
            .varieties
            .iter()
            .position(|entry| entry.category == category && entry.name == variety)
            .ok_or_else(|| OrchardError::FruitNotFound {
                category: category.number(),
                variety: variety.to_string(),
            })?;
        Ok(self.varieties.remove(position))
    }

    pub fn in_season(&self, variety: &str, month: u32) -> Result<SeasonStatus> {
        self.get(variety)
            .map(|entry| entry.in_season(month))
            .ok_or_else(|| OrchardError::VarietyNotFound(variety.to_string()))
    }

    pub fn available_in(&self, month: u32) -> Vec<&Variety> {
        self.varieties
            .iter()
            .filter(|entry| entry.in_season(month).is_available())
            .collect()
    }
}
