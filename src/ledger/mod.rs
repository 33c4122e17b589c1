//! Running-balance ledgers for inventory and planned/extra productivity.

pub mod sequence;
pub mod store;

use std::{fmt, str::FromStr};

pub use sequence::{round_quantity, LedgerRow, LedgerSequence};
pub use store::{Consumption, Harvest, LedgerStore, OverrunPolicy};

use crate::errors::OrchardError;

/// Identifies one of the three parallel ledger sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Inventory,
    RemainingProductivity,
    ExtraProductivity,
}

impl SequenceKind {
    pub const ALL: [SequenceKind; 3] = [
        SequenceKind::Inventory,
        SequenceKind::RemainingProductivity,
        SequenceKind::ExtraProductivity,
    ];

    /// Table name used for the persisted file.
    pub fn table_name(self) -> &'static str {
        match self {
            SequenceKind::Inventory => "inventory",
            SequenceKind::RemainingProductivity => "remaining_productivity",
            SequenceKind::ExtraProductivity => "extra_productivity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SequenceKind::Inventory => "Inventory",
            SequenceKind::RemainingProductivity => "Remaining productivity",
            SequenceKind::ExtraProductivity => "Extra productivity",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SequenceKind {
    type Err = OrchardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inventory" => Ok(SequenceKind::Inventory),
            "remaining" | "remaining_productivity" | "capacity" => {
                Ok(SequenceKind::RemainingProductivity)
            }
            "extra" | "extra_productivity" => Ok(SequenceKind::ExtraProductivity),
            other => Err(OrchardError::Validation(format!(
                "unknown ledger `{other}`, choose inventory, remaining or extra"
            ))),
        }
    }
}
