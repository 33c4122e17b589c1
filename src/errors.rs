use thiserror::Error;

use crate::ledger::SequenceKind;

pub type Result<T> = std::result::Result<T, OrchardError>;

/// Broad failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InsufficientBalance,
    PolicyViolation,
    Configuration,
    Validation,
    Storage,
}

/// Error type that captures ledger, catalog, and persistence failures.
#[derive(Debug, Error)]
pub enum OrchardError {
    #[error("Fruit '{0}' not found")]
    VarietyNotFound(String),
    #[error("Fruit {variety} of type {category} not found")]
    FruitNotFound { category: u8, variety: String },
    #[error("Category {0} not found, choose from 1-Apple, 2-Cherry, 3-Peach")]
    CategoryNotFound(u8),
    #[error("Region {0} not found")]
    RegionNotFound(u32),
    #[error("Not enough {variety} in inventory, only {available} left")]
    InsufficientBalance {
        variety: String,
        requested: f64,
        available: f64,
    },
    #[error("{0} is empty")]
    EmptySequence(SequenceKind),
    #[error("Remaining productivity is already initialized and cannot be seeded again")]
    AlreadyInitialized,
    #[error("Please estimate capacity first")]
    NotSeeded,
    #[error("No unit price configured for {0}")]
    Unpriced(String),
    #[error("Sales type '{0}' not found, please choose from selling and picking")]
    UnknownSalesType(String),
    #[error("Variable '{0}' not found, please choose from: sales_type or fruit_type")]
    UnknownGroupKey(String),
    #[error("Fruit {variety} of type {category} already exists")]
    DuplicateVariety { category: u8, variety: String },
    #[error("Region {0} already exists")]
    DuplicateRegion(u32),
    #[error("Invalid amount {0}, amounts must be finite and not negative")]
    InvalidAmount(f64),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl OrchardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchardError::VarietyNotFound(_)
            | OrchardError::FruitNotFound { .. }
            | OrchardError::CategoryNotFound(_)
            | OrchardError::RegionNotFound(_) => ErrorKind::NotFound,
            OrchardError::InsufficientBalance { .. } | OrchardError::EmptySequence(_) => {
                ErrorKind::InsufficientBalance
            }
            OrchardError::AlreadyInitialized | OrchardError::NotSeeded => {
                ErrorKind::PolicyViolation
            }
            OrchardError::Unpriced(_) => ErrorKind::Configuration,
            OrchardError::UnknownSalesType(_)
            | OrchardError::UnknownGroupKey(_)
            | OrchardError::DuplicateVariety { .. }
            | OrchardError::DuplicateRegion(_)
            | OrchardError::InvalidAmount(_)
            | OrchardError::Validation(_) => ErrorKind::Validation,
            OrchardError::Storage(_)
            | OrchardError::Io(_)
            | OrchardError::Csv(_)
            | OrchardError::Serde(_) => ErrorKind::Storage,
        }
    }

    /// Configuration errors mean the reference tables are corrupt.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
