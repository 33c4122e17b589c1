pub mod csv_backend;
#[cfg(test)]
pub(crate) mod faulty;

use crate::{
    catalog::{Catalog, Plantation},
    errors::Result,
    ledger::{LedgerSequence, SequenceKind},
    orders::OrderRecord,
};

/// Abstraction over persistence backends capable of storing the orchard tables.
pub trait TableStorage: Send + Sync {
    fn load_ledger(&self, kind: SequenceKind, columns: &[String]) -> Result<LedgerSequence>;
    fn save_ledger(&self, sequence: &LedgerSequence) -> Result<()>;
    fn load_orders(&self) -> Result<Vec<OrderRecord>>;
    fn save_orders(&self, orders: &[OrderRecord]) -> Result<()>;
    fn load_catalog(&self) -> Result<Catalog>;
    fn save_catalog(&self, catalog: &Catalog) -> Result<()>;
    fn load_plantation(&self) -> Result<Plantation>;
    fn save_plantation(&self, plantation: &Plantation) -> Result<()>;

    /// True when no table holds any data yet.
    fn is_blank(&self) -> Result<bool>;
}

pub use csv_backend::{CsvStorage, DatasetPaths};
