//! In-memory storage whose writes can be made to fail per table.

use std::{collections::HashMap, sync::Mutex};

use crate::{
    catalog::{Catalog, Plantation},
    errors::{OrchardError, Result},
    ledger::{LedgerSequence, SequenceKind},
    orders::OrderRecord,
};

use super::TableStorage;

#[derive(Default)]
pub(crate) struct FaultyStorage {
    failing_ledgers: Vec<SequenceKind>,
    failing_orders: bool,
    ledgers: Mutex<HashMap<SequenceKind, LedgerSequence>>,
    orders: Mutex<Vec<OrderRecord>>,
}

impl FaultyStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pre-stores `sequence` so it is loaded on open.
    pub(crate) fn with_ledger(self, sequence: LedgerSequence) -> Self {
        if let Ok(mut ledgers) = self.ledgers.lock() {
            ledgers.insert(sequence.kind(), sequence);
        }
        self
    }

    pub(crate) fn failing_ledger(mut self, kind: SequenceKind) -> Self {
        self.failing_ledgers.push(kind);
        self
    }

    pub(crate) fn failing_orders(mut self) -> Self {
        self.failing_orders = true;
        self
    }

    /// Row count of the last successful write of `kind`.
    pub(crate) fn stored_rows(&self, kind: SequenceKind) -> usize {
        self.ledgers
            .lock()
            .map(|ledgers| ledgers.get(&kind).map_or(0, LedgerSequence::len))
            .unwrap_or(0)
    }

    pub(crate) fn stored_orders(&self) -> usize {
        self.orders.lock().map(|orders| orders.len()).unwrap_or(0)
    }
}

fn disk_full() -> OrchardError {
    OrchardError::Storage("disk full".into())
}

impl TableStorage for FaultyStorage {
    fn load_ledger(&self, kind: SequenceKind, columns: &[String]) -> Result<LedgerSequence> {
        let ledgers = self.ledgers.lock().map_err(|_| disk_full())?;
        Ok(ledgers
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| LedgerSequence::new(kind, columns.to_vec())))
    }

    fn save_ledger(&self, sequence: &LedgerSequence) -> Result<()> {
        if self.failing_ledgers.contains(&sequence.kind()) {
            return Err(disk_full());
        }
        let mut ledgers = self.ledgers.lock().map_err(|_| disk_full())?;
        ledgers.insert(sequence.kind(), sequence.clone());
        Ok(())
    }

    fn load_orders(&self) -> Result<Vec<OrderRecord>> {
        let orders = self.orders.lock().map_err(|_| disk_full())?;
        Ok(orders.clone())
    }

    fn save_orders(&self, orders: &[OrderRecord]) -> Result<()> {
        if self.failing_orders {
            return Err(disk_full());
        }
        let mut stored = self.orders.lock().map_err(|_| disk_full())?;
        *stored = orders.to_vec();
        Ok(())
    }

    fn load_catalog(&self) -> Result<Catalog> {
        Ok(Catalog::new())
    }

    fn save_catalog(&self, _catalog: &Catalog) -> Result<()> {
        Ok(())
    }

    fn load_plantation(&self) -> Result<Plantation> {
        Ok(Plantation::new())
    }

    fn save_plantation(&self, _plantation: &Plantation) -> Result<()> {
        Ok(())
    }

    fn is_blank(&self) -> Result<bool> {
        Ok(self.stored_orders() == 0)
    }
}
