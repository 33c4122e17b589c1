use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    catalog::VARIETY_COLUMNS,
    errors::{OrchardError, Result},
    storage::TableStorage,
};

use super::{round_quantity, LedgerRow, LedgerSequence, SequenceKind};

/// What happens to the part of a consumption that exceeds remaining productivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrunPolicy {
    /// Zero the remaining quantity and book the surplus as extra productivity.
    #[default]
    Redirect,
    /// Zero the remaining quantity and drop the surplus.
    Clamp,
}

/// Outcome of consuming remaining productivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Consumption {
    Consumed { remaining: f64 },
    Redirected { surplus: f64 },
    Clamped { discarded: f64 },
}

impl fmt::Display for Consumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consumption::Consumed { remaining } => {
                write!(f, "remaining productivity now {remaining}")
            }
            Consumption::Redirected { surplus } => {
                write!(f, "capacity exhausted, {surplus} booked as extra productivity")
            }
            Consumption::Clamped { discarded } => {
                write!(f, "capacity exhausted, {discarded} discarded")
            }
        }
    }
}

/// Result of recording harvested fruit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harvest {
    pub inventory_index: u64,
    /// `None` when remaining productivity has not been seeded yet.
    pub consumption: Option<Consumption>,
}

/// Row counts of the three sequences before a multi-table operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    inventory: usize,
    remaining: usize,
    extra: usize,
}

/// Owns the inventory, remaining-productivity, and extra-productivity sequences.
pub struct LedgerStore {
    inventory: LedgerSequence,
    remaining: LedgerSequence,
    extra: LedgerSequence,
    storage: Option<Arc<dyn TableStorage>>,
}

impl fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerStore")
            .field("inventory", &self.inventory.len())
            .field("remaining", &self.remaining.len())
            .field("extra", &self.extra.len())
            .field("persistent", &self.storage.is_some())
            .finish()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

pub(crate) fn standard_columns() -> Vec<String> {
    VARIETY_COLUMNS.iter().map(|column| column.to_string()).collect()
}

pub(crate) fn check_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(OrchardError::InvalidAmount(amount))
    }
}

impl LedgerStore {
    /// Empty store over the standard variety columns, never persisted.
    pub fn in_memory() -> Self {
        Self::with_columns(standard_columns())
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            inventory: LedgerSequence::new(SequenceKind::Inventory, columns.clone()),
            remaining: LedgerSequence::new(SequenceKind::RemainingProductivity, columns.clone()),
            extra: LedgerSequence::new(SequenceKind::ExtraProductivity, columns),
            storage: None,
        }
    }

    /// Loads all three sequences and writes every later append back through `storage`.
    pub fn open(storage: Arc<dyn TableStorage>) -> Result<Self> {
        let columns = standard_columns();
        let inventory = storage.load_ledger(SequenceKind::Inventory, &columns)?;
        let remaining = storage.load_ledger(SequenceKind::RemainingProductivity, &columns)?;
        let extra = storage.load_ledger(SequenceKind::ExtraProductivity, &columns)?;
        Ok(Self {
            inventory,
            remaining,
            extra,
            storage: Some(storage),
        })
    }

    pub fn columns(&self) -> &[String] {
        self.inventory.columns()
    }

    pub fn is_known(&self, variety: &str) -> bool {
        self.inventory.column(variety).is_some()
    }

    pub fn sequence(&self, kind: SequenceKind) -> &LedgerSequence {
        match kind {
            SequenceKind::Inventory => &self.inventory,
            SequenceKind::RemainingProductivity => &self.remaining,
            SequenceKind::ExtraProductivity => &self.extra,
        }
    }

    fn sequence_mut(&mut self, kind: SequenceKind) -> &mut LedgerSequence {
        match kind {
            SequenceKind::Inventory => &mut self.inventory,
            SequenceKind::RemainingProductivity => &mut self.remaining,
            SequenceKind::ExtraProductivity => &mut self.extra,
        }
    }

    pub fn current(&self, kind: SequenceKind) -> Option<&LedgerRow> {
        self.sequence(kind).current()
    }

    pub fn history(&self, kind: SequenceKind) -> &[LedgerRow] {
        self.sequence(kind).rows()
    }

    pub fn quantity(&self, kind: SequenceKind, variety: &str) -> Result<f64> {
        self.sequence(kind)
            .quantity(variety)
            .ok_or_else(|| OrchardError::VarietyNotFound(variety.to_string()))
    }

    /// Creates the first remaining-productivity row from planned totals.
    pub fn seed_remaining_productivity(
        &mut self,
        totals: &BTreeMap<String, f64>,
    ) -> Result<LedgerRow> {
        if !self.remaining.is_empty() {
            return Err(OrchardError::AlreadyInitialized);
        }
        let mut quantities = vec![0.0; self.remaining.columns().len()];
        for (variety, total) in totals {
            let column = self
                .remaining
                .column(variety)
                .ok_or_else(|| OrchardError::VarietyNotFound(variety.clone()))?;
            quantities[column] = check_amount(*total)?;
        }
        let row = self.remaining.append_snapshot(quantities).clone();
        self.commit(SequenceKind::RemainingProductivity)?;
        tracing::info!(index = row.index, "remaining productivity seeded");
        Ok(row)
    }

    /// Books harvested fruit into inventory, then draws it from remaining productivity.
    ///
    /// When the draw-down fails to persist, the inventory row is withdrawn too.
    pub fn add_inventory(&mut self, variety: &str, amount: f64) -> Result<Harvest> {
        let amount = check_amount(amount)?;
        let checkpoint = self.checkpoint();
        let index = self.inventory.append_with(variety, |q| q + amount)?.index;
        self.commit(SequenceKind::Inventory)?;

        let drawn = self.consume_remaining_productivity(variety, amount, OverrunPolicy::Redirect);
        let consumption = match drawn {
            Ok(outcome) => Some(outcome),
            Err(OrchardError::NotSeeded) => {
                tracing::warn!(
                    variety,
                    amount,
                    "remaining productivity not seeded, harvest not drawn down"
                );
                None
            }
            Err(err) => {
                self.rollback(checkpoint);
                return Err(err);
            }
        };
        tracing::info!(variety, amount, index, "inventory added");
        Ok(Harvest {
            inventory_index: index,
            consumption,
        })
    }

    /// Removes stock; fails without appending when the balance would go negative.
    pub fn remove_inventory(&mut self, variety: &str, amount: f64) -> Result<LedgerRow> {
        let amount = check_amount(amount)?;
        let available = round_quantity(self.quantity(SequenceKind::Inventory, variety)?);
        if self.inventory.is_empty() {
            return Err(OrchardError::EmptySequence(SequenceKind::Inventory));
        }
        if round_quantity(amount) > available {
            return Err(OrchardError::InsufficientBalance {
                variety: variety.to_string(),
                requested: amount,
                available,
            });
        }
        let row = self
            .inventory
            .append_with(variety, |q| (q - amount).max(0.0))?
            .clone();
        self.commit(SequenceKind::Inventory)?;
        tracing::info!(variety, amount, index = row.index, "inventory removed");
        Ok(row)
    }

    pub fn consume_remaining_productivity(
        &mut self,
        variety: &str,
        amount: f64,
        policy: OverrunPolicy,
    ) -> Result<Consumption> {
        let amount = check_amount(amount)?;
        let current = round_quantity(self.quantity(SequenceKind::RemainingProductivity, variety)?);
        if self.remaining.is_empty() {
            return Err(OrchardError::NotSeeded);
        }

        if current >= round_quantity(amount) {
            self.remaining.append_with(variety, |q| (q - amount).max(0.0))?;
            self.commit(SequenceKind::RemainingProductivity)?;
            let remaining = round_quantity((current - amount).max(0.0));
            tracing::info!(variety, amount, remaining, "remaining productivity consumed");
            return Ok(Consumption::Consumed { remaining });
        }

        let checkpoint = self.checkpoint();
        self.remaining.append_with(variety, |_| 0.0)?;
        self.commit(SequenceKind::RemainingProductivity)?;
        let surplus = round_quantity(amount - current);
        match policy {
            OverrunPolicy::Redirect => {
                tracing::warn!(
                    variety,
                    surplus,
                    "capacity overrun redirected to extra productivity"
                );
                if let Err(err) = self.add_extra_productivity(variety, surplus) {
                    self.rollback(checkpoint);
                    return Err(err);
                }
                Ok(Consumption::Redirected { surplus })
            }
            OverrunPolicy::Clamp => {
                tracing::warn!(variety, surplus, "capacity overrun discarded");
                Ok(Consumption::Clamped { discarded: surplus })
            }
        }
    }

    pub fn add_extra_productivity(&mut self, variety: &str, amount: f64) -> Result<LedgerRow> {
        let amount = check_amount(amount)?;
        let row = self.extra.append_with(variety, |q| q + amount)?.clone();
        self.commit(SequenceKind::ExtraProductivity)?;
        tracing::info!(variety, amount, index = row.index, "extra productivity added");
        Ok(row)
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            inventory: self.inventory.len(),
            remaining: self.remaining.len(),
            extra: self.extra.len(),
        }
    }

    /// Drops every row appended since `checkpoint` and rewrites the tables it touched.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        let targets = [
            (SequenceKind::Inventory, checkpoint.inventory),
            (SequenceKind::RemainingProductivity, checkpoint.remaining),
            (SequenceKind::ExtraProductivity, checkpoint.extra),
        ];
        for (kind, len) in targets {
            if self.sequence(kind).len() <= len {
                continue;
            }
            self.sequence_mut(kind).truncate(len);
            tracing::warn!(table = kind.table_name(), rows = len, "ledger rolled back");
            if let Some(storage) = &self.storage {
                if let Err(err) = storage.save_ledger(self.sequence(kind)) {
                    tracing::error!(
                        table = kind.table_name(),
                        error = %err,
                        "ledger rollback write failed"
                    );
                }
            }
        }
    }

    /// Persists the sequence; the freshly appended row is dropped if the write fails.
    fn commit(&mut self, kind: SequenceKind) -> Result<()> {
        let Some(storage) = self.storage.clone() else {
            return Ok(());
        };
        let sequence = self.sequence_mut(kind);
        if let Err(err) = storage.save_ledger(sequence) {
            sequence.pop();
            tracing::error!(
                table = kind.table_name(),
                error = %err,
                "ledger write failed, row discarded"
            );
            return Err(err);
        }
        Ok(())
    }
}
