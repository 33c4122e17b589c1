use serde::{Deserialize, Serialize};

use crate::errors::{OrchardError, Result};

use super::SequenceKind;

const QUANTITY_SCALE: f64 = 1_000_000.0;

/// Snapshot of every variety quantity at one ledger index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub index: u64,
    pub quantities: Vec<f64>,
}

impl LedgerRow {
    fn zeroed(width: usize) -> Self {
        Self {
            index: 0,
            quantities: vec![0.0; width],
        }
    }
}

/// Append-only sequence of full-row snapshots; the last row is the current balance.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSequence {
    kind: SequenceKind,
    columns: Vec<String>,
    rows: Vec<LedgerRow>,
}

impl LedgerSequence {
    pub fn new(kind: SequenceKind, columns: Vec<String>) -> Self {
        Self {
            kind,
            columns,
            rows: Vec::new(),
        }
    }

    /// Rebuilds a sequence from stored rows, rejecting gaps, ragged rows, and
    /// quantities that are negative or not finite.
    pub fn from_rows(
        kind: SequenceKind,
        columns: Vec<String>,
        rows: Vec<LedgerRow>,
    ) -> Result<Self> {
        for (position, row) in rows.iter().enumerate() {
            let expected = position as u64 + 1;
            if row.index != expected {
                return Err(OrchardError::Storage(format!(
                    "{kind} row {position} has index {}, expected {expected}",
                    row.index
                )));
            }
            if row.quantities.len() != columns.len() {
                return Err(OrchardError::Storage(format!(
                    "{kind} row {} has {} values for {} columns",
                    row.index,
                    row.quantities.len(),
                    columns.len()
                )));
            }
            if let Some(value) = row
                .quantities
                .iter()
                .find(|value| !(value.is_finite() && **value >= 0.0))
            {
                return Err(OrchardError::Storage(format!(
                    "{kind} row {} holds invalid quantity {value}",
                    row.index
                )));
            }
        }
        Ok(Self {
            kind,
            columns,
            rows,
        })
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn current(&self) -> Option<&LedgerRow> {
        self.rows.last()
    }

    pub fn column(&self, variety: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == variety)
    }

    /// Current quantity of a known variety; `None` when the column does not exist.
    /// An empty sequence reads as all zero.
    pub fn quantity(&self, variety: &str) -> Option<f64> {
        let column = self.column(variety)?;
        Some(
            self.current()
                .map(|row| row.quantities[column])
                .unwrap_or(0.0),
        )
    }

    /// Pairs each column name with its value in `row`.
    pub fn labelled<'a>(
        &'a self,
        row: &'a LedgerRow,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(row.quantities.iter().copied())
    }

    /// Appends a copy of the last row (all zero when empty) with one column rewritten.
    pub(crate) fn append_with<F>(&mut self, variety: &str, update: F) -> Result<&LedgerRow>
    where
        F: FnOnce(f64) -> f64,
    {
        let column = self
            .column(variety)
            .ok_or_else(|| OrchardError::VarietyNotFound(variety.to_string()))?;
        let mut next = self
            .current()
            .cloned()
            .unwrap_or_else(|| LedgerRow::zeroed(self.columns.len()));
        next.quantities[column] = round_quantity(update(next.quantities[column]));
        next.index += 1;
        self.rows.push(next);
        Ok(&self.rows[self.rows.len() - 1])
    }

    pub(crate) fn append_snapshot(&mut self, quantities: Vec<f64>) -> &LedgerRow {
        let index = self.current().map(|row| row.index).unwrap_or(0) + 1;
        let quantities = quantities.into_iter().map(round_quantity).collect();
        self.rows.push(LedgerRow { index, quantities });
        &self.rows[self.rows.len() - 1]
    }

    pub(crate) fn pop(&mut self) -> Option<LedgerRow> {
        self.rows.pop()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }
}

/// Rounds a quantity to micro-units so repeated float arithmetic does not
/// leave residue like `0.19999999999999998` in the ledgers.
pub fn round_quantity(value: f64) -> f64 {
    (value * QUANTITY_SCALE).round() / QUANTITY_SCALE
}
