#![allow(dead_code)]

use std::{collections::BTreeMap, path::PathBuf, sync::Mutex};

use orchard_core::{core::Orchard, ledger::LedgerStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn fresh_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Opens an empty CSV-backed orchard in its own directory.
pub fn setup_orchard() -> (Orchard, PathBuf) {
    let dir = fresh_dir();
    let orchard = Orchard::open_dir(&dir).expect("open orchard");
    (orchard, dir)
}

pub fn planned_totals() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("Ambrosia".to_string(), 30000.0),
        ("Lapins".to_string(), 40000.0),
        ("Elberta".to_string(), 72000.0),
    ])
}

/// In-memory ledger with remaining productivity seeded from the planned totals.
pub fn seeded_ledger() -> LedgerStore {
    let mut ledger = LedgerStore::in_memory();
    ledger
        .seed_remaining_productivity(&planned_totals())
        .expect("seed remaining productivity");
    ledger
}
