#![doc(test(attr(deny(warnings))))]

//! Orchard Core keeps the records of a small fruit orchard: the variety
//! catalog, planting regions, running inventory and productivity ledgers,
//! and the sales order book, all mirrored to flat CSV tables.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod orders;
pub mod reporting;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Orchard Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
