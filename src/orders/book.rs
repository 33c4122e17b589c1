use std::{collections::BTreeMap, sync::Arc};

use crate::{
    catalog::{Category, PriceTable},
    errors::{OrchardError, Result},
    ledger::{store::check_amount, LedgerStore, OverrunPolicy, SequenceKind},
    storage::TableStorage,
};

use super::{round_cents, GroupKey, OrderKind, OrderRecord, RevenueGroup};

/// Whether current inventory covers a prospective sale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockCheck {
    pub available: f64,
    pub sufficient: bool,
}

/// Append-only book of sales orders.
pub struct OrderBook {
    orders: Vec<OrderRecord>,
    prices: PriceTable,
    storage: Option<Arc<dyn TableStorage>>,
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("orders", &self.orders.len())
            .field("prices", &self.prices)
            .finish()
    }
}

impl OrderBook {
    pub fn in_memory(prices: PriceTable) -> Self {
        Self {
            orders: Vec::new(),
            prices,
            storage: None,
        }
    }

    pub fn open(storage: Arc<dyn TableStorage>, prices: PriceTable) -> Result<Self> {
        let orders = storage.load_orders()?;
        for (position, order) in orders.iter().enumerate() {
            if order.index != position as u64 + 1 {
                return Err(OrchardError::Storage(format!(
                    "order {position} has index {}, expected {}",
                    order.index,
                    position + 1
                )));
            }
        }
        tracing::debug!(orders = orders.len(), "order book loaded");
        Ok(Self {
            orders,
            prices,
            storage: Some(storage),
        })
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Validates the sales type string before placing the order.
    pub fn place_order(
        &mut self,
        ledger: &mut LedgerStore,
        kind: &str,
        variety: &str,
        weight: f64,
    ) -> Result<OrderRecord> {
        if !ledger.is_known(variety) {
            return Err(OrchardError::VarietyNotFound(variety.to_string()));
        }
        let kind = kind.parse::<OrderKind>()?;
        self.place(ledger, kind, variety, weight)
    }

    /// Moves balances for the order and records it.
    ///
    /// Pricing is resolved before any balance moves. A selling order is only
    /// recorded when inventory covers it; a picking order is always recorded
    /// and a failed capacity draw-down is only logged. If the order cannot be
    /// written, the ledger rows it produced are withdrawn.
    pub fn place(
        &mut self,
        ledger: &mut LedgerStore,
        kind: OrderKind,
        variety: &str,
        weight: f64,
    ) -> Result<OrderRecord> {
        let weight = check_amount(weight)?;
        if !ledger.is_known(variety) {
            return Err(OrchardError::VarietyNotFound(variety.to_string()));
        }
        let category = Category::of_variety(variety)
            .ok_or_else(|| OrchardError::VarietyNotFound(variety.to_string()))?;
        let unit_price = self.prices.price(variety)?;

        let checkpoint = ledger.checkpoint();
        match kind {
            OrderKind::Selling => {
                ledger.remove_inventory(variety, weight)?;
            }
            OrderKind::Picking => {
                let drawn =
                    ledger.consume_remaining_productivity(variety, weight, OverrunPolicy::Redirect);
                if let Err(err) = drawn {
                    tracing::warn!(
                        variety,
                        weight,
                        error = %err,
                        "picking recorded without capacity draw-down"
                    );
                }
            }
        }

        let record = OrderRecord {
            index: self.orders.len() as u64 + 1,
            kind,
            category,
            variety: variety.to_string(),
            weight,
            unit_price,
            revenue: round_cents(weight * unit_price),
        };
        self.orders.push(record.clone());
        if let Some(storage) = self.storage.clone() {
            if let Err(err) = storage.save_orders(&self.orders) {
                self.orders.pop();
                ledger.rollback(checkpoint);
                tracing::error!(error = %err, "order write failed, order discarded");
                return Err(err);
            }
        }
        tracing::info!(
            index = record.index,
            kind = %record.kind,
            variety,
            weight,
            revenue = record.revenue,
            "order placed"
        );
        Ok(record)
    }

    /// Revenue totals per group, sorted by key; `None` when no order exists.
    pub fn total_revenue_by(&self, key: GroupKey) -> Option<Vec<RevenueGroup>> {
        if self.orders.is_empty() {
            return None;
        }
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for order in &self.orders {
            *totals.entry(key.key_of(order)).or_insert(0.0) += order.revenue;
        }
        Some(
            totals
                .into_iter()
                .map(|(key, revenue)| RevenueGroup {
                    key,
                    revenue: round_cents(revenue),
                })
                .collect(),
        )
    }

    pub fn check_stock(
        &self,
        ledger: &LedgerStore,
        variety: &str,
        weight: f64,
    ) -> Result<StockCheck> {
        let weight = check_amount(weight)?;
        let available = ledger.quantity(SequenceKind::Inventory, variety)?;
        Ok(StockCheck {
            available,
            sufficient: available >= weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::ErrorKind, storage::faulty::FaultyStorage};

    fn seeded_ledger() -> LedgerStore {
        let mut ledger = LedgerStore::in_memory();
        let totals = BTreeMap::from([
            ("Ambrosia".to_string(), 30000.0),
            ("Lapins".to_string(), 40000.0),
            ("Elberta".to_string(), 72000.0),
        ]);
        ledger.seed_remaining_productivity(&totals).unwrap();
        ledger
    }

    #[test]
    fn picking_lapins_draws_down_capacity() {
        let mut ledger = seeded_ledger();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        let record = book.place_order(&mut ledger, "picking", "Lapins", 40.0).unwrap();
        assert_eq!(record.index, 1);
        assert_eq!(record.category, Category::Cherry);
        assert_eq!(record.unit_price, 2.99);
        assert_eq!(record.revenue, 119.6);
        assert_eq!(
            ledger
                .quantity(SequenceKind::RemainingProductivity, "Lapins")
                .unwrap(),
            39960.0
        );
    }

    #[test]
    fn selling_requires_stock() {
        let mut ledger = seeded_ledger();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        let err = book
            .place_order(&mut ledger, "selling", "Ambrosia", 50.0)
            .expect_err("no stock yet");
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        assert!(book.is_empty());

        ledger.add_inventory("Ambrosia", 300.0).unwrap();
        let record = book.place_order(&mut ledger, "selling", "Ambrosia", 50.0).unwrap();
        assert_eq!(record.revenue, 60.0);
        assert_eq!(ledger.quantity(SequenceKind::Inventory, "Ambrosia").unwrap(), 250.0);
    }

    #[test]
    fn picking_is_recorded_even_without_capacity() {
        let mut ledger = LedgerStore::in_memory();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        let record = book.place_order(&mut ledger, "picking", "Elberta", 10.0).unwrap();
        assert_eq!(record.revenue, 12.0);
        assert_eq!(book.len(), 1);
        assert!(ledger.history(SequenceKind::RemainingProductivity).is_empty());
    }

    #[test]
    fn unpriced_variety_moves_nothing() {
        let mut ledger = seeded_ledger();
        ledger.add_inventory("Gala", 300.0).unwrap();
        let inventory_rows = ledger.history(SequenceKind::Inventory).len();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        let err = book
            .place_order(&mut ledger, "selling", "Gala", 10.0)
            .expect_err("Gala has no price");
        assert!(err.is_fatal());
        assert_eq!(ledger.history(SequenceKind::Inventory).len(), inventory_rows);
        assert!(book.is_empty());
    }

    #[test]
    fn unknown_inputs_record_nothing() {
        let mut ledger = seeded_ledger();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        assert!(matches!(
            book.place_order(&mut ledger, "selling", "Fuji", 1.0),
            Err(OrchardError::VarietyNotFound(_))
        ));
        assert!(matches!(
            book.place_order(&mut ledger, "bartering", "Lapins", 1.0),
            Err(OrchardError::UnknownSalesType(_))
        ));
        assert!(book.is_empty());
        assert_eq!(ledger.history(SequenceKind::RemainingProductivity).len(), 1);
    }

    #[test]
    fn revenue_groups_are_sorted_by_key() {
        let mut ledger = seeded_ledger();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        assert_eq!(book.total_revenue_by(GroupKey::SalesType), None);

        ledger.add_inventory("Elberta", 400.0).unwrap();
        book.place_order(&mut ledger, "selling", "Elberta", 50.0).unwrap();
        book.place_order(&mut ledger, "picking", "Lapins", 40.0).unwrap();
        book.place_order(&mut ledger, "picking", "Elberta", 10.0).unwrap();

        let by_type = book.total_revenue_by(GroupKey::SalesType).unwrap();
        assert_eq!(
            by_type,
            vec![
                RevenueGroup {
                    key: "picking".into(),
                    revenue: 131.6
                },
                RevenueGroup {
                    key: "selling".into(),
                    revenue: 60.0
                },
            ]
        );
        let by_fruit = book.total_revenue_by(GroupKey::FruitType).unwrap();
        let keys: Vec<_> = by_fruit.iter().map(|group| group.key.as_str()).collect();
        assert_eq!(keys, vec!["2", "3"]);
        assert_eq!(by_fruit[1].revenue, 72.0);
    }

    #[test]
    fn check_stock_reports_shortfall() {
        let mut ledger = LedgerStore::in_memory();
        ledger.add_inventory("Lapins", 500.0).unwrap();
        let book = OrderBook::in_memory(PriceTable::standard());
        let check = book.check_stock(&ledger, "Lapins", 600.0).unwrap();
        assert_eq!(
            check,
            StockCheck {
                available: 500.0,
                sufficient: false
            }
        );
        assert!(book.check_stock(&ledger, "Lapins", 500.0).unwrap().sufficient);
    }

    #[test]
    fn unsaved_sale_returns_the_stock() {
        let storage = Arc::new(FaultyStorage::new().failing_orders());
        let mut ledger = LedgerStore::open(storage.clone()).unwrap();
        ledger.add_inventory("Ambrosia", 300.0).unwrap();
        let mut book = OrderBook::open(storage.clone(), PriceTable::standard()).unwrap();

        let err = book
            .place_order(&mut ledger, "selling", "Ambrosia", 50.0)
            .expect_err("orders write fails");
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(book.is_empty());
        assert_eq!(ledger.quantity(SequenceKind::Inventory, "Ambrosia").unwrap(), 300.0);
        assert_eq!(storage.stored_rows(SequenceKind::Inventory), 1);
        assert_eq!(storage.stored_orders(), 0);
    }

    #[test]
    fn unsaved_picking_restores_capacity() {
        let storage = Arc::new(FaultyStorage::new().failing_orders());
        let mut ledger = LedgerStore::open(storage.clone()).unwrap();
        ledger
            .seed_remaining_productivity(&BTreeMap::from([("Lapins".to_string(), 30.0)]))
            .unwrap();
        let mut book = OrderBook::open(storage.clone(), PriceTable::standard()).unwrap();

        book.place_order(&mut ledger, "picking", "Lapins", 40.0)
            .expect_err("orders write fails");
        assert_eq!(
            ledger
                .quantity(SequenceKind::RemainingProductivity, "Lapins")
                .unwrap(),
            30.0
        );
        assert!(ledger.history(SequenceKind::ExtraProductivity).is_empty());
        assert_eq!(storage.stored_rows(SequenceKind::RemainingProductivity), 1);
        assert_eq!(storage.stored_rows(SequenceKind::ExtraProductivity), 0);
    }
}
