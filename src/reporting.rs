//! Read-only aggregates over the ledgers, order book, and plantation.

use std::collections::BTreeMap;

use crate::{
    catalog::{Catalog, Category, Plantation},
    ledger::{LedgerRow, LedgerStore, SequenceKind},
    orders::{round_cents, GroupKey, OrderBook, RevenueGroup},
};

/// Ledger rows narrowed to the varieties of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTable {
    pub kind: SequenceKind,
    pub category: Category,
    pub columns: Vec<String>,
    pub rows: Vec<(u64, Vec<f64>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub display_name: String,
    pub pick_area: f64,
    pub market_area: f64,
    pub pick_regions: Vec<u32>,
    pub market_regions: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaRow {
    /// `"<type_num> <variety>"`
    pub key: String,
    pub picking: f64,
    pub marketing: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueShare {
    pub category: Category,
    pub revenue: f64,
    pub percent: f64,
}

pub struct ReportService;

impl ReportService {
    pub fn current_balances(ledger: &LedgerStore) -> Vec<(SequenceKind, Option<&LedgerRow>)> {
        SequenceKind::ALL
            .into_iter()
            .map(|kind| (kind, ledger.current(kind)))
            .collect()
    }

    pub fn history(ledger: &LedgerStore, kind: SequenceKind, category: Category) -> HistoryTable {
        let sequence = ledger.sequence(kind);
        let selected: Vec<(usize, String)> = category
            .varieties()
            .filter_map(|variety| {
                sequence
                    .column(variety)
                    .map(|column| (column, variety.to_string()))
            })
            .collect();
        let rows = sequence
            .rows()
            .iter()
            .map(|row| {
                let values = selected
                    .iter()
                    .map(|(column, _)| row.quantities[*column])
                    .collect();
                (row.index, values)
            })
            .collect();
        HistoryTable {
            kind,
            category,
            columns: selected.into_iter().map(|(_, name)| name).collect(),
            rows,
        }
    }

    pub fn region_summary(catalog: &Catalog, plantation: &Plantation) -> Vec<RegionSummary> {
        catalog
            .varieties()
            .iter()
            .map(|variety| {
                let (pick_area, market_area) =
                    plantation.area_by_variety(variety.category, &variety.name);
                let (pick_regions, market_regions) =
                    plantation.region_ids(variety.category, &variety.name);
                RegionSummary {
                    display_name: variety.display_name(),
                    pick_area,
                    market_area,
                    pick_regions,
                    market_regions,
                }
            })
            .collect()
    }

    pub fn area_summary(catalog: &Catalog, plantation: &Plantation) -> Vec<AreaRow> {
        catalog
            .varieties()
            .iter()
            .map(|variety| {
                let (picking, marketing) =
                    plantation.area_by_variety(variety.category, &variety.name);
                AreaRow {
                    key: format!("{} {}", variety.category.number(), variety.name),
                    picking,
                    marketing,
                }
            })
            .collect()
    }

    pub fn revenue_by(book: &OrderBook, key: GroupKey) -> Option<Vec<RevenueGroup>> {
        book.total_revenue_by(key)
    }

    /// Percentage of total revenue earned per category.
    pub fn revenue_share_by_category(book: &OrderBook) -> Option<Vec<RevenueShare>> {
        if book.is_empty() {
            return None;
        }
        let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
        for order in book.orders() {
            *totals.entry(order.category).or_insert(0.0) += order.revenue;
        }
        let grand_total: f64 = totals.values().sum();
        Some(
            totals
                .into_iter()
                .map(|(category, revenue)| RevenueShare {
                    category,
                    revenue: round_cents(revenue),
                    percent: if grand_total > 0.0 {
                        round_cents(revenue / grand_total * 100.0)
                    } else {
                        0.0
                    },
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AreaType, PriceTable, Region, Variety};

    fn catalog() -> Catalog {
        Catalog::from_varieties(vec![
            Variety::new(Category::Apple, "Ambrosia", "big", "", "", "", 1.2, "pie"),
            Variety::new(Category::Cherry, "Lapins", "small", "", "", "", 2.99, "cans"),
        ])
    }

    #[test]
    fn history_keeps_only_category_columns() {
        let mut ledger = LedgerStore::in_memory();
        ledger.add_inventory("Lapins", 500.0).unwrap();
        ledger.add_inventory("Ambrosia", 300.0).unwrap();
        let table = ReportService::history(&ledger, SequenceKind::Inventory, Category::Cherry);
        assert_eq!(table.columns, vec!["Lapins", "Sweetheart", "Skeena"]);
        assert_eq!(
            table.rows,
            vec![(1, vec![500.0, 0.0, 0.0]), (2, vec![500.0, 0.0, 0.0])]
        );
    }

    #[test]
    fn region_and_area_summaries_cover_every_fruit() {
        let catalog = catalog();
        let plantation = Plantation::from_regions(vec![
            Region::new(1, Category::Apple, "Ambrosia", 20.0, AreaType::Market),
            Region::new(3, Category::Cherry, "Lapins", 40.0, AreaType::Pick),
            Region::new(4, Category::Cherry, "Lapins", 40.0, AreaType::Pick),
        ]);
        let regions = ReportService::region_summary(&catalog, &plantation);
        assert_eq!(regions[1].display_name, "Lapins cherry");
        assert_eq!(regions[1].pick_area, 80.0);
        assert_eq!(regions[1].pick_regions, vec![3, 4]);
        assert_eq!(regions[0].market_regions, vec![1]);

        let areas = ReportService::area_summary(&catalog, &plantation);
        assert_eq!(areas[0].key, "1 Ambrosia");
        assert_eq!(areas[0].marketing, 20.0);
    }

    #[test]
    fn revenue_share_sums_to_hundred() {
        let mut ledger = LedgerStore::in_memory();
        let mut book = OrderBook::in_memory(PriceTable::standard());
        assert!(ReportService::revenue_share_by_category(&book).is_none());

        ledger.add_inventory("Ambrosia", 100.0).unwrap();
        book.place_order(&mut ledger, "selling", "Ambrosia", 50.0).unwrap();
        book.place_order(&mut ledger, "picking", "Elberta", 50.0).unwrap();
        let shares = ReportService::revenue_share_by_category(&book).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, Category::Apple);
        assert_eq!(shares[0].percent, 50.0);
        assert_eq!(shares[1].revenue, 60.0);
    }
}
