use std::{path::Path, sync::Arc};

use crate::{
    catalog::{AreaType, Catalog, Category, Plantation, PriceTable, Region, Variety, YieldTable},
    config::ConfigManager,
    errors::{OrchardError, Result},
    ledger::{Harvest, LedgerRow, LedgerStore, SequenceKind},
    orders::{OrderBook, OrderKind, OrderRecord, StockCheck},
    storage::{CsvStorage, TableStorage},
};

/// Summary of what the demo dataset loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    pub fruits: usize,
    pub regions: usize,
    pub harvests: usize,
    pub orders: Vec<OrderRecord>,
}

/// Facade owning one dataset: reference tables, ledgers, orders, and their storage.
pub struct Orchard {
    catalog: Catalog,
    plantation: Plantation,
    ledger: LedgerStore,
    orders: OrderBook,
    storage: Arc<dyn TableStorage>,
}

impl Orchard {
    pub fn open(storage: Arc<dyn TableStorage>) -> Result<Self> {
        let catalog = storage.load_catalog()?;
        let plantation = storage.load_plantation()?;
        let ledger = LedgerStore::open(Arc::clone(&storage))?;
        let orders = OrderBook::open(Arc::clone(&storage), PriceTable::standard())?;
        tracing::info!(
            fruits = catalog.len(),
            regions = plantation.regions().len(),
            orders = orders.len(),
            "dataset opened"
        );
        Ok(Self {
            catalog,
            plantation,
            ledger,
            orders,
            storage,
        })
    }

    /// Opens the CSV tables in `dir`, creating it when missing.
    pub fn open_dir(dir: &Path) -> Result<Self> {
        Self::open(Arc::new(CsvStorage::in_dir(dir)?))
    }

    /// Opens the configured dataset, loading the demo data into a blank one when enabled.
    pub fn from_config(manager: &ConfigManager) -> Result<Self> {
        let config = manager.load()?;
        let dir = manager.dataset_dir(&config);
        let storage: Arc<dyn TableStorage> = Arc::new(CsvStorage::in_dir(&dir)?);
        let blank = storage.is_blank()?;
        let mut orchard = Self::open(storage)?;
        if blank && config.bootstrap_on_empty {
            tracing::info!(dir = %dir.display(), "blank dataset, loading demo data");
            orchard.bootstrap()?;
        }
        Ok(orchard)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn plantation(&self) -> &Plantation {
        &self.plantation
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub fn is_blank(&self) -> bool {
        self.catalog.is_empty()
            && self.plantation.is_empty()
            && self.orders.is_empty()
            && SequenceKind::ALL
                .into_iter()
                .all(|kind| self.ledger.sequence(kind).is_empty())
    }

    pub fn add_fruit(&mut self, variety: Variety) -> Result<()> {
        let mut catalog = self.catalog.clone();
        catalog.add_variety(variety)?;
        self.storage.save_catalog(&catalog)?;
        self.catalog = catalog;
        Ok(())
    }

    pub fn remove_fruit(&mut self, category: Category, variety: &str) -> Result<Variety> {
        let mut catalog = self.catalog.clone();
        let removed = catalog.remove_variety(category, variety)?;
        self.storage.save_catalog(&catalog)?;
        self.catalog = catalog;
        tracing::info!(variety, category = category.number(), "fruit removed");
        Ok(removed)
    }

    pub fn add_region(&mut self, region: Region) -> Result<()> {
        let mut plantation = self.plantation.clone();
        plantation.add_region(region, &self.catalog)?;
        self.storage.save_plantation(&plantation)?;
        self.plantation = plantation;
        Ok(())
    }

    pub fn set_area_type(&mut self, id: u32, area_type: AreaType) -> Result<Region> {
        let mut plantation = self.plantation.clone();
        let region = plantation.set_area_type(id, area_type)?.clone();
        self.storage.save_plantation(&plantation)?;
        self.plantation = plantation;
        Ok(region)
    }

    /// Seeds remaining productivity from the planned areas and average yields.
    pub fn estimate_capacity(&mut self) -> Result<LedgerRow> {
        let totals = YieldTable::standard().estimate_planned_capacity();
        self.ledger.seed_remaining_productivity(&totals)
    }

    pub fn add_inventory(&mut self, variety: &str, amount: f64) -> Result<Harvest> {
        self.ledger.add_inventory(variety, amount)
    }

    pub fn remove_inventory(&mut self, variety: &str, amount: f64) -> Result<LedgerRow> {
        self.ledger.remove_inventory(variety, amount)
    }

    pub fn place_order(&mut self, kind: &str, variety: &str, weight: f64) -> Result<OrderRecord> {
        self.orders
            .place_order(&mut self.ledger, kind, variety, weight)
    }

    pub fn sell(&mut self, variety: &str, weight: f64) -> Result<OrderRecord> {
        self.orders
            .place(&mut self.ledger, OrderKind::Selling, variety, weight)
    }

    pub fn pick(&mut self, variety: &str, weight: f64) -> Result<OrderRecord> {
        self.orders
            .place(&mut self.ledger, OrderKind::Picking, variety, weight)
    }

    pub fn check_stock(&self, variety: &str, weight: f64) -> Result<StockCheck> {
        self.orders.check_stock(&self.ledger, variety, weight)
    }

    /// Loads the demo dataset: three fruits, four regions, seeded capacity,
    /// five harvests and three orders. Only allowed on a blank dataset.
    pub fn bootstrap(&mut self) -> Result<BootstrapReport> {
        if !self.is_blank() {
            return Err(OrchardError::Validation(
                "the dataset already holds data, bootstrap needs a blank one".into(),
            ));
        }
        let fruits = [
            Variety::new(
                Category::Apple,
                "Ambrosia",
                "big",
                "very sweet",
                "less sour",
                "crunchy",
                1.2,
                "pie",
            ),
            Variety::new(
                Category::Peach,
                "Elberta",
                "big",
                "very sweet",
                "less sour",
                "crunchy",
                1.2,
                "pie",
            ),
            Variety::new(
                Category::Cherry,
                "Lapins",
                "small",
                "median sweet",
                "median sour",
                "soft",
                2.99,
                "cans",
            ),
        ];
        let fruit_count = fruits.len();
        for fruit in fruits {
            self.add_fruit(fruit)?;
        }

        let regions = [
            Region::new(1, Category::Apple, "Ambrosia", 20.0, AreaType::Market),
            Region::new(2, Category::Peach, "Elberta", 30.0, AreaType::Market),
            Region::new(3, Category::Cherry, "Lapins", 40.0, AreaType::Pick),
            Region::new(4, Category::Cherry, "Lapins", 40.0, AreaType::Pick),
        ];
        let region_count = regions.len();
        for region in regions {
            self.add_region(region)?;
        }

        self.estimate_capacity()?;

        let harvests = [
            ("Ambrosia", 300.0),
            ("Honeycrisp", 300.0),
            ("Gala", 300.0),
            ("Elberta", 400.0),
            ("Lapins", 500.0),
        ];
        for (variety, amount) in harvests {
            self.add_inventory(variety, amount)?;
        }

        let orders = vec![
            self.sell("Ambrosia", 50.0)?,
            self.sell("Elberta", 50.0)?,
            self.pick("Lapins", 40.0)?,
        ];
        tracing::info!("demo dataset loaded");
        Ok(BootstrapReport {
            fruits: fruit_count,
            regions: region_count,
            harvests: harvests.len(),
            orders,
        })
    }
}
