use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    catalog::{Catalog, Plantation, Region, Variety},
    core::utils::ensure_dir,
    errors::{OrchardError, Result},
    ledger::{LedgerRow, LedgerSequence, SequenceKind},
    orders::OrderRecord,
    utils::persistence,
};

use super::TableStorage;

const INDEX_COLUMN: &str = "index";

pub const ORDER_HEADERS: [&str; 7] = [
    "index",
    "sales_type",
    "fruit_type",
    "fruit_variety",
    "weight",
    "unit_price",
    "revenue",
];
pub const CATALOG_HEADERS: [&str; 8] = [
    "type_num", "variety", "size", "sweet", "sour", "taste", "price", "use",
];
pub const REGION_HEADERS: [&str; 5] = ["regionId", "fruit_type_num", "variety", "area", "areaType"];

/// File locations of every table in one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub fruits: PathBuf,
    pub plantations: PathBuf,
    pub inventory: PathBuf,
    pub remaining_productivity: PathBuf,
    pub extra_productivity: PathBuf,
    pub orders: PathBuf,
}

impl DatasetPaths {
    /// Standard file names inside a single dataset directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            fruits: dir.join("fruits.csv"),
            plantations: dir.join("plantations.csv"),
            inventory: dir.join("inventory.csv"),
            remaining_productivity: dir.join("remaining_productivity.csv"),
            extra_productivity: dir.join("extra_productivity.csv"),
            orders: dir.join("orders.csv"),
        }
    }

    pub fn ledger(&self, kind: SequenceKind) -> &Path {
        match kind {
            SequenceKind::Inventory => self.inventory.as_path(),
            SequenceKind::RemainingProductivity => self.remaining_productivity.as_path(),
            SequenceKind::ExtraProductivity => self.extra_productivity.as_path(),
        }
    }

    fn all(&self) -> [&Path; 6] {
        [
            self.fruits.as_path(),
            self.plantations.as_path(),
            self.inventory.as_path(),
            self.remaining_productivity.as_path(),
            self.extra_productivity.as_path(),
            self.orders.as_path(),
        ]
    }
}

/// Flat CSV tables, one file per table, rewritten whole after each mutation.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    paths: DatasetPaths,
}

impl CsvStorage {
    pub fn new(paths: DatasetPaths) -> Result<Self> {
        for path in paths.all() {
            if let Some(parent) = path.parent() {
                ensure_dir(parent)?;
            }
        }
        Ok(Self { paths })
    }

    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::new(DatasetPaths::in_dir(dir))
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }
}

impl TableStorage for CsvStorage {
    fn load_ledger(&self, kind: SequenceKind, columns: &[String]) -> Result<LedgerSequence> {
        let path = self.paths.ledger(kind);
        let rows = read_ledger_rows(path, columns)?;
        tracing::debug!(table = kind.table_name(), rows = rows.len(), "ledger loaded");
        LedgerSequence::from_rows(kind, columns.to_vec(), rows)
    }

    fn save_ledger(&self, sequence: &LedgerSequence) -> Result<()> {
        let path = self.paths.ledger(sequence.kind());
        let mut header = vec![INDEX_COLUMN.to_string()];
        header.extend(sequence.columns().iter().cloned());
        let records = sequence.rows().iter().map(|row| {
            let mut record = vec![row.index.to_string()];
            record.extend(row.quantities.iter().map(f64::to_string));
            record
        });
        write_csv(path, |writer| {
            writer.write_record(&header)?;
            for record in records {
                writer.write_record(&record)?;
            }
            Ok(())
        })?;
        tracing::debug!(
            table = sequence.kind().table_name(),
            rows = sequence.len(),
            "ledger saved"
        );
        Ok(())
    }

    fn load_orders(&self) -> Result<Vec<OrderRecord>> {
        read_records(&self.paths.orders)
    }

    fn save_orders(&self, orders: &[OrderRecord]) -> Result<()> {
        write_records(&self.paths.orders, &ORDER_HEADERS, orders)
    }

    fn load_catalog(&self) -> Result<Catalog> {
        let varieties: Vec<Variety> = read_records(&self.paths.fruits)?;
        Ok(Catalog::from_varieties(varieties))
    }

    fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        write_records(&self.paths.fruits, &CATALOG_HEADERS, catalog.varieties())
    }

    fn load_plantation(&self) -> Result<Plantation> {
        let regions: Vec<Region> = read_records(&self.paths.plantations)?;
        Ok(Plantation::from_regions(regions))
    }

    fn save_plantation(&self, plantation: &Plantation) -> Result<()> {
        write_records(&self.paths.plantations, &REGION_HEADERS, plantation.regions())
    }

    fn is_blank(&self) -> Result<bool> {
        for path in self.paths.all() {
            if !path.exists() {
                continue;
            }
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_path(path)?;
            if reader.records().next().is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn read_ledger_rows(path: &Path, columns: &[String]) -> Result<Vec<LedgerRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let expected = std::iter::once(INDEX_COLUMN).chain(columns.iter().map(String::as_str));
    if !headers.iter().eq(expected) {
        return Err(OrchardError::Storage(format!(
            "`{}` has columns {:?}, expected index followed by {:?}",
            path.display(),
            headers.iter().collect::<Vec<_>>(),
            columns
        )));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let mut fields = record.iter();
        let index = fields
            .next()
            .and_then(parse_index)
            .ok_or_else(|| malformed(path, line))?;
        let quantities = fields
            .map(|value| value.trim().parse::<f64>().map_err(|_| malformed(path, line)))
            .collect::<Result<Vec<_>>>()?;
        rows.push(LedgerRow { index, quantities });
    }
    Ok(rows)
}

// Tables written by other tools may carry `3.0` style indexes.
fn parse_index(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(index) = value.parse::<u64>() {
        return Some(index);
    }
    let number = value.parse::<f64>().ok()?;
    (number.fract() == 0.0 && number >= 0.0 && number < u64::MAX as f64).then(|| number as u64)
}

fn malformed(path: &Path, line: usize) -> OrchardError {
    OrchardError::Storage(format!(
        "malformed value on line {} of `{}`",
        line + 2,
        path.display()
    ))
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    tracing::debug!(path = %path.display(), rows = records.len(), "table loaded");
    Ok(records)
}

fn write_records<T: Serialize>(path: &Path, headers: &[&str], records: &[T]) -> Result<()> {
    write_csv(path, |writer| {
        writer.write_record(headers)?;
        for record in records {
            writer.serialize(record)?;
        }
        Ok(())
    })?;
    tracing::debug!(path = %path.display(), rows = records.len(), "table saved");
    Ok(())
}

/// Header and records go out through one staged write.
fn write_csv<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<&mut std::fs::File>) -> std::result::Result<(), csv::Error>,
{
    persistence::write_atomic(path, |file| {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        fill(&mut writer)?;
        writer.flush()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::catalog::{AreaType, Category, VARIETY_COLUMNS};
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (CsvStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = CsvStorage::in_dir(temp.path()).expect("csv storage");
        (storage, temp)
    }

    fn columns() -> Vec<String> {
        VARIETY_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn missing_tables_load_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.is_blank().unwrap());
        let sequence = storage
            .load_ledger(SequenceKind::Inventory, &columns())
            .unwrap();
        assert!(sequence.is_empty());
        assert!(storage.load_orders().unwrap().is_empty());
        assert!(storage.load_catalog().unwrap().is_empty());
    }

    #[test]
    fn ledger_file_keeps_header_and_integer_formatting() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut sequence = LedgerSequence::new(SequenceKind::Inventory, columns());
        sequence.append_with("Gala", |q| q + 300.0).unwrap();
        storage.save_ledger(&sequence).unwrap();

        let text = fs::read_to_string(&storage.paths().inventory).unwrap();
        let mut lines = text.lines();
        let header =
            "index,Ambrosia,Gala,Honeycrisp,Lapins,Sweetheart,Skeena,Redhaven,Elberta,Cresthaven";
        assert_eq!(lines.next(), Some(header));
        assert_eq!(lines.next(), Some("1,0,300,0,0,0,0,0,0,0"));

        let reloaded = storage
            .load_ledger(SequenceKind::Inventory, &columns())
            .unwrap();
        assert_eq!(reloaded, sequence);
        assert!(!storage.is_blank().unwrap());
    }

    #[test]
    fn ledger_with_foreign_columns_is_rejected() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(&storage.paths().extra_productivity, "index,Fuji\n1,4\n").unwrap();
        let err = storage
            .load_ledger(SequenceKind::ExtraProductivity, &columns())
            .expect_err("header mismatch");
        assert!(matches!(err, OrchardError::Storage(_)), "unexpected: {err:?}");
    }

    #[test]
    fn empty_plantation_still_writes_header() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.save_plantation(&Plantation::new()).unwrap();
        let text = fs::read_to_string(&storage.paths().plantations).unwrap();
        assert_eq!(text.trim(), "regionId,fruit_type_num,variety,area,areaType");

        let region = Region::new(2, Category::Peach, "Elberta", 30.0, AreaType::Market);
        storage
            .save_plantation(&Plantation::from_regions(vec![region.clone()]))
            .unwrap();
        let loaded = storage.load_plantation().unwrap();
        assert_eq!(loaded.regions(), &[region]);
    }

    const LEDGER_HEADER: &str =
        "index,Ambrosia,Gala,Honeycrisp,Lapins,Sweetheart,Skeena,Redhaven,Elberta,Cresthaven";

    fn load_inventory_text(body: &str) -> Result<LedgerSequence> {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(&storage.paths().inventory, format!("{LEDGER_HEADER}\n{body}")).unwrap();
        storage.load_ledger(SequenceKind::Inventory, &columns())
    }

    #[test]
    fn whole_float_indexes_are_accepted() {
        let sequence = load_inventory_text("1.0,5,0,0,0,0,0,0,0,0\n2,5,1,0,0,0,0,0,0,0\n").unwrap();
        assert_eq!(sequence.current().unwrap().index, 2);
        assert_eq!(sequence.quantity("Gala"), Some(1.0));
    }

    #[test]
    fn fractional_index_is_rejected() {
        let err = load_inventory_text("1.9,5,0,0,0,0,0,0,0,0\n")
            .expect_err("fractional index");
        assert!(matches!(err, OrchardError::Storage(_)), "unexpected: {err:?}");
    }

    #[test]
    fn nan_quantity_is_rejected() {
        let err = load_inventory_text("1,NaN,0,0,0,0,0,0,0,0\n").expect_err("NaN quantity");
        assert!(matches!(err, OrchardError::Storage(_)), "unexpected: {err:?}");
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = load_inventory_text("1,-4,0,0,0,0,0,0,0,0\n").expect_err("negative quantity");
        assert!(err.to_string().contains("invalid quantity -4"), "unexpected: {err}");
    }
}
