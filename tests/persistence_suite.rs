mod common;

use std::fs;

use orchard_core::{
    config::{Config, ConfigManager},
    core::Orchard,
    errors::ErrorKind,
    ledger::SequenceKind,
    storage::{CsvStorage, DatasetPaths, TableStorage},
};

use common::{fresh_dir, setup_orchard};

#[test]
fn tables_reload_identically_in_a_second_orchard() {
    let (mut orchard, dir) = setup_orchard();
    orchard.bootstrap().unwrap();
    orchard.add_inventory("Skeena", 25.5).unwrap();

    let reopened = Orchard::open_dir(&dir).unwrap();
    assert_eq!(reopened.catalog(), orchard.catalog());
    assert_eq!(reopened.plantation(), orchard.plantation());
    assert_eq!(reopened.orders().orders(), orchard.orders().orders());
    for kind in SequenceKind::ALL {
        assert_eq!(
            reopened.ledger().sequence(kind),
            orchard.ledger().sequence(kind),
            "{kind} differs after reload"
        );
    }
}

#[test]
fn csv_files_carry_headers_and_plain_values() {
    let (mut orchard, dir) = setup_orchard();
    orchard.bootstrap().unwrap();

    let paths = DatasetPaths::in_dir(&dir);
    let orders = fs::read_to_string(&paths.orders).unwrap();
    let mut lines = orders.lines();
    assert_eq!(
        lines.next(),
        Some("index,sales_type,fruit_type,fruit_variety,weight,unit_price,revenue")
    );
    assert!(orders.contains("picking,2,Lapins"));

    let remaining = fs::read_to_string(&paths.remaining_productivity).unwrap();
    assert!(remaining.starts_with("index,Ambrosia,Gala,Honeycrisp,Lapins"));
    assert!(remaining.lines().nth(1).unwrap().starts_with("1,30000,0,0,40000"));

    let regions = fs::read_to_string(&paths.plantations).unwrap();
    assert!(regions.contains("1,1,Ambrosia,20"));
    assert!(regions.contains("market"));
    assert!(!paths.orders.with_extension("csv.tmp").exists());
}

#[test]
fn corrupted_ledger_file_fails_to_open() {
    let dir = fresh_dir();
    let paths = DatasetPaths::in_dir(&dir);
    fs::write(
        &paths.inventory,
        "index,Ambrosia,Gala,Honeycrisp,Lapins,Sweetheart,Skeena,Redhaven,Elberta,Cresthaven\n\
         1,0,0,0,0,0,0,0,0,0\n\
         3,0,0,0,0,0,0,0,0,0\n",
    )
    .unwrap();
    let err = Orchard::open_dir(&dir).err().expect("index gap must fail");
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn config_bootstraps_only_blank_datasets() {
    let base = fresh_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let orchard = Orchard::from_config(&manager).unwrap();
    assert_eq!(orchard.orders().len(), 3);
    drop(orchard);

    let again = Orchard::from_config(&manager).unwrap();
    assert_eq!(again.orders().len(), 3);

    let storage = CsvStorage::in_dir(&base.join("data")).unwrap();
    assert!(!storage.is_blank().unwrap());
}

#[test]
fn disabled_bootstrap_leaves_dataset_empty() {
    let base = fresh_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let custom = base.join("orchard-data");
    manager
        .save(&Config {
            data_dir: Some(custom.clone()),
            bootstrap_on_empty: false,
        })
        .unwrap();
    let orchard = Orchard::from_config(&manager).unwrap();
    assert!(orchard.is_blank());
    assert!(custom.is_dir());
}
