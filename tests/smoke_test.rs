mod common;

use orchard_core::{catalog::Category, init, ledger::SequenceKind, reporting::ReportService};

use common::setup_orchard;

#[test]
fn orchard_season_smoke() {
    init();

    let (mut orchard, _dir) = setup_orchard();
    orchard.bootstrap().expect("bootstrap demo dataset");

    let august: Vec<_> = orchard
        .catalog()
        .available_in(8)
        .into_iter()
        .map(|fruit| fruit.name.as_str())
        .collect();
    assert_eq!(august, vec!["Elberta"]);

    let history =
        ReportService::history(orchard.ledger(), SequenceKind::Inventory, Category::Apple);
    assert_eq!(history.columns, vec!["Ambrosia", "Gala", "Honeycrisp"]);
    assert_eq!(history.rows.last().unwrap().1, vec![250.0, 300.0, 300.0]);

    let balances = ReportService::current_balances(orchard.ledger());
    assert!(balances.iter().all(|(_, row)| row.is_some()));
}
