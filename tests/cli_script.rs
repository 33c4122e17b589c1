use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::str::contains;

fn script_command(home: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("orchard_cli").unwrap();
    cmd.env("ORCHARD_CLI_SCRIPT", "1")
        .env("ORCHARD_CORE_HOME", home.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_runs_bootstrap_and_sell_flow() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("config.json")
        .write_str(r#"{ "bootstrap_on_empty": false }"#)
        .unwrap();

    script_command(&home)
        .write_stdin("bootstrap\nsell Ambrosia 10\norders\nexit\n")
        .assert()
        .success()
        .stdout(contains("Demo dataset loaded"))
        .stdout(contains("Order 4 recorded: selling 10 Ambrosia at 1.20, revenue 12.00"))
        .stdout(contains("picking"));

    home.child("data/orders.csv")
        .assert(predicates::str::contains("4,selling,1,Ambrosia"));
}

#[test]
fn blank_home_is_bootstrapped_on_start() {
    let home = assert_fs::TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("remaining\nrevenue sales_type\n")
        .assert()
        .success()
        .stdout(contains("Remaining productivity (row 7)"))
        .stdout(contains("119.60"));
}

#[test]
fn mistakes_get_suggestions_without_stopping_the_script() {
    let home = assert_fs::TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("invetory\nsell Lapinz 4\ncheck Lapins 600\nversion\n")
        .assert()
        .success()
        .stdout(contains("Suggestion: `inventory`?"))
        .stdout(contains("Did you mean `Lapins`?"))
        .stdout(contains("Not enough Lapins in inventory, only 500 left"))
        .stdout(contains("Orchard Core 0.0.1"));
}

#[test]
fn unpriced_sale_exits_with_error() {
    let home = assert_fs::TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("sell Gala 10\n")
        .assert()
        .failure()
        .stderr(contains("No unit price configured for Gala"));
}
