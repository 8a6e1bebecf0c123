//! Binary tests for the `mealpool` command line

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mealpool(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mealpool").unwrap();
    cmd.env("MEALPOOL_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn run(data_dir: &TempDir, args: &[&str]) {
    mealpool(data_dir).args(args).assert().success();
}

#[test]
fn init_creates_data_files() {
    let data_dir = TempDir::new().unwrap();

    mealpool(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("members.json").exists());
    assert!(data_dir.path().join("data").join("transactions.json").exists());
}

#[test]
fn summary_shows_meal_rate_and_balances() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["init"]);
    run(&data_dir, &["member", "add", "Arif"]);
    run(&data_dir, &["member", "add", "Bina"]);
    run(&data_dir, &["deposit", "Arif", "1000", "--date", "2025-05-01"]);
    run(&data_dir, &["deposit", "Bina", "500", "--date", "2025-05-01"]);
    run(&data_dir, &["expense", "Arif", "300", "--date", "2025-05-02"]);
    run(&data_dir, &["meal", "Arif", "--count", "10", "--date", "2025-05-03"]);
    run(&data_dir, &["meal", "bina", "--count", "5", "--date", "2025-05-03"]);

    mealpool(&data_dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("$20.00"))
        .stdout(predicate::str::contains("$800.00"))
        .stdout(predicate::str::contains("$400.00"))
        .stdout(predicate::str::contains("$1200.00"));
}

#[test]
fn summary_exports_csv() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["member", "add", "Arif"]);
    run(&data_dir, &["deposit", "Arif", "250"]);

    let out = data_dir.path().join("summary.csv");
    mealpool(&data_dir)
        .args(["summary", "--csv"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary exported to"));

    let text = std::fs::read_to_string(out).unwrap();
    assert!(text.starts_with("Member,"));
    assert!(text.contains("Arif,0,0.00,250.00"));
}

#[test]
fn shared_expense_needs_members() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["member", "add", "Arif"]);

    mealpool(&data_dir)
        .args(["shared", "Arif", "90", "--with", "Arif", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    mealpool(&data_dir)
        .args(["shared", "Arif", "90"])
        .assert()
        .failure();
}

#[test]
fn duplicate_member_rejected() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["member", "add", "Arif"]);

    mealpool(&data_dir)
        .args(["member", "add", "ARIF"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn remove_requires_force() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["member", "add", "Arif"]);
    run(&data_dir, &["deposit", "Arif", "100"]);

    mealpool(&data_dir)
        .args(["member", "remove", "Arif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force to confirm removal"));

    mealpool(&data_dir)
        .args(["member", "remove", "Arif", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions deleted: 1"));

    mealpool(&data_dir)
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No members found."));
}

#[test]
fn history_for_member() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["member", "add", "Arif"]);
    run(&data_dir, &["member", "add", "Bina"]);
    run(&data_dir, &["deposit", "Arif", "400", "--date", "2025-05-01"]);
    run(
        &data_dir,
        &["shared", "Bina", "100", "--with", "Arif", "Bina", "--date", "2025-05-02"],
    );

    mealpool(&data_dir)
        .args(["history", "--member", "Arif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History: Arif"))
        .stdout(predicate::str::contains("Current Balance: $350.00"));
}

#[test]
fn txn_list_filters_by_type() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["member", "add", "Arif"]);
    run(&data_dir, &["deposit", "Arif", "400"]);
    run(&data_dir, &["meal", "Arif", "--lunch", "1"]);

    mealpool(&data_dir)
        .args(["txn", "list", "--type", "meal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 1 transactions"));

    mealpool(&data_dir)
        .args(["txn", "list", "--type", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid type"));
}
