use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quarterbook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quarterbook").unwrap();
    cmd.env("QUARTERBOOK_DATA_DIR", dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn init(dir: &TempDir) {
    quarterbook(dir).arg("init").assert().success();
}

fn add(dir: &TempDir, args: &[&str]) {
    quarterbook(dir)
        .args(["txn", "add"])
        .args(args)
        .assert()
        .success();
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    quarterbook(&dir)
        .args(["settings", "quarters", "02-01", "05-01", "08-01", "11-01"])
        .assert()
        .success();

    quarterbook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q1 starts 02-01"));
}

#[test]
fn test_commands_require_init() {
    let dir = TempDir::new().unwrap();
    quarterbook(&dir)
        .arg("totals")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quarterbook init"));
}

#[test]
fn test_add_and_totals_with_tax() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(
        &dir,
        &[
            "--quarter", "1", "--type", "income", "--amount", "100", "--tax", "10",
            "--description", "Consulting", "--date", "2024-02-01", "--year", "2024",
        ],
    );

    quarterbook(&dir)
        .args(["totals", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$100.00"));

    quarterbook(&dir)
        .args(["totals", "--year", "2024", "--with-tax"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$110.00"));
}

#[test]
fn test_add_requires_description() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    quarterbook(&dir)
        .args(["txn", "add", "--quarter", "1", "--type", "income", "--amount", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Description is required"));
}

#[test]
fn test_add_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    quarterbook(&dir)
        .args([
            "txn", "add", "--type", "income", "--amount", "5", "--description", "x", "--date",
            "02/01/2024",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_quarter_resolved_from_date() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(
        &dir,
        &[
            "--type", "expenditure", "--amount", "20", "--description", "Paper", "--date",
            "2024-08-15",
        ],
    );

    quarterbook(&dir)
        .args(["txn", "list", "--quarter", "3", "--type", "expenditure", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paper"));
}

#[test]
fn test_list_and_delete() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(
        &dir,
        &[
            "--quarter", "2", "--type", "expenditure", "--amount", "50", "--description",
            "Rent", "--date", "2024-05-01",
        ],
    );

    let output = quarterbook(&dir)
        .args(["txn", "list", "-q", "2", "-t", "expenditure", "-y", "2024"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find(|l| l.contains("Rent"))
        .and_then(|l| l.split_whitespace().next())
        .unwrap()
        .to_string();

    quarterbook(&dir)
        .args(["txn", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted transaction"));

    quarterbook(&dir)
        .args(["txn", "list", "-q", "2", "-t", "expenditure", "-y", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));

    quarterbook(&dir)
        .args(["txn", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_quarters_update_needs_confirmation_to_prune() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(
        &dir,
        &[
            "--quarter", "1", "--type", "income", "--amount", "10", "--description", "Old",
            "--date", "1999-01-10",
        ],
    );

    quarterbook(&dir)
        .args(["settings", "quarters", "01-01", "04-01", "07-01", "10-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));

    quarterbook(&dir)
        .args(["txn", "list", "-q", "1", "-t", "income", "-y", "1999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old"));

    quarterbook(&dir)
        .args(["settings", "quarters", "01-01", "04-01", "07-01", "10-01", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 transaction(s)."));

    quarterbook(&dir)
        .args(["txn", "list", "-q", "1", "-t", "income", "-y", "1999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn test_invalid_boundary() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    quarterbook(&dir)
        .args(["settings", "quarters", "01-01", "04-31", "07-01", "10-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MM-DD"));
}

#[test]
fn test_prefs_currency_changes_totals() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    quarterbook(&dir)
        .args(["prefs", "currency", "eur"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EUR"));

    quarterbook(&dir)
        .args(["totals", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€0.00"));

    quarterbook(&dir)
        .args(["prefs", "currency", "CHF"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown currency"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("data").join("user_currency")).unwrap(),
        "EUR"
    );
}

#[test]
fn test_export_then_import() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(
        &dir,
        &[
            "--quarter", "2", "--type", "income", "--amount", "200", "--description",
            "Sale, big", "--date", "2024-05-02",
        ],
    );
    add(
        &dir,
        &[
            "--quarter", "1", "--type", "expenditure", "--amount", "30", "--description",
            "Tools", "--date", "2024-02-02",
        ],
    );

    quarterbook(&dir)
        .args(["export", "--quarter", "2", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("accounting_export_all_2_income_"));

    let exported = std::fs::read_dir(dir.path().join("exports"))
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let content = std::fs::read_to_string(&exported).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("\"Sale, big\""));

    let other = TempDir::new().unwrap();
    init(&other);
    quarterbook(&other)
        .arg("import")
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 rows"));

    quarterbook(&other)
        .args(["totals", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$200.00"));
}

#[test]
fn test_import_without_year_column() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let file = dir.path().join("no_year.csv");
    std::fs::write(
        &file,
        "Quarter,Type,Amount,Date\n1,income,10,2024-01-05\n2,expenditure,4,2024-04-05\n",
    )
    .unwrap();

    quarterbook(&dir)
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid rows found"));
}

#[test]
fn test_audit_lists_changes() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(
        &dir,
        &[
            "--quarter", "1", "--type", "income", "--amount", "1", "--description", "Tip",
            "--date", "2024-01-02",
        ],
    );

    quarterbook(&dir)
        .args(["audit", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE").and(predicate::str::contains("Transaction")));
}
