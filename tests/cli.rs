use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Every invocation gets its own HOME so settings and data never leak
/// between tests (or into the real user profile).
fn hucha(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hucha").unwrap();
    cmd.env("HOME", home);
    cmd
}

fn init(home: &Path) {
    let data_dir = home.join("data");
    hucha(home)
        .arg("init")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
}

#[test]
fn test_help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    hucha(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("categorize"));
}

#[test]
fn test_import_categorize_stats_flow() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    let csv_path = home.path().join("movs.csv");
    std::fs::write(
        &csv_path,
        "Fecha operación,Concepto,Importe\n\
         01/03/2024,COMPRA MERCADONA VALENCIA,\"-45,20\"\n\
         02/03/2024,NOMINA EMPRESA SL,\"1.500,00\"\n",
    )
    .unwrap();

    hucha(home.path())
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 added"))
        .stdout(predicate::str::contains("2 categorized"));

    // Same file again: caught by checksum before parsing.
    hucha(home.path())
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"));

    hucha(home.path())
        .args(["stats", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("1.500,00"));
}

#[test]
fn test_row_dedup_across_files() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    let first = home.path().join("a.csv");
    std::fs::write(
        &first,
        "Fecha,Concepto,Importe\n01/03/2024,COMPRA LIDL,\"-10,00\"\n",
    )
    .unwrap();
    let second = home.path().join("b.csv");
    std::fs::write(
        &second,
        "Fecha,Concepto,Importe\n\
         01/03/2024,COMPRA LIDL,\"-10,00\"\n\
         02/03/2024,COMPRA ALDI,\"-20,00\"\n",
    )
    .unwrap();

    hucha(home.path())
        .arg("import")
        .arg(&first)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 added"));

    hucha(home.path())
        .arg("import")
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 added"))
        .stdout(predicate::str::contains("1 duplicates skipped"));
}

#[test]
fn test_note_records_notification() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    hucha(home.path())
        .args([
            "note",
            "Pago con Visa por 12,34EUR\nCARREFOUR MADRID",
            "--app",
            "com.google.wallet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded"))
        .stdout(predicate::str::contains("CARREFOUR MADRID"));

    hucha(home.path())
        .arg("register")
        .assert()
        .success()
        .stdout(predicate::str::contains("CARREFOUR MADRID"))
        .stdout(predicate::str::contains("Google Wallet"));
}

#[test]
fn test_rules_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    hucha(home.path())
        .args(["rules", "add", "GIMNASIO MUNICIPAL 42", "--category", "Leisure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added rule"));

    hucha(home.path())
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GIMNASIO MUNICIPAL"))
        .stdout(predicate::str::contains("Leisure"));

    hucha(home.path())
        .args(["rules", "add", "X", "--category", "No Existe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_default_category_is_protected() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    hucha(home.path())
        .args(["categories", "delete", "Groceries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be deleted"));
}

#[test]
fn test_unsupported_format_fails() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    hucha(home.path())
        .args(["import", "movimientos.ofx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

#[test]
fn test_export_writes_csv() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    let csv_path = home.path().join("movs.csv");
    std::fs::write(
        &csv_path,
        "Fecha,Concepto,Importe\n01/03/2024,COMPRA MERCADONA,\"-45,20\"\n",
    )
    .unwrap();
    hucha(home.path()).arg("import").arg(&csv_path).assert().success();

    let out = home.path().join("export.csv");
    hucha(home.path())
        .arg("export")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 transactions"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("COMPRA MERCADONA"));
    assert!(content.contains("-45.20"));
}
