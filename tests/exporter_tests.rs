// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use housebudget::{cli, commands::exporter, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO categories(id, name) VALUES (1, 'Groceries')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO transactions(amount, date, description, category_id, is_income) VALUES \
        ('12.34', '2025-01-02', 'Corner \"Shop\", weekly run', 1, 0)",
        [],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["housebudget", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_csv_escapes_quotes() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("january.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, &["csv", "--month", "2025-01", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(
        contents,
        "Date,Category,Description,Amount,Type\n\
         2025-01-02,\"Groceries\",\"Corner \"\"Shop\"\", weekly run\",12.34,Expense\n"
    );
}

#[test]
fn export_txt_monthly_report() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("january.txt");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &["txt", "--month", "2025-01", "--out", &out_str, "--lang", "pl"],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.starts_with("=== RAPORT MIESIĘCZNY - STYCZEŃ 2025 ==="));
    assert!(contents.contains("-12.34 zł"));
}

#[test]
fn export_rejects_unknown_language() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.txt");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(run_export(&conn, &["txt", "--year", "2025", "--out", &out_str, "--lang", "xx"]).is_err());
    assert!(!out_path.exists());
}
