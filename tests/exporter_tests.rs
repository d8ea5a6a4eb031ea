// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use finhub::export::{ExportSummary, build_rows};
use finhub::models::TxnType;
use finhub::store::{Store, TxnDraft};
use finhub::{cli, commands::exporter};
use serde_json::json;
use tempfile::tempdir;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn draft(date: &str, kind: TxnType, cat: Option<&str>, sub: Option<&str>, amount: &str) -> TxnDraft {
    TxnDraft {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        kind,
        account_id: "a1".into(),
        to_account_id: (kind == TxnType::Transfer).then(|| "a2".to_string()),
        cat_id: cat.map(Into::into),
        sub_cat_id: sub.map(Into::into),
        amount: amount.parse().unwrap(),
        note: String::new(),
    }
}

fn base_store() -> Store {
    let mut store = Store::with_defaults();
    store
        .add_transaction(TxnDraft {
            note: "Weekly run".into(),
            ..draft("2026-02-02", TxnType::Expense, Some("e1"), Some("e1s2"), "12.34")
        })
        .unwrap();
    store
        .add_transaction(draft("2026-02-05", TxnType::Income, Some("i1"), None, "1000"))
        .unwrap();
    store
        .add_transaction(draft("2026-02-06", TxnType::Transfer, None, None, "250"))
        .unwrap();
    store
        .add_transaction(draft("2026-01-20", TxnType::Expense, Some("e2"), None, "40"))
        .unwrap();
    store
}

fn run_export(store: &Store, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["finhub", "export", "transactions"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(store, now(), export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let store = base_store();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&store, &["--format", "json", "--out", &out_str, "--type", "expense"]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2026-02-02",
                "amount": "-12.34",
                "category": "Food & Dining / Groceries",
                "remarks": "Weekly run",
                "type": "expense"
            }
        ])
    );
}

#[test]
fn export_csv_has_bom_header_and_signed_amounts() {
    let store = base_store();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&store, &["--out", &out_str]).unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Date,Amount,Category,Remarks,Type");
    assert_eq!(lines[1], "06 Feb 2026,0.00,,,Transfer");
    assert_eq!(lines[2], "05 Feb 2026,1000.00,Salary,,Income");
    assert_eq!(lines[3], "02 Feb 2026,-12.34,Food & Dining / Groceries,Weekly run,Expense");
    assert_eq!(lines.len(), 4);
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let store = base_store();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(run_export(&store, &["--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

#[test]
fn export_summary_nets_income_against_expense() {
    let store = base_store();
    let ledger = store.ledger();
    let all: Vec<_> = store.transactions.iter().collect();
    let rows = build_rows(&ledger, &all);
    assert_eq!(rows[0].date.to_string(), "2026-02-06");

    let s = ExportSummary::from_rows(&rows);
    assert_eq!(s.count, 4);
    assert_eq!(s.income.to_string(), "1000");
    assert_eq!(s.expense.to_string(), "52.34");
    assert_eq!(s.net.to_string(), "947.66");
}
