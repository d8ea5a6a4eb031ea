// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use finhub::models::TxnType;
use finhub::storage::{self, BACKUP_VERSION};
use finhub::store::Store;
use rust_decimal::Decimal;
use tempfile::tempdir;

const LEGACY_DOC: &str = r##"{
  "appName": "Household",
  "accounts": [
    {"id": "a1", "name": "Savings", "icon": "🏦", "color": "#10b981", "openingBal": 1500.5},
    {"id": "a2", "name": "Cash", "icon": "💵", "color": "#8b5cf6", "openingBal": 0}
  ],
  "expCats": [
    {"id": "e1", "name": "Food", "icon": "🍽️", "color": "#f97316",
     "sub": [{"id": "e1s1", "name": "Restaurants"}]}
  ],
  "incCats": [{"id": "i1", "name": "Salary", "icon": "💼", "color": "#10b981"}],
  "transactions": [
    {"id": "t1", "date": "2026-02-01", "type": "income", "accountId": "a1",
     "catId": "i1", "subCatId": "", "amount": 1000, "note": ""},
    {"id": "t2", "date": "2026-02-03", "type": "expense", "accountId": "a1",
     "catId": "e1", "subCatId": "e1s1", "amount": 12.75, "note": "pizza"},
    {"id": "t3", "date": "2026-02-04", "type": "transfer", "accountId": "a1",
     "toAccountId": "a2", "catId": "", "subCatId": "", "amount": 100, "note": ""}
  ],
  "settings": {"uiMode": "ocean", "notifications": true,
               "reminderTimes": ["08:30"], "smsDetection": false}
}"##;

#[test]
fn loads_documents_written_by_older_versions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finhub.json");
    std::fs::write(&path, LEGACY_DOC).unwrap();

    let store = storage::load(&path).unwrap();
    assert_eq!(store.app_name, "Household");
    assert_eq!(store.accounts[0].opening_bal, "1500.5".parse::<Decimal>().unwrap());
    assert_eq!(store.transactions[0].sub_cat_id, None);
    assert_eq!(store.transactions[2].kind, TxnType::Transfer);
    assert_eq!(store.transactions[2].cat_id, None);
    assert_eq!(store.transactions[1].amount.to_string(), "12.75");
    assert!(!store.settings.carry_forward);
    assert_eq!(store.settings.reminder_times, vec!["08:30"]);

    let ledger = store.ledger();
    assert_eq!(ledger.balance_of("a1").unwrap().to_string(), "2387.75");
    assert_eq!(ledger.balance_of("a2").unwrap().to_string(), "100");
}

#[test]
fn save_then_load_preserves_the_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("finhub.json");
    let mut store = Store::with_defaults();
    store.set_carry_forward(true);
    store.add_reminder("07:15").unwrap();

    storage::save(&path, &store).unwrap();
    assert!(!path.with_extension("tmp").exists());

    let loaded = storage::load(&path).unwrap();
    assert_eq!(loaded.accounts, store.accounts);
    assert_eq!(loaded.expense_categories, store.expense_categories);
    assert_eq!(loaded.settings, store.settings);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.get("expCats").is_some());
    assert_eq!(raw["settings"]["carryForward"], serde_json::json!(true));
}

#[test]
fn missing_file_opens_as_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let (store, resolved) = storage::open_or_init(Some(path.as_path())).unwrap();
    assert_eq!(resolved, path);
    assert!(store.accounts.is_empty());
    assert_eq!(store.revision(), 0);
}

#[test]
fn backup_round_trip_restores_all_sections() {
    let dir = tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 2, 15, 9, 0, 0).unwrap();
    assert_eq!(storage::default_backup_name(now), "finance-backup-2026-02-15.json");

    let path = dir.path().join(storage::default_backup_name(now));
    let original = Store::with_defaults();
    storage::write_backup(&path, &original, now).unwrap();

    let backup = storage::read_backup(&path).unwrap();
    assert_eq!(backup.version, BACKUP_VERSION);
    assert_eq!(backup.backup_date, Some(now));

    let mut target = Store::new();
    backup.restore_into(&mut target);
    assert_eq!(target.accounts, original.accounts);
    assert_eq!(target.income_categories, original.income_categories);
    assert_eq!(target.revision(), 1);
}

#[test]
fn partial_backup_only_replaces_present_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(
        &path,
        r#"{"version": "6.2", "appName": "Restored", "transactions": []}"#,
    )
    .unwrap();

    let mut store = Store::with_defaults();
    let accounts = store.accounts.clone();
    storage::read_backup(&path).unwrap().restore_into(&mut store);
    assert_eq!(store.app_name, "Restored");
    assert_eq!(store.accounts, accounts);
}

#[test]
fn backup_without_version_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bogus.json");
    std::fs::write(&path, r#"{"accounts": []}"#).unwrap();
    assert!(storage::read_backup(&path).is_err());

    std::fs::write(&path, "not json").unwrap();
    assert!(storage::read_backup(&path).is_err());
}
