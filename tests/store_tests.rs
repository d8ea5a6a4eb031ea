// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finhub::error::{EntityKind, LedgerError};
use finhub::models::{CategoryKind, TxnType, UiMode};
use finhub::store::{AccountDraft, CategoryDraft, CategoryPatch, Store, TxnDraft};
use rust_decimal::Decimal;

fn expense(cat: &str, sub: Option<&str>, amount: &str) -> TxnDraft {
    TxnDraft {
        date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        kind: TxnType::Expense,
        account_id: "a1".into(),
        to_account_id: None,
        cat_id: Some(cat.into()),
        sub_cat_id: sub.map(Into::into),
        amount: amount.parse().unwrap(),
        note: "lunch".into(),
    }
}

#[test]
fn category_with_transactions_cannot_be_deleted() {
    let mut store = Store::with_defaults();
    store.add_transaction(expense("e1", Some("e1s1"), "12")).unwrap();
    store.add_transaction(expense("e1", None, "8")).unwrap();
    let before = store.clone();

    let err = store.delete_category(CategoryKind::Expense, "e1").unwrap_err();
    assert_eq!(
        err,
        LedgerError::HasTransactions {
            kind: EntityKind::ExpenseCategory,
            id: "e1".into(),
            count: 2,
        }
    );
    assert_eq!(store.expense_categories, before.expense_categories);
    assert_eq!(store.revision(), before.revision());

    store.delete_category(CategoryKind::Expense, "e2").unwrap();
    assert!(store.expense_category("e2").is_none());
}

#[test]
fn sub_category_with_transactions_cannot_be_deleted() {
    let mut store = Store::with_defaults();
    store.add_transaction(expense("e1", Some("e1s1"), "12")).unwrap();

    let err = store.delete_sub_category("e1", "e1s1").unwrap_err();
    assert!(matches!(err, LedgerError::HasTransactions { count: 1, .. }));
    assert!(store.expense_category("e1").unwrap().sub_category("e1s1").is_some());

    store.delete_sub_category("e1", "e1s2").unwrap();
    assert!(store.expense_category("e1").unwrap().sub_category("e1s2").is_none());
}

#[test]
fn editing_a_category_keeps_its_sub_categories() {
    let mut store = Store::with_defaults();
    let subs = store.expense_category("e1").unwrap().sub.clone();
    store
        .update_category(
            CategoryKind::Expense,
            "e1",
            CategoryPatch {
                name: Some("Eating".into()),
                color: Some("#123abc".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let cat = store.expense_category("e1").unwrap();
    assert_eq!(cat.name, "Eating");
    assert_eq!(cat.color, "#123abc");
    assert_eq!(cat.icon, "🍽️");
    assert_eq!(cat.sub, subs);
}

#[test]
fn account_delete_keeps_historical_transactions() {
    let mut store = Store::with_defaults();
    let id = store.add_transaction(expense("e1", None, "5")).unwrap();
    store.delete_account("a1").unwrap();
    assert_eq!(store.transaction(&id).unwrap().account_id, "a1");
    assert!(store.account("a1").is_none());
}

#[test]
fn transaction_shape_is_validated() {
    let mut store = Store::with_defaults();

    let zero = expense("e1", None, "0");
    assert!(matches!(
        store.add_transaction(zero),
        Err(LedgerError::Validation(_))
    ));

    let wrong_sub = expense("e1", Some("e2s1"), "5");
    assert!(matches!(
        store.add_transaction(wrong_sub),
        Err(LedgerError::Validation(_))
    ));

    let self_transfer = TxnDraft {
        kind: TxnType::Transfer,
        to_account_id: Some("a1".into()),
        cat_id: None,
        sub_cat_id: None,
        ..expense("e1", None, "5")
    };
    assert!(store.add_transaction(self_transfer).is_err());

    let income_with_expense_cat = TxnDraft {
        kind: TxnType::Income,
        sub_cat_id: None,
        ..expense("e1", None, "5")
    };
    assert_eq!(
        store.add_transaction(income_with_expense_cat),
        Err(LedgerError::not_found(EntityKind::IncomeCategory, "e1"))
    );

    let unknown_account = TxnDraft {
        account_id: "nope".into(),
        ..expense("e1", None, "5")
    };
    assert_eq!(
        store.add_transaction(unknown_account),
        Err(LedgerError::not_found(EntityKind::Account, "nope"))
    );

    assert!(store.transactions.is_empty());
    assert_eq!(store.revision(), 0);
}

#[test]
fn replace_transaction_keeps_id_and_position() {
    let mut store = Store::with_defaults();
    let first = store.add_transaction(expense("e1", None, "5")).unwrap();
    store.add_transaction(expense("e2", None, "6")).unwrap();

    let mut d = TxnDraft::from_transaction(store.transaction(&first).unwrap());
    d.amount = Decimal::new(725, 2);
    d.note = "dinner".into();
    store.replace_transaction(&first, d).unwrap();

    assert_eq!(store.transactions[0].id, first);
    assert_eq!(store.transactions[0].amount.to_string(), "7.25");
    assert_eq!(store.transactions[0].note, "dinner");
}

#[test]
fn new_entities_get_fresh_ids_and_validated_colors() {
    let mut store = Store::with_defaults();
    let acct = store
        .add_account(AccountDraft {
            name: "  Brokerage ".into(),
            color: "#0f0f0f".into(),
            ..Default::default()
        })
        .unwrap();
    assert!(acct.starts_with('a'));
    assert_eq!(store.account(&acct).unwrap().name, "Brokerage");

    let bad = store.add_category(
        CategoryKind::Income,
        CategoryDraft {
            name: "Gifts".into(),
            color: "green".into(),
            ..Default::default()
        },
    );
    assert!(matches!(bad, Err(LedgerError::Validation(_))));

    let sub = store.add_sub_category("e9", "Electricity").unwrap();
    assert!(sub.starts_with("e9s"));
    assert_ne!(sub, "e9s1");
    assert!(store.add_sub_category("e9", "   ").is_err());
}

#[test]
fn reminders_stay_sorted_and_unique() {
    let mut store = Store::new();
    store.add_reminder("13:05").unwrap();
    store.add_reminder("09:00").unwrap();
    assert_eq!(store.settings.reminder_times, vec!["09:00", "13:05", "21:00"]);
    assert!(store.add_reminder("25:00").is_err());
    assert!(store.remove_reminder("21:00"));
    assert!(!store.remove_reminder("21:00"));

    store.set_notifications(true);
    let schedule = store.settings.reminder_schedule();
    assert!(schedule.enabled);
    assert_eq!(schedule.times, ["09:00", "13:05"]);
}

#[test]
fn remove_reminder_accepts_unpadded_hours() {
    let mut store = Store::new();
    store.add_reminder("7:30").unwrap();
    assert_eq!(store.settings.reminder_times, vec!["07:30", "21:00"]);
    let revision = store.revision();

    assert!(store.remove_reminder(" 7:30 "));
    assert!(store.remove_reminder("21:00"));
    assert!(store.settings.reminder_times.is_empty());
    assert_eq!(store.revision(), revision + 2);

    assert!(!store.remove_reminder("not a time"));
    assert_eq!(store.revision(), revision + 2);
}

#[test]
fn ui_mode_auto_follows_system_preference() {
    let mut store = Store::new();
    assert_eq!(store.settings.ui_mode().resolve(true), UiMode::Dark);
    assert_eq!(store.settings.ui_mode().resolve(false), UiMode::Light);
    store.set_ui_mode(UiMode::Ocean);
    assert_eq!(store.settings.ui_mode().resolve(true), UiMode::Ocean);
}

#[test]
fn defaults_seed_only_an_empty_ledger() {
    let mut store = Store::new();
    assert!(store.seed_defaults());
    assert_eq!(store.accounts.len(), 4);
    assert_eq!(store.expense_categories.len(), 11);
    assert_eq!(store.income_categories.len(), 8);
    assert!(!store.seed_defaults());
}
