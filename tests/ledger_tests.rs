// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use finhub::ledger::{DrillTarget, TREND_MONTHS};
use finhub::models::{Account, CategoryKind, Transaction, TxnType};
use finhub::period::{DateRange, Period, resolve};
use finhub::store::{AccountPatch, Store, TxnDraft};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn now(s: &str) -> NaiveDateTime {
    d(s).and_hms_opt(12, 0, 0).unwrap()
}

fn draft(date: &str, kind: TxnType, account: &str, amount: &str) -> TxnDraft {
    TxnDraft {
        date: d(date),
        kind,
        account_id: account.into(),
        to_account_id: None,
        cat_id: None,
        sub_cat_id: None,
        amount: amount.parse().unwrap(),
        note: String::new(),
    }
}

fn expense(date: &str, account: &str, cat: &str, sub: Option<&str>, amount: &str) -> TxnDraft {
    TxnDraft {
        cat_id: Some(cat.into()),
        sub_cat_id: sub.map(Into::into),
        ..draft(date, TxnType::Expense, account, amount)
    }
}

fn income(date: &str, account: &str, cat: &str, amount: &str) -> TxnDraft {
    TxnDraft {
        cat_id: Some(cat.into()),
        ..draft(date, TxnType::Income, account, amount)
    }
}

fn transfer(date: &str, from: &str, to: &str, amount: &str) -> TxnDraft {
    TxnDraft {
        to_account_id: Some(to.into()),
        ..draft(date, TxnType::Transfer, from, amount)
    }
}

/// Effect of `t` on the balance of `account_id`.
fn delta_for(t: &Transaction, account_id: &str) -> Decimal {
    let mut delta = Decimal::ZERO;
    if t.account_id == account_id {
        delta += match t.kind {
            TxnType::Transfer => -t.amount,
            _ => t.signed_amount(),
        };
    }
    if t.kind == TxnType::Transfer && t.to_account_id.as_deref() == Some(account_id) {
        delta += t.amount;
    }
    delta
}

fn seeded() -> Store {
    let mut store = Store::with_defaults();
    for t in [
        income("2026-01-20", "a1", "i1", "2500"),
        expense("2026-01-22", "a3", "e3", Some("e3s1"), "900"),
        income("2026-02-01", "a1", "i1", "1000"),
        expense("2026-02-03", "a1", "e1", Some("e1s2"), "120.50"),
        expense("2026-02-09", "a4", "e1", Some("e1s1"), "45.25"),
        expense("2026-02-14", "a2", "e2", Some("e2s1"), "60"),
        transfer("2026-02-10", "a1", "a4", "200"),
        income("2026-02-12", "a2", "i2", "300"),
    ] {
        store.add_transaction(t).unwrap();
    }
    store
}

#[test]
fn concrete_month_scenario() {
    let mut store = Store::with_defaults();
    store.add_transaction(income("2026-02-01", "a1", "i1", "1000")).unwrap();
    store
        .add_transaction(expense("2026-02-10", "a1", "e1", None, "300"))
        .unwrap();

    let ledger = store.ledger();
    let range = resolve(Period::MonthToDate, now("2026-02-15"), None, None);
    let totals = ledger.period_totals(&range);
    assert_eq!(totals.income, dec("1000"));
    assert_eq!(totals.expense, dec("300"));
    assert_eq!(ledger.balance_of("a1"), Some(dec("700")));
    assert_eq!(ledger.net_balance(), dec("700"));
}

#[test]
fn transfer_moves_money_without_changing_net() {
    let mut store = Store::with_defaults();
    store
        .update_account(
            "a1",
            AccountPatch {
                opening_bal: Some(dec("500")),
                ..Default::default()
            },
        )
        .unwrap();
    let before = store.ledger().net_balance();
    store
        .add_transaction(transfer("2026-02-10", "a1", "a2", "200"))
        .unwrap();

    let ledger = store.ledger();
    assert_eq!(ledger.balance_of("a1"), Some(dec("300")));
    assert_eq!(ledger.balance_of("a2"), Some(dec("200")));
    assert_eq!(ledger.net_balance(), dec("500"));
    assert_eq!(before, ledger.net_balance());

    let range = DateRange::days(d("2026-02-01"), d("2026-02-28"));
    let totals = ledger.period_totals(&range);
    assert_eq!(totals.income, Decimal::ZERO);
    assert_eq!(totals.expense, Decimal::ZERO);
}

#[test]
fn balance_identity_holds_for_every_account() {
    let store = seeded();
    let ledger = store.ledger();
    for b in ledger.account_balances() {
        let expected: Decimal = store
            .transactions
            .iter()
            .map(|t| delta_for(t, &b.account_id))
            .sum::<Decimal>()
            + b.opening;
        assert_eq!(b.balance, expected, "account {}", b.account_id);
    }
    let a1 = ledger.account_balances().into_iter().find(|b| b.account_id == "a1").unwrap();
    assert_eq!(a1.income, dec("3500"));
    assert_eq!(a1.transfers_out, dec("200"));
    assert_eq!(a1.balance, dec("3179.50"));
}

#[test]
fn balances_do_not_depend_on_transaction_order() {
    let store = seeded();
    let mut reversed = store.clone();
    reversed.transactions.reverse();
    assert_eq!(
        store.ledger().account_balances(),
        reversed.ledger().account_balances()
    );
}

#[test]
fn net_balance_equals_opening_plus_income_minus_expense() {
    let store = seeded();
    let ledger = store.ledger();
    let opening: Decimal = store.accounts.iter().map(|a| a.opening_bal).sum();
    let flow: Decimal = store.transactions.iter().map(Transaction::signed_amount).sum();
    assert_eq!(ledger.net_balance(), opening + flow);
}

#[test]
fn two_halves_of_a_month_partition_its_totals() {
    let store = seeded();
    let ledger = store.ledger();
    let month = resolve(Period::MonthToDate, now("2026-02-28"), None, None);
    let first = DateRange::days(d("2026-02-01"), d("2026-02-14"));
    let second = DateRange::days(d("2026-02-15"), d("2026-02-28"));

    let whole = ledger.period_totals(&month);
    let a = ledger.period_totals(&first);
    let b = ledger.period_totals(&second);
    assert_eq!(whole.income, a.income + b.income);
    assert_eq!(whole.expense, a.expense + b.expense);
    assert_eq!(whole.count, a.count + b.count);
}

#[test]
fn breakdowns_reconcile_with_period_totals() {
    let store = seeded();
    let ledger = store.ledger();
    let range = DateRange::days(d("2026-02-01"), d("2026-02-28"));
    let totals = ledger.period_totals(&range);

    let exp = ledger.category_breakdown(CategoryKind::Expense, &range);
    let inc = ledger.category_breakdown(CategoryKind::Income, &range);
    assert_eq!(exp.iter().map(|c| c.value).sum::<Decimal>(), totals.expense);
    assert_eq!(inc.iter().map(|c| c.value).sum::<Decimal>(), totals.income);

    assert_eq!(exp[0].cat_id, "e1");
    assert_eq!(exp[0].value, dec("165.75"));
    assert_eq!(exp[0].count, 2);
    assert!(exp.windows(2).all(|w| w[0].value >= w[1].value));
    assert!(exp.iter().all(|c| c.cat_id != "e3"));

    let subs = ledger.sub_category_breakdown(&range, Some("e1"));
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].sub_cat_id, "e1s2");
    assert_eq!(subs.iter().map(|s| s.value).sum::<Decimal>(), exp[0].value);
}

#[test]
fn breakdown_skips_categories_that_no_longer_exist() {
    let mut store = seeded();
    store.transactions.push(Transaction {
        id: "orphan".into(),
        date: d("2026-02-05"),
        kind: TxnType::Expense,
        account_id: "a1".into(),
        to_account_id: None,
        cat_id: Some("e-gone".into()),
        sub_cat_id: None,
        amount: dec("99"),
        note: String::new(),
    });
    let ledger = store.ledger();
    let range = DateRange::days(d("2026-02-01"), d("2026-02-28"));
    let exp = ledger.category_breakdown(CategoryKind::Expense, &range);
    assert!(exp.iter().all(|c| c.cat_id != "e-gone"));
    assert_eq!(ledger.period_totals(&range).expense, dec("324.75"));
    assert_eq!(ledger.warnings().len(), 1);
}

#[test]
fn carry_forward_only_changes_the_opening_figure() {
    let store = seeded();
    let ledger = store.ledger();
    let range = resolve(Period::MonthToDate, now("2026-02-15"), None, None);

    let off = ledger.summarize(&range, false);
    let on = ledger.summarize(&range, true);
    assert_eq!(off.opening, Decimal::ZERO);
    assert_eq!(on.opening, dec("1600"));
    assert_eq!(off.income, on.income);
    assert_eq!(off.expense, on.expense);
    assert_eq!(off.net_balance, on.net_balance);
    assert_eq!(on.closing, on.opening + on.income - on.expense);
}

#[test]
fn drill_down_is_newest_first_with_stable_ties() {
    let mut store = Store::with_defaults();
    let first = store
        .add_transaction(expense("2026-02-05", "a1", "e1", Some("e1s1"), "10"))
        .unwrap();
    let second = store
        .add_transaction(expense("2026-02-05", "a1", "e1", Some("e1s1"), "20"))
        .unwrap();
    let newest = store
        .add_transaction(expense("2026-02-07", "a1", "e1", Some("e1s1"), "5"))
        .unwrap();
    store
        .add_transaction(expense("2026-02-06", "a1", "e1", Some("e1s2"), "7"))
        .unwrap();

    let ledger = store.ledger();
    let range = DateRange::days(d("2026-02-01"), d("2026-02-28"));
    let ids: Vec<&str> = ledger
        .drill_down(&range, &DrillTarget::SubCategory("e1s1".into()))
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec![newest.as_str(), first.as_str(), second.as_str()]);

    let by_cat = ledger.drill_down(&range, &DrillTarget::Category(CategoryKind::Expense, "e1".into()));
    assert_eq!(by_cat.len(), 4);
}

#[test]
fn monthly_trend_keeps_the_last_twelve_months() {
    let mut store = Store::with_defaults();
    for m in 1..=12 {
        store
            .add_transaction(expense(&format!("2025-{:02}-10", m), "a1", "e1", None, "10"))
            .unwrap();
    }
    store
        .add_transaction(expense("2026-02-10", "a1", "e2", None, "40"))
        .unwrap();
    store
        .add_transaction(income("2026-02-11", "a1", "i1", "999"))
        .unwrap();

    let ledger = store.ledger();
    let trend = ledger.monthly_trend();
    assert_eq!(trend.len(), TREND_MONTHS);
    assert_eq!(trend[0].month, "2025-02");
    let last = trend.last().unwrap();
    assert_eq!(last.label, "Feb '26");
    assert_eq!(last.values.get("e2"), Some(&dec("40")));
    assert_eq!(last.total, dec("40"));

    let legend: Vec<&str> = ledger.trend_categories().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(legend, vec!["e1", "e2"]);
}

#[test]
fn deleted_account_drops_out_of_every_figure() {
    let mut store = seeded();
    store.delete_account("a4").unwrap();
    let ledger = store.ledger();
    assert!(ledger.balance_of("a4").is_none());
    let range = DateRange::days(d("2026-02-01"), d("2026-02-28"));
    assert_eq!(ledger.period_totals(&range).expense, dec("180.50"));
    let food = ledger.category_breakdown(CategoryKind::Expense, &range);
    assert_eq!(food.iter().find(|c| c.cat_id == "e1").unwrap().value, dec("120.50"));
    assert_eq!(ledger.sub_category_breakdown(&range, Some("e1")).len(), 1);

    // Still listed, and reported by doctor.
    assert_eq!(ledger.period_transactions(&range).len(), 6);
    assert!(ledger.warnings().iter().any(|w| w.contains("a4")));
    assert!(store.accounts.iter().all(|a: &Account| a.id != "a4"));
}

#[test]
fn carry_forward_closing_matches_net_balance_after_account_delete() {
    let mut store = Store::with_defaults();
    store
        .update_account(
            "a1",
            AccountPatch {
                opening_bal: Some(dec("500")),
                ..Default::default()
            },
        )
        .unwrap();
    for t in [
        expense("2026-01-10", "a1", "e1", None, "10"),
        expense("2026-01-12", "a4", "e1", None, "40"),
        expense("2026-02-03", "a1", "e1", None, "7"),
        expense("2026-02-04", "a4", "e2", None, "3"),
        income("2026-02-05", "a4", "i1", "100"),
    ] {
        store.add_transaction(t).unwrap();
    }
    store.delete_account("a4").unwrap();

    let ledger = store.ledger();
    let range = resolve(Period::MonthToDate, now("2026-02-15"), None, None);
    let s = ledger.summarize(&range, true);
    assert_eq!(s.opening, dec("490"));
    assert_eq!(s.income, Decimal::ZERO);
    assert_eq!(s.expense, dec("7"));
    assert_eq!(s.closing, dec("483"));
    assert_eq!(s.closing, s.net_balance);
}

#[test]
fn opening_at_first_transaction_is_the_sum_of_opening_balances() {
    let mut store = seeded();
    for (id, bal) in [("a1", "500"), ("a3", "1250.25")] {
        store
            .update_account(
                id,
                AccountPatch {
                    opening_bal: Some(dec(bal)),
                    ..Default::default()
                },
            )
            .unwrap();
    }
    let ledger = store.ledger();
    let first = DateRange::days(d("2026-01-20"), d("2026-02-15"));
    assert_eq!(ledger.opening_balance(&first, true), dec("1750.25"));

    // One day later the first income is carried in.
    let next = DateRange::days(d("2026-01-21"), d("2026-02-15"));
    assert_eq!(ledger.opening_balance(&next, true), dec("4250.25"));

    let whole = ledger.summarize(&first, true);
    assert_eq!(whole.closing, whole.net_balance);
}

#[test]
fn sub_category_trend_splits_one_parent_by_month() {
    let mut store = Store::with_defaults();
    for t in [
        expense("2026-01-04", "a1", "e1", Some("e1s1"), "10"),
        expense("2026-02-06", "a1", "e1", Some("e1s2"), "10"),
        expense("2026-02-07", "a1", "e2", Some("e2s1"), "99"),
        expense("2026-02-08", "a1", "e1", None, "5"),
    ] {
        store.add_transaction(t).unwrap();
    }

    let trend = store.ledger().sub_category_trend("e1");
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].month, "2026-01");
    assert_eq!(trend[0].values.get("e1s1"), Some(&dec("10")));
    assert_eq!(trend[0].total, dec("10"));
    assert_eq!(trend[1].month, "2026-02");
    assert_eq!(trend[1].label, "Feb '26");
    assert_eq!(trend[1].values.len(), 1);
    assert_eq!(trend[1].values.get("e1s2"), Some(&dec("10")));
}

#[test]
fn income_drill_down_lists_one_category() {
    let store = seeded();
    let ledger = store.ledger();
    let range = DateRange::days(d("2026-01-01"), d("2026-02-28"));

    let salary = ledger.drill_down(&range, &DrillTarget::Category(CategoryKind::Income, "i1".into()));
    assert_eq!(salary.len(), 2);
    assert_eq!(salary[0].date, d("2026-02-01"));
    assert!(salary.iter().all(|t| t.kind == TxnType::Income));

    let feb = DateRange::days(d("2026-02-01"), d("2026-02-28"));
    let other = ledger.drill_down(&feb, &DrillTarget::Category(CategoryKind::Income, "i2".into()));
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].amount, dec("300"));

    let income = ledger.category_breakdown(CategoryKind::Income, &feb);
    let i1 = income.iter().find(|c| c.cat_id == "i1").unwrap();
    assert_eq!(i1.count, 1);
}
