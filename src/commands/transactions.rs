// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{
    optional, period_range, required, resolve_account, resolve_category, resolve_sub_category,
    txn_filter,
};
use crate::ledger::Ledger;
use crate::models::{Transaction, TxnType};
use crate::store::{Store, TxnDraft};
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(store: &mut Store, now: NaiveDateTime, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, now, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("list", sub)) => list(store, now, sub)?,
        Some(("rm", sub)) => {
            let removed = store.delete_transaction(required(sub, "id")?)?;
            println!(
                "Removed {} of {} on {}",
                removed.kind,
                fmt_money(&removed.amount),
                removed.date
            );
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &mut Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let blank = TxnDraft {
        date: now.date(),
        kind: TxnType::Expense,
        account_id: String::new(),
        to_account_id: None,
        cat_id: None,
        sub_cat_id: None,
        amount: Decimal::ZERO,
        note: String::new(),
    };
    let draft = apply_args(store, blank, sub)?;
    let (kind, amount, date) = (draft.kind, draft.amount, draft.date);
    let id = store.add_transaction(draft)?;
    println!(
        "Recorded {} of {} on {} ({})",
        kind,
        fmt_money(&amount),
        date,
        id
    );
    Ok(())
}

fn edit(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let current = store
        .transaction(id)
        .with_context(|| format!("Transaction '{}' not found", id))?;
    let draft = apply_args(store, TxnDraft::from_transaction(current), sub)?;
    store.replace_transaction(id, draft)?;
    println!("Updated transaction {}", id);
    Ok(())
}

/// Overlay command-line fields on a draft. Changing the type drops the
/// references that only make sense for the old type.
pub fn apply_args(store: &Store, mut d: TxnDraft, sub: &clap::ArgMatches) -> Result<TxnDraft> {
    if let Some(t) = optional(sub, "type") {
        let kind: TxnType = t.parse()?;
        if kind != d.kind {
            d.kind = kind;
            d.to_account_id = None;
            d.cat_id = None;
            d.sub_cat_id = None;
        }
    }
    if let Some(s) = optional(sub, "date") {
        d.date = parse_date(s)?;
    }
    if let Some(key) = optional(sub, "account") {
        d.account_id = resolve_account(store, key)?;
    }
    if let Some(key) = optional(sub, "to") {
        d.to_account_id = Some(resolve_account(store, key)?);
    }
    if let Some(key) = optional(sub, "category") {
        let kind = d
            .kind
            .category_kind()
            .ok_or_else(|| anyhow!("Transfers carry no category"))?;
        d.cat_id = Some(resolve_category(store, kind, key)?);
        d.sub_cat_id = None;
    }
    if let Some(key) = optional(sub, "sub") {
        let (parent, sub_id) = resolve_sub_category(store, d.cat_id.as_deref(), key)?;
        d.cat_id = Some(parent);
        d.sub_cat_id = Some(sub_id);
    }
    if let Some(s) = optional(sub, "amount") {
        d.amount = parse_amount(s)?;
    }
    if let Some(s) = optional(sub, "note") {
        d.note = s.trim().to_string();
    }
    Ok(d)
}

fn list(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, now, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_rows(&data);
    }
    Ok(())
}

pub(crate) fn print_rows(data: &[TransactionRow]) {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.date.clone(),
                r.kind.label().to_string(),
                r.account.clone(),
                r.category.clone(),
                r.amount.clone(),
                r.note.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Type", "Account", "Category", "Amount", "Note"],
            rows,
        )
    );
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub account: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

pub fn to_rows(ledger: &Ledger<'_>, txns: &[&Transaction]) -> Vec<TransactionRow> {
    txns.iter()
        .map(|t| {
            let account = match t.to_account_id.as_deref() {
                Some(to) => format!(
                    "{} → {}",
                    ledger.account_name(&t.account_id),
                    ledger.account_name(to)
                ),
                None => ledger.account_name(&t.account_id),
            };
            let shown = match t.kind {
                TxnType::Transfer => t.amount,
                _ => t.signed_amount(),
            };
            TransactionRow {
                id: t.id.clone(),
                date: t.date.to_string(),
                kind: t.kind,
                account,
                category: ledger.category_label(t),
                amount: fmt_money(&shown),
                note: t.note.clone(),
            }
        })
        .collect()
}

/// Period-scoped, filtered list, newest first.
pub fn query_rows(
    store: &Store,
    now: NaiveDateTime,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let range = period_range(sub, now);
    let filter = txn_filter(store, sub)?;
    let ledger = store.ledger();
    let txns = filter.apply(&ledger.period_transactions(&range));
    Ok(to_rows(&ledger, &txns))
}
