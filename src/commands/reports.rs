// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::{print_rows, to_rows};
use super::{
    category_kind, optional, period_heading, period_range, resolve_category, resolve_sub_category,
};
use crate::ledger::{DrillTarget, Summary, TrendRow, net_balance};
use crate::models::CategoryKind;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_flag, pretty_table};
use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

pub fn handle(store: &Store, now: NaiveDateTime, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, now, sub)?,
        Some(("balances", sub)) => balances(store, sub)?,
        Some(("by-category", sub)) => by_category(store, now, sub)?,
        Some(("sub-category", sub)) => by_sub_category(store, now, sub)?,
        Some(("drill", sub)) => drill(store, now, sub)?,
        Some(("trend", sub)) => trend(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Summary for the selected period. `--carry-forward` overrides the saved setting.
pub fn build_summary(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<Summary> {
    let range = period_range(sub, now);
    let carry_forward = match optional(sub, "carry_forward") {
        Some(v) => parse_flag(v)?,
        None => store.settings.carry_forward,
    };
    Ok(store.ledger().summarize(&range, carry_forward))
}

fn summary(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let s = build_summary(store, now, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let mut rows = vec![vec!["Period".to_string(), period_heading(sub, &s.range)]];
    if s.carry_forward {
        rows.push(vec!["Opening".into(), fmt_money(&s.opening)]);
    }
    rows.push(vec!["Income".into(), fmt_money(&s.income)]);
    rows.push(vec!["Expense".into(), fmt_money(&s.expense)]);
    if s.carry_forward {
        rows.push(vec!["Closing".into(), fmt_money(&s.closing)]);
    } else {
        rows.push(vec!["Net".into(), fmt_money(&(s.income - s.expense))]);
    }
    rows.push(vec!["Transactions".into(), s.count.to_string()]);
    rows.push(vec!["Net balance (all accounts)".into(), fmt_money(&s.net_balance)]);
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn balances(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let data = store.ledger().account_balances();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = data
        .iter()
        .map(|b| vec![b.name.clone(), fmt_money(&b.balance)])
        .collect();
    rows.push(vec!["Net balance".into(), fmt_money(&net_balance(&data))]);
    println!("{}", pretty_table(&["Account", "Balance"], rows));
    Ok(())
}

fn share(value: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "-".into();
    }
    format!("{:.1}%", (value * Decimal::ONE_HUNDRED / total).round_dp(1))
}

fn by_category(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let kind = category_kind(sub)?;
    let range = period_range(sub, now);
    let data = store.ledger().category_breakdown(kind, &range);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let total: Decimal = data.iter().map(|c| c.value).sum();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|c| {
            vec![
                format!("{} {}", c.icon, c.name).trim().to_string(),
                fmt_money(&c.value),
                c.count.to_string(),
                share(c.value, total),
            ]
        })
        .collect();
    println!("{}", period_heading(sub, &range));
    println!("{}", pretty_table(&["Category", "Amount", "Count", "Share"], rows));
    Ok(())
}

fn by_sub_category(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let parent = match optional(sub, "category") {
        Some(key) => Some(resolve_category(store, CategoryKind::Expense, key)?),
        None => None,
    };
    let range = period_range(sub, now);
    let ledger = store.ledger();
    let data = ledger.sub_category_breakdown(&range, parent.as_deref());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let total: Decimal = data.iter().map(|s| s.value).sum();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|s| {
            let parent_name = ledger
                .expense_category(&s.cat_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            vec![
                s.name.clone(),
                parent_name,
                fmt_money(&s.value),
                s.count.to_string(),
                share(s.value, total),
            ]
        })
        .collect();
    println!("{}", period_heading(sub, &range));
    println!(
        "{}",
        pretty_table(&["Sub-category", "Category", "Amount", "Count", "Share"], rows)
    );
    Ok(())
}

/// Breakdown row named by `--sub` or `--category`. With both, `--category`
/// names the expense parent the sub-category is looked up under.
pub fn drill_target(store: &Store, sub: &clap::ArgMatches) -> Result<DrillTarget> {
    Ok(match (optional(sub, "sub"), optional(sub, "category")) {
        (Some(key), parent) => {
            let parent = match parent {
                Some(p) => Some(resolve_category(store, CategoryKind::Expense, p)?),
                None => None,
            };
            DrillTarget::SubCategory(resolve_sub_category(store, parent.as_deref(), key)?.1)
        }
        (None, Some(key)) => {
            let kind = category_kind(sub)?;
            DrillTarget::Category(kind, resolve_category(store, kind, key)?)
        }
        (None, None) => bail!("Pass --sub or --category to drill into"),
    })
}

fn drill(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let target = drill_target(store, sub)?;
    let range = period_range(sub, now);
    let ledger = store.ledger();
    let data = to_rows(&ledger, &ledger.drill_down(&range, &target));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", period_heading(sub, &range));
        print_rows(&data);
    }
    Ok(())
}

fn trend(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = store.ledger();
    let (data, columns): (Vec<TrendRow>, Vec<(String, String)>) = match optional(sub, "category")
    {
        Some(key) => {
            let parent = resolve_category(store, CategoryKind::Expense, key)?;
            let subs = ledger
                .expense_category(&parent)
                .map(|c| {
                    c.sub
                        .iter()
                        .map(|s| (s.id.clone(), s.name.clone()))
                        .collect()
                })
                .unwrap_or_default();
            (ledger.sub_category_trend(&parent), subs)
        }
        None => (
            ledger.monthly_trend(),
            ledger
                .trend_categories()
                .into_iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
        ),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let mut headers: Vec<&str> = vec!["Month"];
    headers.extend(columns.iter().map(|(_, name)| name.as_str()));
    headers.push("Total");
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            let mut row = vec![r.label.clone()];
            row.extend(columns.iter().map(|(id, _)| {
                r.values
                    .get(id)
                    .map(fmt_money)
                    .unwrap_or_else(|| "-".into())
            }));
            row.push(fmt_money(&r.total));
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, rows));
    Ok(())
}
