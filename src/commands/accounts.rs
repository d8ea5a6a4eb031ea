// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required, resolve_account};
use crate::ledger::net_balance;
use crate::store::{AccountDraft, AccountPatch, Store};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let opening_bal = match optional(sub, "opening") {
                Some(s) => parse_decimal(s)?,
                None => Decimal::ZERO,
            };
            let draft = AccountDraft {
                name: required(sub, "name")?.to_string(),
                icon: optional(sub, "icon").unwrap_or_default().to_string(),
                color: optional(sub, "color").unwrap_or_default().to_string(),
                opening_bal,
            };
            let name = draft.name.trim().to_string();
            let id = store.add_account(draft)?;
            println!("Added account '{}' ({})", name, id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => {
            let id = resolve_account(store, required(sub, "account")?)?;
            let patch = AccountPatch {
                name: optional(sub, "name").map(str::to_string),
                icon: optional(sub, "icon").map(str::to_string),
                color: optional(sub, "color").map(str::to_string),
                opening_bal: optional(sub, "opening").map(parse_decimal).transpose()?,
            };
            store.update_account(&id, patch)?;
            println!("Updated account {}", id);
        }
        Some(("rm", sub)) => {
            let id = resolve_account(store, required(sub, "account")?)?;
            let orphaned = store
                .transactions
                .iter()
                .filter(|t| t.touches_account(&id))
                .count();
            let removed = store.delete_account(&id)?;
            println!("Removed account '{}'", removed.name);
            if orphaned > 0 {
                println!(
                    "{} transaction(s) still reference it and no longer count towards balances",
                    orphaned
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let balances = store.ledger().account_balances();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &balances)? {
        return Ok(());
    }
    let net = net_balance(&balances);
    let rows: Vec<Vec<String>> = balances
        .iter()
        .map(|b| {
            vec![
                b.account_id.clone(),
                format!("{} {}", b.icon, b.name).trim().to_string(),
                fmt_money(&b.opening),
                fmt_money(&b.income),
                fmt_money(&b.expense),
                fmt_money(&(b.transfers_in - b.transfers_out)),
                fmt_money(&b.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Account", "Opening", "Income", "Expense", "Transfers", "Balance"],
            rows,
        )
    );
    println!("Net balance: {}", fmt_money(&net));
    Ok(())
}
