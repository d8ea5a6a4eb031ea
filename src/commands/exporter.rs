// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::BufWriter;

use super::{optional, period_range, required, txn_filter};
use crate::export::{ExportFormat, ExportSummary, build_rows, write_csv, write_json};
use crate::store::Store;
use crate::utils::fmt_money;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;

pub fn handle(store: &Store, now: NaiveDateTime, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, now, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &Store, now: NaiveDateTime, sub: &clap::ArgMatches) -> Result<()> {
    let format: ExportFormat = optional(sub, "format").unwrap_or("csv").parse()?;
    let out = required(sub, "out")?;

    let range = period_range(sub, now);
    let filter = txn_filter(store, sub)?;
    let ledger = store.ledger();
    let txns = filter.apply(&ledger.period_transactions(&range));
    let rows = build_rows(&ledger, &txns);

    let file = File::create(out).with_context(|| format!("Create {}", out))?;
    let writer = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(writer, &rows)?,
        ExportFormat::Json => write_json(writer, &rows)?,
    }
    info!(out, count = rows.len(), "export written");

    let s = ExportSummary::from_rows(&rows);
    println!(
        "Exported {} transaction(s) for {} to {}",
        s.count,
        range.label(),
        out
    );
    println!(
        "Income {}  Expense {}  Net {}",
        fmt_money(&s.income),
        fmt_money(&s.expense),
        fmt_money(&s.net)
    );
    Ok(())
}
