// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Ledger, sort_newest_first};
use crate::models::{Transaction, TxnType};
use crate::utils::{fmt_date, fmt_money};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 5] = ["Date", "Amount", "Category", "Remarks", "Type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
        }
    }
}

/// One exported line. `amount` is already signed; writers never re-derive it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "remarks")]
    pub note: String,
    #[serde(rename = "type")]
    pub kind: TxnType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub count: usize,
}

impl ExportSummary {
    pub fn from_rows(rows: &[ExportRow]) -> Self {
        let mut s = ExportSummary {
            count: rows.len(),
            ..Default::default()
        };
        for r in rows {
            if r.amount > Decimal::ZERO {
                s.income += r.amount;
            } else {
                s.expense += -r.amount;
            }
        }
        s.net = s.income - s.expense;
        s
    }
}

/// Project transactions into export rows, newest first.
pub fn build_rows(ledger: &Ledger<'_>, txns: &[&Transaction]) -> Vec<ExportRow> {
    let mut sorted = txns.to_vec();
    sort_newest_first(&mut sorted);
    sorted
        .into_iter()
        .map(|t| ExportRow {
            date: t.date,
            amount: t.signed_amount(),
            category: ledger.category_label(t),
            note: t.note.clone(),
            kind: t.kind,
        })
        .collect()
}

/// CSV with a UTF-8 BOM so spreadsheet apps pick the right encoding.
pub fn write_csv<W: Write>(mut out: W, rows: &[ExportRow]) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for r in rows {
        wtr.write_record([
            fmt_date(&r.date),
            fmt_money(&r.amount),
            r.category.clone(),
            r.note.clone(),
            r.kind.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, rows: &[ExportRow]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.flush()?;
    Ok(())
}
