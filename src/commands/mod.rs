// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod backup;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod settings;
pub mod transactions;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use clap::ArgMatches;
use tracing::warn;

use crate::error::{EntityKind, LedgerError};
use crate::models::CategoryKind;
use crate::period::{DateRange, Period, resolve, resolve_custom};
use crate::store::Store;
use crate::view::{TypeFilter, TxnFilter};

pub(crate) fn required<'a>(m: &'a ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument '{}'", id))
}

pub(crate) fn optional<'a>(m: &'a ArgMatches, id: &str) -> Option<&'a str> {
    m.get_one::<String>(id).map(String::as_str)
}

/// Selector named by `--period`. An unusable custom range reads as month to date.
pub fn selected_period(m: &ArgMatches) -> Period {
    let period = Period::parse(optional(m, "period").unwrap_or_default());
    if period == Period::Custom && resolve_custom(optional(m, "from"), optional(m, "to")).is_none() {
        return Period::MonthToDate;
    }
    period
}

/// Report heading such as "Month: 01 Feb 2026 → 15 Feb 2026".
pub fn period_heading(m: &ArgMatches, range: &DateRange) -> String {
    format!("{}: {}", selected_period(m).label(), range.label())
}

/// Resolve `--period/--from/--to` against `now`.
pub fn period_range(m: &ArgMatches, now: NaiveDateTime) -> DateRange {
    let period = Period::parse(optional(m, "period").unwrap_or_default());
    let (from, to) = (optional(m, "from"), optional(m, "to"));
    if period == Period::Custom && resolve_custom(from, to).is_none() {
        warn!(?from, ?to, "incomplete or inverted custom range, using month to date");
    }
    resolve(period, now, from, to)
}

pub fn category_kind(m: &ArgMatches) -> Result<CategoryKind> {
    optional(m, "kind").unwrap_or("expense").parse()
}

pub fn resolve_account(store: &Store, key: &str) -> Result<String> {
    store
        .find_account(key)
        .map(|a| a.id.clone())
        .ok_or_else(|| LedgerError::not_found(EntityKind::Account, key).into())
}

pub fn resolve_category(store: &Store, kind: CategoryKind, key: &str) -> Result<String> {
    let entity = match kind {
        CategoryKind::Expense => EntityKind::ExpenseCategory,
        CategoryKind::Income => EntityKind::IncomeCategory,
    };
    store
        .find_category_id(kind, key)
        .ok_or_else(|| LedgerError::not_found(entity, key).into())
}

/// Returns `(parent_id, sub_id)`.
pub fn resolve_sub_category(
    store: &Store,
    parent: Option<&str>,
    key: &str,
) -> Result<(String, String)> {
    store
        .find_sub_category(parent, key)
        .ok_or_else(|| LedgerError::not_found(EntityKind::SubCategory, key).into())
}

/// Build the secondary list filter from `--type/--category/--sub/--account/--limit`.
pub fn txn_filter(store: &Store, m: &ArgMatches) -> Result<TxnFilter> {
    let kind: TypeFilter = optional(m, "type").unwrap_or("all").parse()?;
    let cat_id = match optional(m, "category") {
        Some(key) => Some(
            store
                .find_category_id(CategoryKind::Expense, key)
                .or_else(|| store.find_category_id(CategoryKind::Income, key))
                .ok_or_else(|| anyhow!("Category '{}' not found", key))?,
        ),
        None => None,
    };
    let sub_cat_id = match optional(m, "sub") {
        Some(key) => Some(resolve_sub_category(store, cat_id.as_deref(), key)?.1),
        None => None,
    };
    let account_id = match optional(m, "account") {
        Some(key) => Some(resolve_account(store, key)?),
        None => None,
    };
    Ok(TxnFilter {
        kind,
        cat_id,
        sub_cat_id,
        account_id,
        limit: m.get_one::<usize>("limit").copied(),
    })
}
