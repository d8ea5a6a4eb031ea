// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures: balances, period totals, breakdowns and trend series.
//!
//! Nothing here is stored. Every figure is recomputed from the entity lists
//! on each call, so a [`Ledger`] is only ever a borrowed snapshot.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    Account, CategoryInfo, CategoryKind, ExpenseCategory, IncomeCategory, Transaction, TxnType,
};
use crate::period::{DateRange, start_of_day};

/// Number of months kept in a trend series.
pub const TREND_MONTHS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account_id: String,
    pub name: String,
    pub icon: String,
    pub opening: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub transfers_in: Decimal,
    pub transfers_out: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub range: DateRange,
    pub carry_forward: bool,
    pub net_balance: Decimal,
    pub opening: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub closing: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub cat_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub value: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCategoryTotal {
    pub sub_cat_id: String,
    pub cat_id: String,
    pub name: String,
    pub value: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    /// `YYYY-MM`
    pub month: String,
    /// e.g. `Feb '26`
    pub label: String,
    pub values: BTreeMap<String, Decimal>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillTarget {
    SubCategory(String),
    Category(CategoryKind, String),
}

/// Borrowed view over the entity lists.
#[derive(Debug, Clone, Copy)]
pub struct Ledger<'a> {
    pub accounts: &'a [Account],
    pub expense_categories: &'a [ExpenseCategory],
    pub income_categories: &'a [IncomeCategory],
    pub transactions: &'a [Transaction],
}

impl<'a> Ledger<'a> {
    pub fn new(
        accounts: &'a [Account],
        expense_categories: &'a [ExpenseCategory],
        income_categories: &'a [IncomeCategory],
        transactions: &'a [Transaction],
    ) -> Self {
        Self {
            accounts,
            expense_categories,
            income_categories,
            transactions,
        }
    }

    /// All-time balance per account, in account order. Period never applies here.
    pub fn account_balances(&self) -> Vec<AccountBalance> {
        let mut rows: Vec<AccountBalance> = self
            .accounts
            .iter()
            .map(|a| AccountBalance {
                account_id: a.id.clone(),
                name: a.name.clone(),
                icon: a.icon.clone(),
                opening: a.opening_bal,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
                transfers_in: Decimal::ZERO,
                transfers_out: Decimal::ZERO,
                balance: Decimal::ZERO,
            })
            .collect();
        let index: HashMap<&str, usize> = self
            .accounts
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.as_str(), i))
            .collect();

        for t in self.transactions {
            let src = index.get(t.account_id.as_str()).copied();
            match t.kind {
                TxnType::Income => {
                    if let Some(i) = src {
                        rows[i].income += t.amount;
                    }
                }
                TxnType::Expense => {
                    if let Some(i) = src {
                        rows[i].expense += t.amount;
                    }
                }
                TxnType::Transfer => {
                    if let Some(i) = src {
                        rows[i].transfers_out += t.amount;
                    }
                    if let Some(i) = t.to_account_id.as_deref().and_then(|id| index.get(id)) {
                        rows[*i].transfers_in += t.amount;
                    }
                }
            }
        }

        for r in rows.iter_mut() {
            r.balance = r.opening + r.income - r.expense - r.transfers_out + r.transfers_in;
        }
        rows
    }

    pub fn balance_of(&self, account_id: &str) -> Option<Decimal> {
        self.account_balances()
            .into_iter()
            .find(|b| b.account_id == account_id)
            .map(|b| b.balance)
    }

    pub fn net_balance(&self) -> Decimal {
        net_balance(&self.account_balances())
    }

    /// Transactions dated inside `range`, in stored order. Used for listing
    /// and export, so entries on deleted accounts still show up.
    pub fn period_transactions(&self, range: &DateRange) -> Vec<&'a Transaction> {
        period_transactions(self.transactions, range)
    }

    /// Transactions whose source account still exists. Every figure the
    /// ledger computes reads from these, so period totals, the carry-forward
    /// opening and the account balances describe the same book.
    pub fn booked(&self) -> Vec<&'a Transaction> {
        let known: HashSet<&str> = self.accounts.iter().map(|a| a.id.as_str()).collect();
        self.transactions
            .iter()
            .filter(|t| known.contains(t.account_id.as_str()))
            .collect()
    }

    /// Booked transactions dated inside `range`.
    pub fn booked_in(&self, range: &DateRange) -> Vec<&'a Transaction> {
        let mut txns = self.booked();
        txns.retain(|t| range.contains(t.date));
        txns
    }

    pub fn period_totals(&self, range: &DateRange) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        for t in self.booked_in(range) {
            match t.kind {
                TxnType::Income => totals.income += t.amount,
                TxnType::Expense => totals.expense += t.amount,
                TxnType::Transfer => {}
            }
            totals.count += 1;
        }
        totals.net = totals.income - totals.expense;
        totals
    }

    /// Opening balance of the period. Zero unless `carry_forward` is on, in
    /// which case it is every opening balance plus all booked income and
    /// expense dated strictly before `range.from`.
    pub fn opening_balance(&self, range: &DateRange, carry_forward: bool) -> Decimal {
        if !carry_forward {
            return Decimal::ZERO;
        }
        let seed: Decimal = self.accounts.iter().map(|a| a.opening_bal).sum();
        let prior: Decimal = self
            .booked()
            .into_iter()
            .filter(|t| start_of_day(t.date) < range.from)
            .map(Transaction::signed_amount)
            .sum();
        seed + prior
    }

    pub fn summarize(&self, range: &DateRange, carry_forward: bool) -> Summary {
        let totals = self.period_totals(range);
        let opening = self.opening_balance(range, carry_forward);
        Summary {
            range: *range,
            carry_forward,
            net_balance: self.net_balance(),
            opening,
            income: totals.income,
            expense: totals.expense,
            closing: opening + totals.net,
            count: totals.count,
        }
    }

    /// Period totals per category of `kind`, largest first. Categories with no
    /// matching transaction are left out.
    pub fn category_breakdown(&self, kind: CategoryKind, range: &DateRange) -> Vec<CategoryTotal> {
        match kind {
            CategoryKind::Expense => {
                breakdown(self.expense_categories, kind.txn_type(), &self.booked_in(range))
            }
            CategoryKind::Income => {
                breakdown(self.income_categories, kind.txn_type(), &self.booked_in(range))
            }
        }
    }

    /// Period expense per sub-category, optionally limited to one parent.
    pub fn sub_category_breakdown(
        &self,
        range: &DateRange,
        parent: Option<&str>,
    ) -> Vec<SubCategoryTotal> {
        let mut rows: Vec<SubCategoryTotal> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for t in self.booked_in(range) {
            if t.kind != TxnType::Expense {
                continue;
            }
            let (Some(cat_id), Some(sub_id)) = (t.cat_id.as_deref(), t.sub_cat_id.as_deref())
            else {
                continue;
            };
            if parent.is_some_and(|p| p != cat_id) {
                continue;
            }
            let Some(sub) = self
                .expense_category(cat_id)
                .and_then(|c| c.sub_category(sub_id))
            else {
                continue;
            };
            let i = *index.entry(sub_id).or_insert_with(|| {
                rows.push(SubCategoryTotal {
                    sub_cat_id: sub.id.clone(),
                    cat_id: cat_id.to_string(),
                    name: sub.name.clone(),
                    value: Decimal::ZERO,
                    count: 0,
                });
                rows.len() - 1
            });
            rows[i].value += t.amount;
            rows[i].count += 1;
        }
        rows.sort_by(|a, b| b.value.cmp(&a.value));
        rows
    }

    /// Period transactions behind one breakdown row, newest first. Same-day
    /// entries keep their stored order.
    pub fn drill_down(&self, range: &DateRange, target: &DrillTarget) -> Vec<&'a Transaction> {
        let mut out: Vec<&Transaction> = self
            .booked_in(range)
            .into_iter()
            .filter(|t| match target {
                DrillTarget::SubCategory(sub) => {
                    t.kind == TxnType::Expense && t.sub_cat_id.as_deref() == Some(sub.as_str())
                }
                DrillTarget::Category(kind, cat) => {
                    t.kind == kind.txn_type() && t.cat_id.as_deref() == Some(cat.as_str())
                }
            })
            .collect();
        sort_newest_first(&mut out);
        out
    }

    /// Monthly expense per category over all history, oldest month first,
    /// limited to the most recent [`TREND_MONTHS`].
    pub fn monthly_trend(&self) -> Vec<TrendRow> {
        trend(
            self.booked()
                .into_iter()
                .filter(|t| t.kind == TxnType::Expense)
                .filter_map(|t| t.cat_id.as_deref().map(|c| (t, c))),
        )
    }

    /// Same as [`Ledger::monthly_trend`], one level deeper for one parent category.
    pub fn sub_category_trend(&self, parent: &str) -> Vec<TrendRow> {
        trend(
            self.booked()
                .into_iter()
                .filter(|t| t.kind == TxnType::Expense && t.cat_id.as_deref() == Some(parent))
                .filter_map(|t| t.sub_cat_id.as_deref().map(|s| (t, s))),
        )
    }

    /// Expense categories used by at least one expense transaction.
    pub fn trend_categories(&self) -> Vec<&'a ExpenseCategory> {
        let used: BTreeSet<&str> = self
            .booked()
            .into_iter()
            .filter(|t| t.kind == TxnType::Expense)
            .filter_map(|t| t.cat_id.as_deref())
            .collect();
        self.expense_categories
            .iter()
            .filter(|c| used.contains(c.id.as_str()))
            .collect()
    }

    pub fn account(&self, id: &str) -> Option<&'a Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn expense_category(&self, id: &str) -> Option<&'a ExpenseCategory> {
        self.expense_categories.iter().find(|c| c.id == id)
    }

    pub fn income_category(&self, id: &str) -> Option<&'a IncomeCategory> {
        self.income_categories.iter().find(|c| c.id == id)
    }

    /// "Category" or "Category / Sub" for display and export.
    pub fn category_label(&self, t: &Transaction) -> String {
        let Some(cat_id) = t.cat_id.as_deref() else {
            return String::new();
        };
        match t.kind {
            TxnType::Expense => match self.expense_category(cat_id) {
                Some(c) => match t.sub_cat_id.as_deref().and_then(|s| c.sub_category(s)) {
                    Some(s) => format!("{} / {}", c.name, s.name),
                    None => c.name.clone(),
                },
                None => String::new(),
            },
            TxnType::Income => self
                .income_category(cat_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            TxnType::Transfer => String::new(),
        }
    }

    pub fn account_name(&self, id: &str) -> String {
        self.account(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "(unknown account)".to_string())
    }

    /// Dangling references and shape problems, one line per issue.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for t in self.transactions {
            if self.account(&t.account_id).is_none() {
                warnings.push(format!(
                    "transaction {} references unknown account {}",
                    t.id, t.account_id
                ));
            }
            if let Some(to) = t.to_account_id.as_deref() {
                if self.account(to).is_none() {
                    warnings.push(format!(
                        "transaction {} references unknown destination account {}",
                        t.id, to
                    ));
                }
            }
            match (t.kind, t.cat_id.as_deref()) {
                (TxnType::Expense, Some(cat)) => match self.expense_category(cat) {
                    None => warnings.push(format!(
                        "transaction {} references missing expense category {}",
                        t.id, cat
                    )),
                    Some(c) => {
                        if let Some(sub) = t.sub_cat_id.as_deref() {
                            if c.sub_category(sub).is_none() {
                                warnings.push(format!(
                                    "transaction {} sub-category {} is not under {}",
                                    t.id, sub, c.id
                                ));
                            }
                        }
                    }
                },
                (TxnType::Income, Some(cat)) if self.income_category(cat).is_none() => {
                    warnings.push(format!(
                        "transaction {} references missing income category {}",
                        t.id, cat
                    ));
                }
                _ => {}
            }
        }
        warnings
    }
}

pub fn net_balance(balances: &[AccountBalance]) -> Decimal {
    balances.iter().map(|b| b.balance).sum()
}

pub fn period_transactions<'t>(txns: &'t [Transaction], range: &DateRange) -> Vec<&'t Transaction> {
    txns.iter().filter(|t| range.contains(t.date)).collect()
}

/// Stable sort by date descending.
pub fn sort_newest_first(txns: &mut [&Transaction]) {
    txns.sort_by(|a, b| b.date.cmp(&a.date));
}

fn breakdown<C: CategoryInfo>(
    categories: &[C],
    kind: TxnType,
    txns: &[&Transaction],
) -> Vec<CategoryTotal> {
    let mut rows: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for t in txns.iter().filter(|t| t.kind == kind) {
        let Some(cat) = t
            .cat_id
            .as_deref()
            .and_then(|id| categories.iter().find(|c| c.id() == id))
        else {
            continue;
        };
        let i = *index.entry(cat.id()).or_insert_with(|| {
            rows.push(CategoryTotal {
                cat_id: cat.id().to_string(),
                name: cat.name().to_string(),
                icon: cat.icon().to_string(),
                color: cat.color().to_string(),
                value: Decimal::ZERO,
                count: 0,
            });
            rows.len() - 1
        });
        rows[i].value += t.amount;
        rows[i].count += 1;
    }
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

fn trend<'t>(entries: impl Iterator<Item = (&'t Transaction, &'t str)>) -> Vec<TrendRow> {
    let mut months: BTreeMap<String, TrendRow> = BTreeMap::new();
    for (t, key) in entries {
        let month = t.date.format("%Y-%m").to_string();
        let row = months.entry(month.clone()).or_insert_with(|| TrendRow {
            month,
            label: format!("{} '{}", t.date.format("%b"), t.date.format("%y")),
            values: BTreeMap::new(),
            total: Decimal::ZERO,
        });
        *row.values.entry(key.to_string()).or_insert(Decimal::ZERO) += t.amount;
        row.total += t.amount;
    }
    let mut rows: Vec<TrendRow> = months.into_values().collect();
    if rows.len() > TREND_MONTHS {
        rows.drain(..rows.len() - TREND_MONTHS);
    }
    rows
}
