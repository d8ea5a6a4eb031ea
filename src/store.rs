// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The entity store: the one owner of accounts, categories, transactions
//! and settings. All mutation goes through here so the invariants hold.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{EntityKind, LedgerError};
use crate::ledger::Ledger;
use crate::models::{
    Account, CategoryKind, ExpenseCategory, IncomeCategory, Settings, SubCategory, Transaction,
    TxnType, UiMode,
};
use crate::utils::is_hex_color;

pub const DEFAULT_APP_NAME: &str = "My Finance Hub";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    pub app_name: String,
    pub accounts: Vec<Account>,
    #[serde(rename = "expCats")]
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(rename = "incCats")]
    pub income_categories: Vec<IncomeCategory>,
    pub transactions: Vec<Transaction>,
    pub settings: Settings,
    #[serde(skip)]
    revision: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            accounts: Vec::new(),
            expense_categories: Vec::new(),
            income_categories: Vec::new(),
            transactions: Vec::new(),
            settings: Settings::default(),
            revision: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub opening_bal: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub opening_bal: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TxnDraft {
    pub date: NaiveDate,
    pub kind: TxnType,
    pub account_id: String,
    pub to_account_id: Option<String>,
    pub cat_id: Option<String>,
    pub sub_cat_id: Option<String>,
    pub amount: Decimal,
    pub note: String,
}

impl TxnDraft {
    /// Prefill a draft from an existing transaction, for edits.
    pub fn from_transaction(t: &Transaction) -> Self {
        Self {
            date: t.date,
            kind: t.kind,
            account_id: t.account_id.clone(),
            to_account_id: t.to_account_id.clone(),
            cat_id: t.cat_id.clone(),
            sub_cat_id: t.sub_cat_id.clone(),
            amount: t.amount,
            note: t.note.clone(),
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented on every successful mutation; never persisted.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn ledger(&self) -> Ledger<'_> {
        Ledger::new(
            &self.accounts,
            &self.expense_categories,
            &self.income_categories,
            &self.transactions,
        )
    }

    // ---- accounts ------------------------------------------------------

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Look an account up by id, then by case-insensitive name.
    pub fn find_account(&self, key: &str) -> Option<&Account> {
        self.account(key).or_else(|| {
            self.accounts
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(key.trim()))
        })
    }

    pub fn add_account(&mut self, draft: AccountDraft) -> Result<String, LedgerError> {
        let name = required_name(&draft.name, "account")?;
        check_color(&draft.color)?;
        let id = fresh_id("a", |id| self.account(id).is_some());
        self.accounts.push(Account {
            id: id.clone(),
            name,
            icon: draft.icon,
            color: draft.color,
            opening_bal: draft.opening_bal,
        });
        self.touch();
        debug!(account = %id, "account added");
        Ok(id)
    }

    pub fn update_account(&mut self, id: &str, patch: AccountPatch) -> Result<(), LedgerError> {
        let name = patch
            .name
            .as_deref()
            .map(|n| required_name(n, "account"))
            .transpose()?;
        if let Some(c) = patch.color.as_deref() {
            check_color(c)?;
        }
        let acct = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, id))?;
        if let Some(n) = name {
            acct.name = n;
        }
        if let Some(i) = patch.icon {
            acct.icon = i;
        }
        if let Some(c) = patch.color {
            acct.color = c;
        }
        if let Some(b) = patch.opening_bal {
            acct.opening_bal = b;
        }
        self.touch();
        debug!(account = %id, "account updated");
        Ok(())
    }

    /// Accounts delete unconditionally; historical transactions keep the dangling id.
    pub fn delete_account(&mut self, id: &str) -> Result<Account, LedgerError> {
        let pos = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, id))?;
        let removed = self.accounts.remove(pos);
        let orphaned = self.transactions.iter().filter(|t| t.touches_account(id)).count();
        if orphaned > 0 {
            warn!(account = %id, orphaned, "account deleted with referencing transactions");
        }
        self.touch();
        Ok(removed)
    }

    // ---- categories ----------------------------------------------------

    pub fn expense_category(&self, id: &str) -> Option<&ExpenseCategory> {
        self.expense_categories.iter().find(|c| c.id == id)
    }

    pub fn income_category(&self, id: &str) -> Option<&IncomeCategory> {
        self.income_categories.iter().find(|c| c.id == id)
    }

    /// Resolve a category by id or case-insensitive name within one kind.
    pub fn find_category_id(&self, kind: CategoryKind, key: &str) -> Option<String> {
        let key = key.trim();
        match kind {
            CategoryKind::Expense => self
                .expense_categories
                .iter()
                .find(|c| c.id == key || c.name.eq_ignore_ascii_case(key))
                .map(|c| c.id.clone()),
            CategoryKind::Income => self
                .income_categories
                .iter()
                .find(|c| c.id == key || c.name.eq_ignore_ascii_case(key))
                .map(|c| c.id.clone()),
        }
    }

    /// Resolve a sub-category by id or name, optionally within one parent.
    /// Returns `(parent_id, sub_id)`.
    pub fn find_sub_category(&self, parent: Option<&str>, key: &str) -> Option<(String, String)> {
        let key = key.trim();
        self.expense_categories
            .iter()
            .filter(|c| parent.is_none_or(|p| p == c.id))
            .find_map(|c| {
                c.sub
                    .iter()
                    .find(|s| s.id == key || s.name.eq_ignore_ascii_case(key))
                    .map(|s| (c.id.clone(), s.id.clone()))
            })
    }

    pub fn add_category(
        &mut self,
        kind: CategoryKind,
        draft: CategoryDraft,
    ) -> Result<String, LedgerError> {
        let name = required_name(&draft.name, "category")?;
        check_color(&draft.color)?;
        let id = match kind {
            CategoryKind::Expense => {
                let id = fresh_id("e", |id| self.expense_category(id).is_some());
                self.expense_categories.push(ExpenseCategory {
                    id: id.clone(),
                    name,
                    icon: draft.icon,
                    color: draft.color,
                    sub: Vec::new(),
                });
                id
            }
            CategoryKind::Income => {
                let id = fresh_id("i", |id| self.income_category(id).is_some());
                self.income_categories.push(IncomeCategory {
                    id: id.clone(),
                    name,
                    icon: draft.icon,
                    color: draft.color,
                });
                id
            }
        };
        self.touch();
        debug!(category = %id, kind = kind.as_str(), "category added");
        Ok(id)
    }

    /// Merge top-level fields. An expense category's sub-categories are never touched.
    pub fn update_category(
        &mut self,
        kind: CategoryKind,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<(), LedgerError> {
        let name = patch
            .name
            .as_deref()
            .map(|n| required_name(n, "category"))
            .transpose()?;
        if let Some(c) = patch.color.as_deref() {
            check_color(c)?;
        }
        let (cur_name, cur_icon, cur_color) = match kind {
            CategoryKind::Expense => self
                .expense_categories
                .iter_mut()
                .find(|c| c.id == id)
                .map(|c| (&mut c.name, &mut c.icon, &mut c.color))
                .ok_or_else(|| LedgerError::not_found(EntityKind::ExpenseCategory, id))?,
            CategoryKind::Income => self
                .income_categories
                .iter_mut()
                .find(|c| c.id == id)
                .map(|c| (&mut c.name, &mut c.icon, &mut c.color))
                .ok_or_else(|| LedgerError::not_found(EntityKind::IncomeCategory, id))?,
        };
        if let Some(n) = name {
            *cur_name = n;
        }
        if let Some(i) = patch.icon {
            *cur_icon = i;
        }
        if let Some(c) = patch.color {
            *cur_color = c;
        }
        self.touch();
        debug!(category = %id, "category updated");
        Ok(())
    }

    /// Refused while any transaction references the category.
    pub fn delete_category(&mut self, kind: CategoryKind, id: &str) -> Result<(), LedgerError> {
        let entity = match kind {
            CategoryKind::Expense => EntityKind::ExpenseCategory,
            CategoryKind::Income => EntityKind::IncomeCategory,
        };
        let pos = match kind {
            CategoryKind::Expense => self.expense_categories.iter().position(|c| c.id == id),
            CategoryKind::Income => self.income_categories.iter().position(|c| c.id == id),
        }
        .ok_or_else(|| LedgerError::not_found(entity, id))?;

        let count = self
            .transactions
            .iter()
            .filter(|t| t.cat_id.as_deref() == Some(id))
            .count();
        if count > 0 {
            debug!(category = %id, count, "category delete refused");
            return Err(LedgerError::HasTransactions {
                kind: entity,
                id: id.to_string(),
                count,
            });
        }
        match kind {
            CategoryKind::Expense => {
                self.expense_categories.remove(pos);
            }
            CategoryKind::Income => {
                self.income_categories.remove(pos);
            }
        }
        self.touch();
        Ok(())
    }

    pub fn add_sub_category(&mut self, parent_id: &str, name: &str) -> Result<String, LedgerError> {
        let name = required_name(name, "sub-category")?;
        let taken: Vec<String> = self
            .expense_categories
            .iter()
            .flat_map(|c| c.sub.iter().map(|s| s.id.clone()))
            .collect();
        let parent = self
            .expense_categories
            .iter_mut()
            .find(|c| c.id == parent_id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::ExpenseCategory, parent_id))?;
        let id = fresh_id(&format!("{}s", parent.id), |id| taken.iter().any(|t| t == id));
        parent.sub.push(SubCategory {
            id: id.clone(),
            name,
        });
        self.touch();
        debug!(parent = %parent_id, sub = %id, "sub-category added");
        Ok(id)
    }

    pub fn rename_sub_category(
        &mut self,
        parent_id: &str,
        sub_id: &str,
        name: &str,
    ) -> Result<(), LedgerError> {
        let name = required_name(name, "sub-category")?;
        let sub = self
            .expense_categories
            .iter_mut()
            .find(|c| c.id == parent_id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::ExpenseCategory, parent_id))?
            .sub
            .iter_mut()
            .find(|s| s.id == sub_id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::SubCategory, sub_id))?;
        sub.name = name;
        self.touch();
        Ok(())
    }

    /// Refused while any transaction references the sub-category.
    pub fn delete_sub_category(&mut self, parent_id: &str, sub_id: &str) -> Result<(), LedgerError> {
        let count = self
            .transactions
            .iter()
            .filter(|t| t.sub_cat_id.as_deref() == Some(sub_id))
            .count();
        let parent = self
            .expense_categories
            .iter_mut()
            .find(|c| c.id == parent_id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::ExpenseCategory, parent_id))?;
        let pos = parent
            .sub
            .iter()
            .position(|s| s.id == sub_id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::SubCategory, sub_id))?;
        if count > 0 {
            debug!(sub = %sub_id, count, "sub-category delete refused");
            return Err(LedgerError::HasTransactions {
                kind: EntityKind::SubCategory,
                id: sub_id.to_string(),
                count,
            });
        }
        parent.sub.remove(pos);
        self.touch();
        Ok(())
    }

    // ---- transactions --------------------------------------------------

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn add_transaction(&mut self, draft: TxnDraft) -> Result<String, LedgerError> {
        self.validate(&draft)?;
        let id = fresh_id("t", |id| self.transaction(id).is_some());
        self.transactions.push(build_transaction(id.clone(), draft));
        self.touch();
        debug!(txn = %id, "transaction added");
        Ok(id)
    }

    /// Replace a transaction wholesale, keeping its id and position.
    pub fn replace_transaction(&mut self, id: &str, draft: TxnDraft) -> Result<(), LedgerError> {
        self.validate(&draft)?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Transaction, id))?;
        *slot = build_transaction(id.to_string(), draft);
        self.touch();
        debug!(txn = %id, "transaction replaced");
        Ok(())
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, LedgerError> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Transaction, id))?;
        let removed = self.transactions.remove(pos);
        self.touch();
        debug!(txn = %id, "transaction deleted");
        Ok(removed)
    }

    fn validate(&self, d: &TxnDraft) -> Result<(), LedgerError> {
        if d.amount <= Decimal::ZERO {
            return Err(LedgerError::validation("amount must be greater than zero"));
        }
        if self.account(&d.account_id).is_none() {
            return Err(LedgerError::not_found(EntityKind::Account, &d.account_id));
        }
        match d.kind {
            TxnType::Transfer => {
                let to = d
                    .to_account_id
                    .as_deref()
                    .ok_or_else(|| LedgerError::validation("transfer needs a destination account"))?;
                if to == d.account_id {
                    return Err(LedgerError::validation(
                        "transfer source and destination must differ",
                    ));
                }
                if self.account(to).is_none() {
                    return Err(LedgerError::not_found(EntityKind::Account, to));
                }
                if d.cat_id.is_some() || d.sub_cat_id.is_some() {
                    return Err(LedgerError::validation("transfers carry no category"));
                }
            }
            TxnType::Income => {
                reject_destination(d)?;
                if d.sub_cat_id.is_some() {
                    return Err(LedgerError::validation(
                        "only expenses may carry a sub-category",
                    ));
                }
                let cat = d
                    .cat_id
                    .as_deref()
                    .ok_or_else(|| LedgerError::validation("income needs a category"))?;
                if self.income_category(cat).is_none() {
                    return Err(LedgerError::not_found(EntityKind::IncomeCategory, cat));
                }
            }
            TxnType::Expense => {
                reject_destination(d)?;
                let cat = d
                    .cat_id
                    .as_deref()
                    .ok_or_else(|| LedgerError::validation("expense needs a category"))?;
                let parent = self
                    .expense_category(cat)
                    .ok_or_else(|| LedgerError::not_found(EntityKind::ExpenseCategory, cat))?;
                if let Some(sub) = d.sub_cat_id.as_deref() {
                    if parent.sub_category(sub).is_none() {
                        return Err(LedgerError::validation(format!(
                            "sub-category '{}' does not belong to '{}'",
                            sub, parent.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    // ---- settings ------------------------------------------------------

    pub fn set_app_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.app_name = if trimmed.is_empty() {
            DEFAULT_APP_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self.touch();
    }

    pub fn set_carry_forward(&mut self, on: bool) {
        self.settings.carry_forward = on;
        self.touch();
    }

    pub fn set_notifications(&mut self, on: bool) {
        self.settings.notifications = on;
        self.touch();
    }

    pub fn set_sms_detection(&mut self, on: bool) {
        self.settings.sms_detection = on;
        self.touch();
    }

    pub fn set_ui_mode(&mut self, mode: UiMode) {
        self.settings.ui_mode = mode.as_str().to_string();
        self.touch();
    }

    /// Add an `HH:MM` reminder. Times stay sorted and unique.
    pub fn add_reminder(&mut self, time: &str) -> Result<(), LedgerError> {
        let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| {
            LedgerError::validation(format!("invalid reminder time '{}', expected HH:MM", time))
        })?;
        let hhmm = parsed.format("%H:%M").to_string();
        if !self.settings.reminder_times.contains(&hhmm) {
            self.settings.reminder_times.push(hhmm);
            self.settings.reminder_times.sort();
            self.touch();
        }
        Ok(())
    }

    /// Remove a reminder. Accepts the same spellings as [`Store::add_reminder`],
    /// so "9:00" matches a stored "09:00".
    pub fn remove_reminder(&mut self, time: &str) -> bool {
        let Ok(parsed) = NaiveTime::parse_from_str(time.trim(), "%H:%M") else {
            return false;
        };
        let hhmm = parsed.format("%H:%M").to_string();
        let before = self.settings.reminder_times.len();
        self.settings.reminder_times.retain(|t| *t != hhmm);
        let removed = self.settings.reminder_times.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Replace the whole document, e.g. after restoring a backup.
    pub fn replace_with(&mut self, other: Store) {
        let revision = self.revision;
        *self = other;
        self.revision = revision + 1;
    }

    /// Fill an empty ledger with the starter accounts and categories.
    /// Returns false, changing nothing, when any account or category exists.
    pub fn seed_defaults(&mut self) -> bool {
        if !(self.accounts.is_empty()
            && self.expense_categories.is_empty()
            && self.income_categories.is_empty())
        {
            return false;
        }
        let defaults = Store::with_defaults();
        self.accounts = defaults.accounts;
        self.expense_categories = defaults.expense_categories;
        self.income_categories = defaults.income_categories;
        self.touch();
        true
    }

    /// The starter accounts and categories offered on first run.
    pub fn with_defaults() -> Self {
        let acct = |id: &str, name: &str, icon: &str, color: &str| Account {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            opening_bal: Decimal::ZERO,
        };
        let exp = |id: &str, name: &str, icon: &str, color: &str, subs: &[&str]| ExpenseCategory {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            sub: subs
                .iter()
                .enumerate()
                .map(|(i, s)| SubCategory {
                    id: format!("{}s{}", id, i + 1),
                    name: (*s).into(),
                })
                .collect(),
        };
        let inc = |id: &str, name: &str, icon: &str, color: &str| IncomeCategory {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        };
        Store {
            accounts: vec![
                acct("a1", "Savings", "🏦", "#10b981"),
                acct("a2", "Current", "🏦", "#3b82f6"),
                acct("a3", "Credit Card", "💳", "#f59e0b"),
                acct("a4", "Cash Wallet", "💵", "#8b5cf6"),
            ],
            expense_categories: vec![
                exp("e1", "Food & Dining", "🍽️", "#f97316", &["Restaurants", "Groceries", "Coffee & Snacks", "Food Delivery", "Milk", "Fruits & Vegetables"]),
                exp("e2", "Transportation", "🚗", "#3b82f6", &["Petrol", "Public Transit", "Taxi / Cab", "Maintenance"]),
                exp("e3", "Housing", "🏠", "#8b5cf6", &["Rent", "Electricity", "Water & Gas", "Repairs", "EMI"]),
                exp("e4", "Entertainment", "🎬", "#ec4899", &["Movies", "Streaming", "Games", "Events"]),
                exp("e5", "Health", "💊", "#14b8a6", &["Pharmacy", "Doctor", "Gym", "Insurance"]),
                exp("e6", "Shopping", "🛍️", "#f59e0b", &["Clothing", "Electronics", "Home Decor", "Gifts"]),
                exp("e7", "Education", "📚", "#06b6d4", &["Tuition", "Books", "Courses"]),
                exp("e8", "Personal Care", "💆", "#a855f7", &["Salon & Spa", "Cosmetics"]),
                exp("e9", "Bills", "🧾", "#64748b", &["Mobile", "Internet", "DTH/Cable"]),
                exp("e10", "Grocery", "🛒", "#84cc16", &["Supermarket", "Household", "Snacks"]),
                exp("e11", "Miscellaneous", "📦", "#94a3b8", &["Other"]),
            ],
            income_categories: vec![
                inc("i1", "Salary", "💼", "#10b981"),
                inc("i2", "Freelance", "💻", "#3b82f6"),
                inc("i3", "Business", "🏢", "#f59e0b"),
                inc("i4", "Investments", "📈", "#8b5cf6"),
                inc("i5", "Rental Income", "🏘️", "#14b8a6"),
                inc("i6", "Bonus", "🎁", "#ec4899"),
                inc("i7", "IPO / Stocks", "📊", "#3b82f6"),
                inc("i8", "Other", "💰", "#64748b"),
            ],
            ..Store::default()
        }
    }
}

fn build_transaction(id: String, d: TxnDraft) -> Transaction {
    Transaction {
        id,
        date: d.date,
        kind: d.kind,
        account_id: d.account_id,
        to_account_id: d.to_account_id,
        cat_id: d.cat_id,
        sub_cat_id: d.sub_cat_id,
        amount: d.amount,
        note: d.note,
    }
}

fn reject_destination(d: &TxnDraft) -> Result<(), LedgerError> {
    if d.to_account_id.is_some() {
        return Err(LedgerError::validation(
            "only transfers may name a destination account",
        ));
    }
    Ok(())
}

fn required_name(name: &str, what: &str) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(format!("{} name is required", what)));
    }
    Ok(trimmed.to_string())
}

fn check_color(color: &str) -> Result<(), LedgerError> {
    if color.is_empty() || is_hex_color(color) {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "invalid color '{}', expected #rrggbb",
            color
        )))
    }
}

fn fresh_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let raw = Uuid::new_v4().simple().to_string();
        let id = format!("{}{}", prefix, &raw[..8]);
        if !taken(&id) {
            return id;
        }
    }
}
