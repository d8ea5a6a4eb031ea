// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub opening_bal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub sub: Vec<SubCategory>,
}

impl ExpenseCategory {
    pub fn sub_category(&self, sub_id: &str) -> Option<&SubCategory> {
        self.sub.iter().find(|s| s.id == sub_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

/// Fields shared by expense and income categories.
pub trait CategoryInfo {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn icon(&self) -> &str;
    fn color(&self) -> &str;
}

impl CategoryInfo for ExpenseCategory {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn icon(&self) -> &str {
        &self.icon
    }
    fn color(&self) -> &str {
        &self.color
    }
}

impl CategoryInfo for IncomeCategory {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn icon(&self) -> &str {
        &self.icon
    }
    fn color(&self) -> &str {
        &self.color
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        }
    }

    /// The transaction type whose `cat_id` points into this category list.
    pub fn txn_type(&self) -> TxnType {
        match self {
            CategoryKind::Expense => TxnType::Expense,
            CategoryKind::Income => TxnType::Income,
        }
    }
}

impl FromStr for CategoryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(CategoryKind::Expense),
            "income" => Ok(CategoryKind::Income),
            other => Err(anyhow!("Unknown category kind '{}' (use expense|income)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    Income,
    Expense,
    Transfer,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Income => "income",
            TxnType::Expense => "expense",
            TxnType::Transfer => "transfer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TxnType::Income => "Income",
            TxnType::Expense => "Expense",
            TxnType::Transfer => "Transfer",
        }
    }

    pub fn category_kind(&self) -> Option<CategoryKind> {
        match self {
            TxnType::Income => Some(CategoryKind::Income),
            TxnType::Expense => Some(CategoryKind::Expense),
            TxnType::Transfer => None,
        }
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxnType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxnType::Income),
            "expense" => Ok(TxnType::Expense),
            "transfer" => Ok(TxnType::Transfer),
            other => Err(anyhow!(
                "Unknown transaction type '{}' (use income|expense|transfer)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub account_id: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub to_account_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub cat_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sub_cat_id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// +amount for income, -amount for expense, zero for transfers.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TxnType::Income => self.amount,
            TxnType::Expense => -self.amount,
            TxnType::Transfer => Decimal::ZERO,
        }
    }

    pub fn touches_account(&self, account_id: &str) -> bool {
        self.account_id == account_id || self.to_account_id.as_deref() == Some(account_id)
    }
}

// Older documents store "" where a reference was never chosen.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<String> = Option::deserialize(deserializer)?;
    Ok(v.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Dark,
    Light,
    Ocean,
    Forest,
    Sunset,
    Midnight,
    Rose,
}

impl UiMode {
    pub const ALL: [UiMode; 8] = [
        UiMode::Auto,
        UiMode::Dark,
        UiMode::Light,
        UiMode::Ocean,
        UiMode::Forest,
        UiMode::Sunset,
        UiMode::Midnight,
        UiMode::Rose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UiMode::Auto => "auto",
            UiMode::Dark => "dark",
            UiMode::Light => "light",
            UiMode::Ocean => "ocean",
            UiMode::Forest => "forest",
            UiMode::Sunset => "sunset",
            UiMode::Midnight => "midnight",
            UiMode::Rose => "rose",
        }
    }

    /// Concrete theme to render; `auto` follows the system preference.
    pub fn resolve(self, system_dark: bool) -> UiMode {
        match self {
            UiMode::Auto if system_dark => UiMode::Dark,
            UiMode::Auto => UiMode::Light,
            other => other,
        }
    }
}

impl FromStr for UiMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        UiMode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| anyhow!("Unknown ui mode '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub ui_mode: String,
    pub notifications: bool,
    pub reminder_times: Vec<String>,
    pub sms_detection: bool,
    pub carry_forward: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ui_mode: UiMode::Auto.as_str().to_string(),
            notifications: false,
            reminder_times: vec!["09:00".to_string(), "21:00".to_string()],
            sms_detection: true,
            carry_forward: false,
        }
    }
}

/// What the reminder collaborator needs to schedule notifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderSchedule<'a> {
    pub enabled: bool,
    pub times: &'a [String],
}

impl Settings {
    pub fn ui_mode(&self) -> UiMode {
        self.ui_mode.parse().unwrap_or(UiMode::Auto)
    }

    pub fn reminder_schedule(&self) -> ReminderSchedule<'_> {
        ReminderSchedule {
            enabled: self.notifications,
            times: &self.reminder_times,
        }
    }
}
