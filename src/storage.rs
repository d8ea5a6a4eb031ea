// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{Account, ExpenseCategory, IncomeCategory, Settings, Transaction};
use crate::store::Store;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Finhub", "finhub"));

/// Overrides the data file location.
pub const DATA_ENV: &str = "FINHUB_DATA";

/// Version tag written into full-state backups.
pub const BACKUP_VERSION: &str = "7.0";

const TMP_SUFFIX: &str = "tmp";

pub fn data_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DATA_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finhub.json"))
}

/// Load the store at `path`, or `data_path()` when none is given. A missing
/// file yields an empty store.
pub fn open_or_init(path: Option<&Path>) -> Result<(Store, PathBuf)> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => data_path()?,
    };
    let store = load(&path)?;
    Ok((store, path))
}

pub fn load(path: &Path) -> Result<Store> {
    if !path.exists() {
        debug!(path = %path.display(), "no data file yet, starting empty");
        return Ok(Store::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read data file {}", path.display()))?;
    let store: Store = serde_json::from_str(&raw)
        .with_context(|| format!("Parse data file {}", path.display()))?;
    debug!(
        path = %path.display(),
        accounts = store.accounts.len(),
        transactions = store.transactions.len(),
        "store loaded"
    );
    Ok(store)
}

/// Write via a sibling temp file and rename, so a crash never leaves half a document.
pub fn save(path: &Path, store: &Store) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Create data dir {}", dir.display()))?;
        }
    }
    let tmp = path.with_extension(TMP_SUFFIX);
    let body = serde_json::to_string_pretty(store)?;
    fs::write(&tmp, body).with_context(|| format!("Write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Move {} into place", tmp.display()))?;
    info!(path = %path.display(), revision = store.revision(), "store saved");
    Ok(())
}

/// Full-state backup. Every section is optional on read so partial files restore partially.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub backup_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub accounts: Option<Vec<Account>>,
    #[serde(default, rename = "expCats")]
    pub expense_categories: Option<Vec<ExpenseCategory>>,
    #[serde(default, rename = "incCats")]
    pub income_categories: Option<Vec<IncomeCategory>>,
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl Backup {
    pub fn from_store(store: &Store, now: DateTime<Utc>) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            backup_date: Some(now),
            app_name: Some(store.app_name.clone()),
            accounts: Some(store.accounts.clone()),
            expense_categories: Some(store.expense_categories.clone()),
            income_categories: Some(store.income_categories.clone()),
            transactions: Some(store.transactions.clone()),
            settings: Some(store.settings.clone()),
        }
    }

    /// Replace the sections present in this backup; absent sections stay as they are.
    pub fn restore_into(self, store: &mut Store) {
        let mut next = store.clone();
        if let Some(v) = self.app_name {
            next.app_name = v;
        }
        if let Some(v) = self.accounts {
            next.accounts = v;
        }
        if let Some(v) = self.expense_categories {
            next.expense_categories = v;
        }
        if let Some(v) = self.income_categories {
            next.income_categories = v;
        }
        if let Some(v) = self.transactions {
            next.transactions = v;
        }
        if let Some(v) = self.settings {
            next.settings = v;
        }
        store.replace_with(next);
    }
}

pub fn default_backup_name(now: DateTime<Utc>) -> String {
    format!("finance-backup-{}.json", now.format("%Y-%m-%d"))
}

pub fn write_backup(path: &Path, store: &Store, now: DateTime<Utc>) -> Result<()> {
    let backup = Backup::from_store(store, now);
    fs::write(path, serde_json::to_string_pretty(&backup)?)
        .with_context(|| format!("Write backup {}", path.display()))?;
    info!(path = %path.display(), "backup written");
    Ok(())
}

pub fn read_backup(path: &Path) -> Result<Backup> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read backup {}", path.display()))?;
    let backup: Backup = serde_json::from_str(&raw)
        .with_context(|| format!("Cannot read {}; is it a valid .json backup?", path.display()))?;
    if backup.version.trim().is_empty() {
        bail!("Invalid backup file {}: missing version", path.display());
    }
    Ok(backup)
}
