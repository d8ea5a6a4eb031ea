// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use super::{optional, required};
use crate::storage::{default_backup_name, read_backup, write_backup};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let now = Utc::now();
            let out = optional(sub, "out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default_backup_name(now)));
            write_backup(&out, store, now)?;
            println!(
                "Backed up {} transaction(s) to {}",
                store.transactions.len(),
                out.display()
            );
        }
        Some(("restore", sub)) => {
            let file = PathBuf::from(required(sub, "file")?);
            let backup = read_backup(&file)?;
            let version = backup.version.clone();
            backup.restore_into(store);
            println!(
                "Restored backup v{}: {} account(s), {} transaction(s)",
                version,
                store.accounts.len(),
                store.transactions.len()
            );
        }
        _ => {}
    }
    Ok(())
}
