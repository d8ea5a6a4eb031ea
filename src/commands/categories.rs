// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{category_kind, optional, required, resolve_category, resolve_sub_category};
use crate::models::{CategoryKind, SubCategory};
use crate::store::{CategoryDraft, CategoryPatch, Store};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
pub struct CategoryRow {
    pub kind: CategoryKind,
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub: Vec<SubCategory>,
}

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind = category_kind(sub)?;
            let draft = CategoryDraft {
                name: required(sub, "name")?.to_string(),
                icon: optional(sub, "icon").unwrap_or_default().to_string(),
                color: optional(sub, "color").unwrap_or_default().to_string(),
            };
            let id = store.add_category(kind, draft)?;
            println!("Added {} category {}", kind.as_str(), id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => {
            let kind = category_kind(sub)?;
            let id = resolve_category(store, kind, required(sub, "category")?)?;
            let patch = CategoryPatch {
                name: optional(sub, "name").map(str::to_string),
                icon: optional(sub, "icon").map(str::to_string),
                color: optional(sub, "color").map(str::to_string),
            };
            store.update_category(kind, &id, patch)?;
            println!("Updated {} category {}", kind.as_str(), id);
        }
        Some(("rm", sub)) => {
            let kind = category_kind(sub)?;
            let id = resolve_category(store, kind, required(sub, "category")?)?;
            store.delete_category(kind, &id)?;
            println!("Removed {} category {}", kind.as_str(), id);
        }
        _ => {}
    }
    Ok(())
}

/// `subcategory` commands. Sub-categories live under expense categories only.
pub fn handle_sub(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let parent = resolve_category(store, CategoryKind::Expense, required(sub, "category")?)?;
            let id = store.add_sub_category(&parent, required(sub, "name")?)?;
            println!("Added sub-category {} under {}", id, parent);
        }
        Some(("edit", sub)) => {
            let (parent, id) = locate_sub(store, sub)?;
            store.rename_sub_category(&parent, &id, required(sub, "name")?)?;
            println!("Renamed sub-category {}", id);
        }
        Some(("rm", sub)) => {
            let (parent, id) = locate_sub(store, sub)?;
            store.delete_sub_category(&parent, &id)?;
            println!("Removed sub-category {} from {}", id, parent);
        }
        _ => {}
    }
    Ok(())
}

fn locate_sub(store: &Store, sub: &clap::ArgMatches) -> Result<(String, String)> {
    let parent = match optional(sub, "category") {
        Some(key) => Some(resolve_category(store, CategoryKind::Expense, key)?),
        None => None,
    };
    resolve_sub_category(store, parent.as_deref(), required(sub, "sub")?)
}

pub fn category_rows(store: &Store, kind: Option<CategoryKind>) -> Vec<CategoryRow> {
    let mut rows = Vec::new();
    if kind.is_none_or(|k| k == CategoryKind::Expense) {
        rows.extend(store.expense_categories.iter().map(|c| CategoryRow {
            kind: CategoryKind::Expense,
            id: c.id.clone(),
            name: c.name.clone(),
            icon: c.icon.clone(),
            color: c.color.clone(),
            sub: c.sub.clone(),
        }));
    }
    if kind.is_none_or(|k| k == CategoryKind::Income) {
        rows.extend(store.income_categories.iter().map(|c| CategoryRow {
            kind: CategoryKind::Income,
            id: c.id.clone(),
            name: c.name.clone(),
            icon: c.icon.clone(),
            color: c.color.clone(),
            sub: Vec::new(),
        }));
    }
    rows
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let kind: Option<CategoryKind> = optional(sub, "kind").map(str::parse).transpose()?;
    let data = category_rows(store, kind);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|c| {
            vec![
                c.kind.as_str().to_string(),
                c.id.clone(),
                format!("{} {}", c.icon, c.name).trim().to_string(),
                c.color.clone(),
                c.sub
                    .iter()
                    .map(|s| format!("{} ({})", s.name, s.id))
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Kind", "Id", "Category", "Color", "Sub-categories"], rows)
    );
    Ok(())
}
