// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::models::UiMode;
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_flag, pretty_table};
use anyhow::Result;
use serde_json::json;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("set", sub)) => set(store, sub)?,
        Some(("reminder-add", sub)) => {
            let time = required(sub, "time")?;
            store.add_reminder(time)?;
            println!(
                "Reminders: {}",
                store.settings.reminder_times.join(", ")
            );
        }
        Some(("reminder-rm", sub)) => {
            let time = required(sub, "time")?;
            if store.remove_reminder(time) {
                println!("Removed reminder at {}", time.trim());
            } else {
                println!("No reminder at {}", time.trim());
            }
        }
        _ => {}
    }
    Ok(())
}

fn show(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let s = &store.settings;
    let doc = json!({
        "appName": store.app_name,
        "settings": s,
        "reminders": s.reminder_schedule(),
    });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &doc)? {
        return Ok(());
    }
    let on_off = |b: bool| (if b { "on" } else { "off" }).to_string();
    let rows = vec![
        vec!["App name".to_string(), store.app_name.clone()],
        vec!["UI mode".into(), s.ui_mode().as_str().to_string()],
        vec!["Carry forward".into(), on_off(s.carry_forward)],
        vec!["Notifications".into(), on_off(s.notifications)],
        vec!["Reminder times".into(), s.reminder_times.join(", ")],
        vec!["SMS detection".into(), on_off(s.sms_detection)],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn set(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let mut changed = Vec::new();
    if let Some(v) = optional(sub, "carry_forward") {
        store.set_carry_forward(parse_flag(v)?);
        changed.push("carry forward");
    }
    if let Some(v) = optional(sub, "notifications") {
        store.set_notifications(parse_flag(v)?);
        changed.push("notifications");
    }
    if let Some(v) = optional(sub, "sms") {
        store.set_sms_detection(parse_flag(v)?);
        changed.push("sms detection");
    }
    if let Some(v) = optional(sub, "ui_mode") {
        let mode: UiMode = v.parse()?;
        store.set_ui_mode(mode);
        changed.push("ui mode");
    }
    if let Some(v) = optional(sub, "app_name") {
        store.set_app_name(v);
        changed.push("app name");
    }
    if changed.is_empty() {
        println!("Nothing to change");
    } else {
        println!("Updated {}", changed.join(", "));
    }
    Ok(())
}
