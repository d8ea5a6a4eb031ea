// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use tracing::debug;

use finhub::{cli, commands, period, storage, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    utils::init_tracing(matches.get_flag("verbose"));

    let now: NaiveDateTime = match matches.get_one::<String>("as_of") {
        Some(d) => period::start_of_day(utils::parse_date(d)?),
        None => Local::now().naive_local(),
    };
    let data = matches.get_one::<String>("data").map(PathBuf::from);
    let (mut store, path) = storage::open_or_init(data.as_deref())?;
    let revision = store.revision();
    let mut force_save = false;

    match matches.subcommand() {
        Some(("init", sub)) => {
            force_save = true;
            if sub.get_flag("defaults") && !store.seed_defaults() {
                println!("Accounts or categories already exist; defaults not applied");
            }
            println!("Data file initialized at {}", path.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("subcategory", sub)) => commands::categories::handle_sub(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, now, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, now, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, now, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut store, sub)?,
        Some(("backup", sub)) => commands::backup::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    if force_save || store.revision() != revision {
        storage::save(&path, &store)?;
    } else {
        debug!("no changes to save");
    }
    Ok(())
}
