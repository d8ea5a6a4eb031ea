// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &Store) -> Result<()> {
    let rows: Vec<Vec<String>> = store
        .ledger()
        .warnings()
        .into_iter()
        .map(|w| vec![w])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue"], rows));
    }
    Ok(())
}
