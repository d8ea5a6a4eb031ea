// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::anyhow;

use crate::ledger::sort_newest_first;
use crate::models::{Transaction, TxnType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TxnType),
}

impl TypeFilter {
    pub fn matches(&self, kind: TxnType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(k) => *k == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(TypeFilter::All),
            other => other
                .parse::<TxnType>()
                .map(TypeFilter::Only)
                .map_err(|_| anyhow!("Unknown type filter '{}' (use all|income|expense|transfer)", s)),
        }
    }
}

/// Secondary filters applied on top of a period-scoped list. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxnFilter {
    pub kind: TypeFilter,
    pub cat_id: Option<String>,
    pub sub_cat_id: Option<String>,
    pub account_id: Option<String>,
    pub limit: Option<usize>,
}

impl TxnFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if !self.kind.matches(t.kind) {
            return false;
        }
        if let Some(cat) = self.cat_id.as_deref() {
            if t.cat_id.as_deref() != Some(cat) {
                return false;
            }
        }
        if let Some(sub) = self.sub_cat_id.as_deref() {
            if t.sub_cat_id.as_deref() != Some(sub) {
                return false;
            }
        }
        if let Some(acct) = self.account_id.as_deref() {
            // transfers show up under both ends
            if !t.touches_account(acct) {
                return false;
            }
        }
        true
    }

    /// Sort newest first, then filter, then truncate to `limit`.
    pub fn apply<'t>(&self, period_txns: &[&'t Transaction]) -> Vec<&'t Transaction> {
        let mut sorted: Vec<&'t Transaction> = period_txns.to_vec();
        sort_newest_first(&mut sorted);
        let matching = sorted.into_iter().filter(|t| self.matches(t));
        match self.limit {
            Some(n) => matching.take(n).collect(),
            None => matching.collect(),
        }
    }
}
