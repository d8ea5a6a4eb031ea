// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use thiserror::Error;

/// Which collection an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    ExpenseCategory,
    IncomeCategory,
    SubCategory,
    Transaction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Account => "account",
            EntityKind::ExpenseCategory => "expense category",
            EntityKind::IncomeCategory => "income category",
            EntityKind::SubCategory => "sub-category",
            EntityKind::Transaction => "transaction",
        };
        f.write_str(s)
    }
}

/// Rejections raised by store mutations. A rejected mutation leaves the store untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("Cannot delete {kind} '{id}': has {count} transaction(s)")]
    HasTransactions {
        kind: EntityKind,
        id: String,
        count: usize,
    },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
