// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures the budget layer reports to its callers.
///
/// Storage failures are not listed here; they travel as `rusqlite::Error`
/// inside `anyhow::Error`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl BudgetError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BudgetError::Validation(msg.into())
    }
}
