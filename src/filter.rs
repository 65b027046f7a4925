// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::totals;
use crate::models::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which category a transaction list is narrowed to. "All categories" is a
/// filter state, never a row in the category table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub category: CategoryFilter,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    pub transactions: Vec<Transaction>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

impl TransactionFilter {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        TransactionFilter {
            category,
            search: search.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category == CategoryFilter::All && self.search.is_empty()
    }

    pub fn clear(&mut self) {
        *self = TransactionFilter::default();
    }

    /// True when `t` passes both the category and the search filter.
    /// Search is case-insensitive over description, category name and the
    /// amount as text.
    pub fn matches(&self, t: &Transaction) -> bool {
        if let CategoryFilter::Only(id) = self.category {
            if t.category_id != id {
                return false;
            }
        }
        if self.search.is_empty() {
            return true;
        }
        // Matched as typed; surrounding whitespace is part of the needle.
        let needle = self.search.to_lowercase();
        t.description.to_lowercase().contains(&needle)
            || t.category_name.to_lowercase().contains(&needle)
            || t.amount.to_string().contains(&needle)
            || format!("{:.2}", t.amount).contains(&needle)
    }

    /// Derives a new view of `base` with totals recomputed. `base` is left
    /// untouched and its order is preserved.
    pub fn apply(&self, base: &[Transaction]) -> FilteredView {
        let transactions: Vec<Transaction> =
            base.iter().filter(|t| self.matches(t)).cloned().collect();
        let (total_income, total_expenses) = totals(&transactions);
        tracing::debug!(
            base = base.len(),
            kept = transactions.len(),
            "transaction filter applied"
        );
        FilteredView {
            transactions,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }
}
