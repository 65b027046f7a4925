// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation over transactions: monthly balances and summaries, yearly
//! rollups, planned-vs-spent budgets and ad-hoc range totals.
//!
//! Every function reads through a [`Repository`] and returns a freshly built
//! value. Nothing is cached between calls, so callers re-run the query after
//! any change to the underlying data.

use crate::models::{BudgetSummary, CategorySummary, MonthlyBudget, Period, Transaction};
use crate::repo::Repository;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Income minus expenses for one month.
pub fn monthly_balance<R: Repository + ?Sized>(repo: &R, period: Period) -> Result<Decimal> {
    let txs = period_transactions(repo, period)?;
    let (income, expenses) = totals(&txs);
    tracing::debug!(%period, count = txs.len(), "monthly balance");
    Ok(income - expenses)
}

pub fn monthly_summary<R: Repository + ?Sized>(repo: &R, period: Period) -> Result<BudgetSummary> {
    let txs = period_transactions(repo, period)?;
    tracing::debug!(%period, count = txs.len(), "monthly summary");
    Ok(summarize(period, &txs))
}

/// Twelve summaries, January first.
pub fn yearly_summary<R: Repository + ?Sized>(repo: &R, year: i32) -> Result<Vec<BudgetSummary>> {
    let mut out = Vec::with_capacity(12);
    for month in 1..=12 {
        let period = Period::new(year, month)?;
        out.push(monthly_summary(repo, period)?);
    }
    Ok(out)
}

/// Transactions of a month as returned by the repository (newest first).
pub fn period_transactions<R: Repository + ?Sized>(
    repo: &R,
    period: Period,
) -> Result<Vec<Transaction>> {
    repo.list_transactions_in_range(period.first_day(), period.last_day())
        .with_context(|| format!("Failed to load transactions for {}", period))
}

/// `(income, expenses)` of a transaction set.
pub fn totals(txs: &[Transaction]) -> (Decimal, Decimal) {
    txs.iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| {
            if t.is_income {
                (inc + t.amount, exp)
            } else {
                (inc, exp + t.amount)
            }
        })
}

/// Builds the summary of `txs` for `period`.
///
/// Only expenses are broken down by category. Percentages are shares of the
/// period's total expenses, not of income plus expenses. Categories are
/// ordered by amount descending; equal amounts keep the order in which the
/// category first appears in `txs`.
pub fn summarize(period: Period, txs: &[Transaction]) -> BudgetSummary {
    let (total_income, total_expenses) = totals(txs);

    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut categories: Vec<CategorySummary> = Vec::new();
    for t in txs.iter().filter(|t| !t.is_income) {
        let slot = *index.entry(t.category_id).or_insert_with(|| {
            categories.push(CategorySummary {
                category_name: t.category_name.clone(),
                amount: Decimal::ZERO,
                transaction_count: 0,
                percentage: Decimal::ZERO,
                color: t.category_color.clone(),
            });
            categories.len() - 1
        });
        let entry = &mut categories[slot];
        entry.amount += t.amount;
        entry.transaction_count += 1;
    }

    for c in categories.iter_mut() {
        c.percentage = percentage_of(c.amount, total_expenses);
    }
    categories.sort_by(|a, b| b.amount.cmp(&a.amount));

    BudgetSummary {
        period,
        total_income,
        total_expenses,
        categories,
        transaction_count: txs.len(),
    }
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Merges the category breakdowns of several summaries by category name,
/// largest total first, keeping at most `limit` entries. Percentages are
/// recomputed against the combined expenses.
pub fn top_categories(summaries: &[BudgetSummary], limit: usize) -> Vec<CategorySummary> {
    let total: Decimal = summaries.iter().map(|s| s.total_expenses).sum();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<CategorySummary> = Vec::new();
    for c in summaries.iter().flat_map(|s| s.categories.iter()) {
        match index.get(c.category_name.as_str()) {
            Some(&i) => {
                merged[i].amount += c.amount;
                merged[i].transaction_count += c.transaction_count;
            }
            None => {
                index.insert(c.category_name.as_str(), merged.len());
                merged.push(c.clone());
            }
        }
    }
    for c in merged.iter_mut() {
        c.percentage = percentage_of(c.amount, total);
    }
    merged.sort_by(|a, b| b.amount.cmp(&a.amount));
    merged.truncate(limit);
    merged
}

/// One entry per active category for the month, sorted by category name
/// (plain byte order). Categories without a stored budget get an unsaved
/// zero placeholder; spent amounts come from a single pass over the month's
/// expenses.
pub fn resolve_monthly_budgets<R: Repository + ?Sized>(
    repo: &R,
    period: Period,
) -> Result<Vec<MonthlyBudget>> {
    let (month, year) = (period.month(), period.year());
    let categories = repo.list_active_categories()?;
    let mut stored: HashMap<i64, MonthlyBudget> = repo
        .list_monthly_budgets(month, year)?
        .into_iter()
        .map(|b| (b.category_id, b))
        .collect();

    let mut spent: HashMap<i64, Decimal> = HashMap::new();
    for t in period_transactions(repo, period)?.iter().filter(|t| !t.is_income) {
        *spent.entry(t.category_id).or_insert(Decimal::ZERO) += t.amount;
    }

    let mut out: Vec<MonthlyBudget> = categories
        .into_iter()
        .map(|c| {
            let mut b = stored.remove(&c.id).unwrap_or_else(|| MonthlyBudget {
                id: None,
                category_id: c.id,
                category_name: c.name.clone(),
                category_color: c.color.clone(),
                planned_amount: Decimal::ZERO,
                month,
                year,
                spent_amount: Decimal::ZERO,
            });
            b.spent_amount = spent.get(&c.id).copied().unwrap_or(Decimal::ZERO);
            b
        })
        .collect();
    out.sort_by(|a, b| a.category_name.cmp(&b.category_name));
    tracing::debug!(%period, entries = out.len(), "resolved monthly budgets");
    Ok(out)
}

/// Validates and upserts a planned amount. Repeated calls with the same
/// category and month overwrite the same row.
pub fn set_monthly_budget<R: Repository + ?Sized>(
    repo: &R,
    category_id: i64,
    period: Period,
    planned_amount: Decimal,
) -> Result<MonthlyBudget> {
    MonthlyBudget::validate_planned(planned_amount)?;
    let mut b =
        repo.upsert_monthly_budget(category_id, period.month(), period.year(), planned_amount)?;
    b.spent_amount = period_transactions(repo, period)?
        .iter()
        .filter(|t| !t.is_income && t.category_id == category_id)
        .map(|t| t.amount)
        .sum();
    Ok(b)
}

/// Expense totals per category name within `[start, end]`.
pub fn category_totals<R: Repository + ?Sized>(
    repo: &R,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BTreeMap<String, Decimal>> {
    let mut out = BTreeMap::new();
    for t in repo
        .list_transactions_in_range(start, end)?
        .into_iter()
        .filter(|t| !t.is_income)
    {
        *out.entry(t.category_name).or_insert(Decimal::ZERO) += t.amount;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeStatistics {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub transaction_count: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub average_daily_expense: Decimal,
    pub largest_expense: Decimal,
    pub largest_income: Decimal,
    pub most_frequent_category: Option<String>,
}

pub fn range_statistics<R: Repository + ?Sized>(
    repo: &R,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RangeStatistics> {
    let txs = repo.list_transactions_in_range(start, end)?;
    let (total_income, total_expenses) = totals(&txs);
    let days = (end - start).num_days().max(1);

    let largest = |income: bool| {
        txs.iter()
            .filter(|t| t.is_income == income)
            .map(|t| t.amount)
            .max()
            .unwrap_or(Decimal::ZERO)
    };

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for t in &txs {
        match counts.iter_mut().find(|(n, _)| *n == t.category_name) {
            Some((_, c)) => *c += 1,
            None => counts.push((t.category_name.as_str(), 1)),
        }
    }
    // max_by_key keeps the last maximum; walk in reverse to keep the first.
    let most_frequent_category = counts
        .iter()
        .rev()
        .max_by_key(|(_, c)| *c)
        .map(|(n, _)| n.to_string());

    Ok(RangeStatistics {
        start,
        end,
        transaction_count: txs.len(),
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        average_daily_expense: total_expenses / Decimal::from(days),
        largest_expense: largest(false),
        largest_income: largest(true),
        most_frequent_category,
    })
}
