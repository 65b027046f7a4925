// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::BudgetError;
use anyhow::Result;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_DESCRIPTION_LEN: usize = 200;
pub const MAX_CATEGORY_NAME_LEN: usize = 50;
pub const MAX_TRANSACTION_AGE_YEARS: u32 = 10;
pub const DEFAULT_CATEGORY_COLOR: &str = "#3498db";
pub const DEFAULT_CURRENCY: &str = "PLN";
/// Amounts are stored with at most this many decimal places.
pub const AMOUNT_SCALE: u32 = 2;
/// Exclusive upper bound for a single amount (16 integer digits).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1874919424, 2328306, 0, false, 0);

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("static color regex"));

/// Rejects amounts that do not fit 16 integer digits and 2 decimal places.
/// Sums of such amounts stay far inside `Decimal`'s range.
pub fn check_amount_bounds(what: &str, amount: Decimal) -> Result<(), BudgetError> {
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(BudgetError::validation(format!(
            "{} {} has more than {} decimal places",
            what, amount, AMOUNT_SCALE
        )));
    }
    if amount.abs() >= MAX_AMOUNT {
        return Err(BudgetError::validation(format!(
            "{} {} is too large",
            what, amount
        )));
    }
    Ok(())
}

/// A calendar month. Always stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    start: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, BudgetError> {
        if !(1..=12).contains(&month) {
            return Err(BudgetError::validation(format!(
                "month must be 1-12, got {}",
                month
            )));
        }
        if !(1000..=9999).contains(&year) {
            return Err(BudgetError::validation(format!(
                "year must have four digits, got {}",
                year
            )));
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| BudgetError::validation(format!("invalid period {}-{}", year, month)))?;
        Ok(Period { start })
    }

    /// Parses `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self> {
        let first = crate::utils::parse_month(s)?;
        Ok(Period::new(first.year(), first.month())?)
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period {
            start: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month minus one day, so month length and
    /// leap years fall out of the calendar arithmetic.
    pub fn last_day(&self) -> NaiveDate {
        self.start + Months::new(1) - Days::new(1)
    }

    pub fn next(&self) -> Self {
        Period {
            start: self.start + Months::new(1),
        }
    }

    pub fn prev(&self) -> Self {
        Period {
            start: self.start - Months::new(1),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub is_active: bool,
}

/// Input for creating or editing a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), BudgetError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BudgetError::validation("category name is required"));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(BudgetError::validation(format!(
                "category name longer than {} characters",
                MAX_CATEGORY_NAME_LEN
            )));
        }
        if let Some(desc) = &self.description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(BudgetError::validation(format!(
                    "category description longer than {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        if let Some(color) = &self.color {
            if !HEX_COLOR.is_match(color) {
                return Err(BudgetError::validation(format!(
                    "invalid color '{}', expected #RRGGBB",
                    color
                )));
            }
        }
        Ok(())
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR)
    }
}

/// A stored transaction. `category_name` and `category_color` are joined in
/// from the category row when the transaction is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub category_id: i64,
    pub category_name: String,
    pub category_color: String,
    pub is_income: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Input for recording or editing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub category_id: i64,
    pub is_income: bool,
}

impl NewTransaction {
    /// Checks the rules every stored transaction must satisfy. Category
    /// existence is checked by the repository.
    pub fn validate(&self, today: NaiveDate) -> Result<(), BudgetError> {
        if self.amount <= Decimal::ZERO {
            return Err(BudgetError::validation("amount must be greater than zero"));
        }
        check_amount_bounds("amount", self.amount)?;
        let desc = self.description.trim();
        if desc.is_empty() {
            return Err(BudgetError::validation("description is required"));
        }
        if desc.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(BudgetError::validation(format!(
                "description longer than {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        if self.date > today {
            return Err(BudgetError::validation(format!(
                "date {} is in the future",
                self.date
            )));
        }
        let oldest = today - Months::new(12 * MAX_TRANSACTION_AGE_YEARS);
        if self.date < oldest {
            return Err(BudgetError::validation(format!(
                "date {} is more than {} years old",
                self.date, MAX_TRANSACTION_AGE_YEARS
            )));
        }
        Ok(())
    }
}

/// Planned-vs-spent view of one category in one month.
///
/// `id` is `None` for placeholders synthesized for categories without a
/// stored budget row. `spent_amount` is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub id: Option<i64>,
    pub category_id: i64,
    pub category_name: String,
    pub category_color: String,
    pub planned_amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub spent_amount: Decimal,
}

impl MonthlyBudget {
    pub fn validate_planned(planned: Decimal) -> Result<(), BudgetError> {
        if planned < Decimal::ZERO {
            return Err(BudgetError::validation(
                "planned amount must not be negative",
            ));
        }
        check_amount_bounds("planned amount", planned)
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.planned_amount - self.spent_amount
    }

    /// Zero when nothing was planned.
    pub fn percentage_used(&self) -> Decimal {
        if self.planned_amount.is_zero() {
            Decimal::ZERO
        } else {
            self.spent_amount / self.planned_amount * Decimal::ONE_HUNDRED
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent_amount > self.planned_amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub default_currency: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl AppSettings {
    pub fn currency_symbol(&self) -> &str {
        crate::utils::currency_symbol(&self.default_currency)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_name: String,
    pub amount: Decimal,
    pub transaction_count: usize,
    /// Share of the period's total expenses, 0-100.
    pub percentage: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub period: Period,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub categories: Vec<CategorySummary>,
    pub transaction_count: usize,
}

impl BudgetSummary {
    pub fn empty(period: Period) -> Self {
        BudgetSummary {
            period,
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            categories: Vec::new(),
            transaction_count: 0,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expenses
    }

    pub fn is_surplus(&self) -> bool {
        self.balance() >= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(
            Period::new(2024, 2).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            Period::new(2023, 2).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(
            Period::new(2024, 12).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn period_navigation_crosses_years() {
        let jan = Period::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), Period::new(2024, 12).unwrap());
        assert_eq!(jan.prev().next(), jan);
        assert_eq!(jan.to_string(), "2025-01");
    }

    #[test]
    fn period_rejects_bad_month() {
        assert!(Period::new(2025, 13).is_err());
        assert!(Period::new(2025, 0).is_err());
        assert!(Period::new(99, 1).is_err());
    }

    #[test]
    fn percentage_used_is_zero_without_plan() {
        let b = MonthlyBudget {
            id: None,
            category_id: 1,
            category_name: "Food".into(),
            category_color: DEFAULT_CATEGORY_COLOR.into(),
            planned_amount: Decimal::ZERO,
            month: 3,
            year: 2024,
            spent_amount: Decimal::new(50, 0),
        };
        assert_eq!(b.percentage_used(), Decimal::ZERO);
        assert_eq!(b.remaining_amount(), Decimal::new(-50, 0));
        assert!(b.is_over_budget());
    }

    #[test]
    fn max_amount_is_ten_to_the_sixteenth() {
        assert_eq!(MAX_AMOUNT, Decimal::from(10_000_000_000_000_000i64));
    }

    #[test]
    fn planned_amount_bounds() {
        assert!(MonthlyBudget::validate_planned(Decimal::ZERO).is_ok());
        assert!(MonthlyBudget::validate_planned("1500.50".parse().unwrap()).is_ok());
        assert!(MonthlyBudget::validate_planned("12.5000".parse().unwrap()).is_ok());
        assert!(MonthlyBudget::validate_planned(Decimal::new(1, 28)).is_err());
        assert!(MonthlyBudget::validate_planned("0.001".parse().unwrap()).is_err());
        assert!(MonthlyBudget::validate_planned(MAX_AMOUNT).is_err());
        assert!(MonthlyBudget::validate_planned(MAX_AMOUNT - Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn color_validation() {
        let mut c = NewCategory {
            name: "Food".into(),
            description: None,
            color: Some("#E74C3C".into()),
        };
        assert!(c.validate().is_ok());
        c.color = Some("red".into());
        assert!(c.validate().is_err());
    }
}
