// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Plain-text and CSV rendering of summaries. Rendering only builds strings;
//! [`write_report`] and [`write_csv`] put them on disk for callers that want
//! a file.

use crate::engine::top_categories;
use crate::models::{BudgetSummary, Period, Transaction};
use crate::utils::{fmt_money, round_half_away};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

pub const TOP_CATEGORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportLocale {
    #[default]
    English,
    Polish,
}

impl FromStr for ReportLocale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(ReportLocale::English),
            "pl" | "polish" => Ok(ReportLocale::Polish),
            other => bail!("Unknown report language '{}' (use en|pl)", other),
        }
    }
}

struct Labels {
    months: [&'static str; 12],
    monthly_title: &'static str,
    yearly_title: &'static str,
    financial_summary: &'static str,
    income: &'static str,
    expenses: &'static str,
    balance: &'static str,
    status: &'static str,
    surplus: &'static str,
    deficit: &'static str,
    by_category: &'static str,
    transactions: &'static str,
    date: &'static str,
    category: &'static str,
    description: &'static str,
    amount: &'static str,
    year_summary: &'static str,
    total_income: &'static str,
    total_expenses: &'static str,
    year_balance: &'static str,
    monthly_summary: &'static str,
    month: &'static str,
    top_categories: &'static str,
    count: &'static str,
    csv_header: &'static str,
    income_type: &'static str,
    expense_type: &'static str,
}

const EN: Labels = Labels {
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
    monthly_title: "MONTHLY REPORT",
    yearly_title: "YEARLY REPORT",
    financial_summary: "FINANCIAL SUMMARY:",
    income: "Income:",
    expenses: "Expenses:",
    balance: "Balance:",
    status: "Status:",
    surplus: "Surplus",
    deficit: "Deficit",
    by_category: "EXPENSES BY CATEGORY:",
    transactions: "TRANSACTIONS:",
    date: "Date",
    category: "Category",
    description: "Description",
    amount: "Amount",
    year_summary: "YEAR SUMMARY:",
    total_income: "Total income:",
    total_expenses: "Total expenses:",
    year_balance: "Year balance:",
    monthly_summary: "MONTHLY SUMMARY:",
    month: "Month",
    top_categories: "TOP 10 EXPENSE CATEGORIES:",
    count: "Transactions",
    csv_header: "Date,Category,Description,Amount,Type",
    income_type: "Income",
    expense_type: "Expense",
};

const PL: Labels = Labels {
    months: [
        "styczeń",
        "luty",
        "marzec",
        "kwiecień",
        "maj",
        "czerwiec",
        "lipiec",
        "sierpień",
        "wrzesień",
        "październik",
        "listopad",
        "grudzień",
    ],
    monthly_title: "RAPORT MIESIĘCZNY",
    yearly_title: "RAPORT ROCZNY",
    financial_summary: "PODSUMOWANIE FINANSOWE:",
    income: "Przychody:",
    expenses: "Wydatki:",
    balance: "Saldo:",
    status: "Status:",
    surplus: "Nadwyżka",
    deficit: "Deficyt",
    by_category: "WYDATKI WEDŁUG KATEGORII:",
    transactions: "LISTA TRANSAKCJI:",
    date: "Data",
    category: "Kategoria",
    description: "Opis",
    amount: "Kwota",
    year_summary: "PODSUMOWANIE ROCZNE:",
    total_income: "Łączne przychody:",
    total_expenses: "Łączne wydatki:",
    year_balance: "Saldo roczne:",
    monthly_summary: "PODSUMOWANIE MIESIĘCZNE:",
    month: "Miesiąc",
    top_categories: "TOP 10 KATEGORII WYDATKÓW:",
    count: "Transakcje",
    csv_header: "Data,Kategoria,Opis,Kwota,Typ",
    income_type: "Przychód",
    expense_type: "Wydatek",
};

impl ReportLocale {
    fn labels(self) -> &'static Labels {
        match self {
            ReportLocale::English => &EN,
            ReportLocale::Polish => &PL,
        }
    }

    /// "March 2024" / "marzec 2024".
    pub fn period_label(self, period: Period) -> String {
        let name = self.labels().months[(period.month() - 1) as usize];
        format!("{} {}", name, period.year())
    }

    pub fn status_label(self, balance: Decimal) -> &'static str {
        let l = self.labels();
        if balance >= Decimal::ZERO { l.surplus } else { l.deficit }
    }

    pub fn type_label(self, is_income: bool) -> &'static str {
        let l = self.labels();
        if is_income { l.income_type } else { l.expense_type }
    }

    pub fn csv_header(self) -> &'static str {
        self.labels().csv_header
    }
}

/// `+`/`-` prefixed amount as shown in transaction listings.
pub fn signed_money(t: &Transaction, symbol: &str) -> String {
    let sign = if t.is_income { '+' } else { '-' };
    format!("{}{}", sign, fmt_money(t.amount, symbol))
}

// `writeln!` into a String cannot fail.
macro_rules! push_line {
    ($out:expr) => {
        let _ = writeln!($out);
    };
    ($out:expr, $($arg:tt)*) => {
        let _ = writeln!($out, $($arg)*);
    };
}

pub fn render_monthly_report(
    summary: &BudgetSummary,
    transactions: &[Transaction],
    currency_symbol: &str,
    locale: ReportLocale,
) -> String {
    let l = locale.labels();
    let money = |d: Decimal| fmt_money(d, currency_symbol);
    let mut out = String::new();

    push_line!(
        out,
        "=== {} - {} ===",
        l.monthly_title,
        locale.period_label(summary.period).to_uppercase()
    );
    push_line!(out);
    push_line!(out, "{}", l.financial_summary);
    push_line!(out, "{:<15}{}", l.income, money(summary.total_income));
    push_line!(out, "{:<15}{}", l.expenses, money(summary.total_expenses));
    push_line!(out, "{:<15}{}", l.balance, money(summary.balance()));
    push_line!(out, "{:<15}{}", l.status, locale.status_label(summary.balance()));
    push_line!(out);

    if !summary.categories.is_empty() {
        push_line!(out, "{}", l.by_category);
        for c in &summary.categories {
            push_line!(
                out,
                "{:<20} {:>14} ({:>5.1}%)",
                c.category_name,
                money(c.amount),
                round_half_away(c.percentage, 1)
            );
        }
        push_line!(out);
    }

    push_line!(out, "{}", l.transactions);
    push_line!(
        out,
        "{:<12} {:<15} {:<30} {:>15}",
        l.date, l.category, l.description, l.amount
    );
    push_line!(out, "{}", "-".repeat(75));

    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| (t.date, t.id));
    for t in ordered {
        push_line!(
            out,
            "{:<12} {:<15} {:<30} {:>15}",
            t.date.format("%d.%m.%Y").to_string(),
            t.category_name,
            t.description,
            signed_money(t, currency_symbol)
        );
    }
    out
}

pub fn render_yearly_report(
    year: i32,
    summaries: &[BudgetSummary],
    currency_symbol: &str,
    locale: ReportLocale,
) -> String {
    let l = locale.labels();
    let money = |d: Decimal| fmt_money(d, currency_symbol);
    let total_income: Decimal = summaries.iter().map(|s| s.total_income).sum();
    let total_expenses: Decimal = summaries.iter().map(|s| s.total_expenses).sum();
    let mut out = String::new();

    push_line!(out, "=== {} - {} ===", l.yearly_title, year);
    push_line!(out);
    push_line!(out, "{}", l.year_summary);
    push_line!(out, "{:<19}{}", l.total_income, money(total_income));
    push_line!(out, "{:<19}{}", l.total_expenses, money(total_expenses));
    push_line!(out, "{:<19}{}", l.year_balance, money(total_income - total_expenses));
    push_line!(out);

    push_line!(out, "{}", l.monthly_summary);
    push_line!(
        out,
        "{:<20} {:>14} {:>14} {:>14}",
        l.month, l.income.trim_end_matches(':'), l.expenses.trim_end_matches(':'),
        l.balance.trim_end_matches(':')
    );
    push_line!(out, "{}", "-".repeat(65));
    for s in summaries {
        push_line!(
            out,
            "{:<20} {:>14} {:>14} {:>14}",
            locale.period_label(s.period),
            money(s.total_income),
            money(s.total_expenses),
            money(s.balance())
        );
    }
    push_line!(out);

    push_line!(out, "{}", l.top_categories);
    push_line!(out, "{:<20} {:>14} {:>12}", l.category, l.amount, l.count);
    push_line!(out, "{}", "-".repeat(48));
    for c in top_categories(summaries, TOP_CATEGORY_LIMIT) {
        push_line!(
            out,
            "{:<20} {:>14} {:>12}",
            c.category_name,
            money(c.amount),
            c.transaction_count
        );
    }
    out
}

/// Quotes a CSV field, doubling embedded quotes.
pub fn csv_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Header plus one line per transaction, in the given order. Dates are ISO,
/// amounts unsigned; the type column carries income vs. expense.
pub fn to_csv_rows(transactions: &[Transaction], locale: ReportLocale) -> Vec<String> {
    let mut rows = Vec::with_capacity(transactions.len() + 1);
    rows.push(locale.csv_header().to_string());
    for t in transactions {
        rows.push(format!(
            "{},{},{},{},{}",
            t.date.format("%Y-%m-%d"),
            csv_quote(&t.category_name),
            csv_quote(&t.description),
            t.amount,
            locale.type_label(t.is_income)
        ));
    }
    rows
}

pub fn write_report(path: &Path, report: &str) -> Result<()> {
    std::fs::write(path, report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = report.len(), "report written");
    Ok(())
}

pub fn write_csv(path: &Path, rows: &[String]) -> Result<()> {
    let mut body = rows.join("\n");
    body.push('\n');
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = rows.len().saturating_sub(1), "csv written");
    Ok(())
}
