// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use housebudget::engine::{
    category_totals, monthly_balance, monthly_summary, range_statistics,
    resolve_monthly_budgets, set_monthly_budget, yearly_summary,
};
use housebudget::error::BudgetError;
use housebudget::models::Period;
use housebudget::repo::Repository;
use housebudget::{db, repo};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO categories(id, name, color) VALUES (1, 'Food', '#E74C3C'), (2, 'Transport', '#3498DB')",
        [],
    )
    .unwrap();
    conn
}

fn tx(conn: &Connection, date: &str, amount: &str, income: bool, cat: i64) {
    conn.execute(
        "INSERT INTO transactions(amount, date, description, category_id, is_income) VALUES (?1, ?2, 'tx', ?3, ?4)",
        params![amount, date, cat, income],
    )
    .unwrap();
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn march() -> Period {
    Period::new(2024, 3).unwrap()
}

fn march_scenario(conn: &Connection) {
    tx(conn, "2024-03-05", "100", false, 1);
    tx(conn, "2024-03-10", "50", false, 2);
    tx(conn, "2024-03-01", "1000", true, 1);
}

#[test]
fn empty_period_yields_zero_summary() {
    let conn = setup();
    let s = monthly_summary(&conn, march()).unwrap();
    assert_eq!(s.total_income, Decimal::ZERO);
    assert_eq!(s.total_expenses, Decimal::ZERO);
    assert_eq!(s.balance(), Decimal::ZERO);
    assert!(s.categories.is_empty());
    assert_eq!(s.transaction_count, 0);
    assert_eq!(monthly_balance(&conn, march()).unwrap(), Decimal::ZERO);
}

#[test]
fn march_scenario_breakdown() {
    let conn = setup();
    march_scenario(&conn);
    let s = monthly_summary(&conn, march()).unwrap();
    assert_eq!(s.total_income, dec("1000"));
    assert_eq!(s.total_expenses, dec("150"));
    assert_eq!(s.balance(), dec("850"));
    assert_eq!(s.transaction_count, 3);
    assert!(s.is_surplus());

    let names: Vec<&str> = s.categories.iter().map(|c| c.category_name.as_str()).collect();
    assert_eq!(names, ["Food", "Transport"]);
    assert_eq!(s.categories[0].amount, dec("100"));
    assert_eq!(s.categories[0].transaction_count, 1);
    assert_eq!(s.categories[0].color, "#E74C3C");
    assert_eq!(s.categories[0].percentage.round_dp(1), dec("66.7"));
    assert_eq!(s.categories[1].percentage.round_dp(1), dec("33.3"));
}

#[test]
fn percentages_sum_to_hundred() {
    let conn = setup();
    tx(&conn, "2024-03-02", "33.33", false, 1);
    tx(&conn, "2024-03-03", "17.01", false, 2);
    tx(&conn, "2024-03-04", "0.07", false, 2);
    let s = monthly_summary(&conn, march()).unwrap();
    let sum: Decimal = s.categories.iter().map(|c| c.percentage).sum();
    assert!((sum - Decimal::ONE_HUNDRED).abs() < dec("0.0001"), "sum was {}", sum);
}

#[test]
fn balance_matches_summary() {
    let conn = setup();
    march_scenario(&conn);
    tx(&conn, "2024-03-31", "900", false, 2);
    let s = monthly_summary(&conn, march()).unwrap();
    let b = monthly_balance(&conn, march()).unwrap();
    assert_eq!(b, s.total_income - s.total_expenses);
    assert_eq!(b, dec("-50"));
    assert!(!s.is_surplus());
}

#[test]
fn month_bounds_are_inclusive_and_leap_aware() {
    let conn = setup();
    tx(&conn, "2024-02-01", "1", false, 1);
    tx(&conn, "2024-02-29", "2", false, 1);
    tx(&conn, "2024-01-31", "4", false, 1);
    tx(&conn, "2024-03-01", "8", false, 1);
    let s = monthly_summary(&conn, Period::new(2024, 2).unwrap()).unwrap();
    assert_eq!(s.total_expenses, dec("3"));
    assert_eq!(s.transaction_count, 2);
}

#[test]
fn equal_amounts_keep_first_seen_order() {
    let conn = setup();
    // Newest first: Transport (03-20) is seen before Food (03-10).
    tx(&conn, "2024-03-10", "40", false, 1);
    tx(&conn, "2024-03-20", "40", false, 2);
    let first = monthly_summary(&conn, march()).unwrap();
    let names: Vec<&str> = first.categories.iter().map(|c| c.category_name.as_str()).collect();
    assert_eq!(names, ["Transport", "Food"]);
    let second = monthly_summary(&conn, march()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn income_is_not_broken_down() {
    let conn = setup();
    tx(&conn, "2024-03-10", "500", true, 2);
    let s = monthly_summary(&conn, march()).unwrap();
    assert_eq!(s.total_income, dec("500"));
    assert!(s.categories.is_empty());
}

#[test]
fn yearly_summary_with_only_january() {
    let conn = setup();
    tx(&conn, "2024-01-03", "500", true, 1);
    tx(&conn, "2024-01-15", "200", false, 1);
    let year = yearly_summary(&conn, 2024).unwrap();
    assert_eq!(year.len(), 12);
    assert_eq!(year[0].period, Period::new(2024, 1).unwrap());
    assert_eq!(year[11].period, Period::new(2024, 12).unwrap());
    let income: Decimal = year.iter().map(|s| s.total_income).sum();
    let expenses: Decimal = year.iter().map(|s| s.total_expenses).sum();
    assert_eq!(income, year[0].total_income);
    assert_eq!(expenses, year[0].total_expenses);
    assert_eq!(income - expenses, dec("300"));
    for s in &year[1..] {
        assert_eq!(s.transaction_count, 0);
        assert_eq!(s.balance(), Decimal::ZERO);
    }
}

#[test]
fn resolve_fills_every_active_category() {
    let conn = setup();
    conn.execute(
        "INSERT INTO categories(id, name, color, is_active) VALUES (3, 'Archive', '#000000', 0), (4, 'Bills', '#F39C12', 1)",
        [],
    )
    .unwrap();
    let budgets = resolve_monthly_budgets(&conn, march()).unwrap();
    let names: Vec<&str> = budgets.iter().map(|b| b.category_name.as_str()).collect();
    assert_eq!(names, ["Bills", "Food", "Transport"]);
    assert!(budgets.iter().all(|b| b.is_placeholder()));
    assert!(budgets.iter().all(|b| b.planned_amount.is_zero() && b.spent_amount.is_zero()));
    assert!(budgets.iter().all(|b| b.month == 3 && b.year == 2024));

    // Placeholders are not persisted.
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM monthly_budgets", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn resolve_merges_plans_with_spending() {
    let conn = setup();
    march_scenario(&conn);
    tx(&conn, "2024-03-20", "25", false, 1);
    tx(&conn, "2024-04-01", "999", false, 1);
    set_monthly_budget(&conn, 1, march(), dec("200")).unwrap();

    let budgets = resolve_monthly_budgets(&conn, march()).unwrap();
    assert_eq!(budgets.len(), 2);
    let food = &budgets[0];
    assert_eq!(food.category_name, "Food");
    assert!(!food.is_placeholder());
    assert_eq!(food.planned_amount, dec("200"));
    assert_eq!(food.spent_amount, dec("125"));
    assert_eq!(food.remaining_amount(), dec("75"));
    assert_eq!(food.percentage_used(), dec("62.5"));

    let transport = &budgets[1];
    assert!(transport.is_placeholder());
    assert_eq!(transport.spent_amount, dec("50"));
    assert_eq!(transport.percentage_used(), Decimal::ZERO);
}

#[test]
fn upsert_never_duplicates() {
    let conn = setup();
    let first = set_monthly_budget(&conn, 2, march(), dec("100")).unwrap();
    let second = set_monthly_budget(&conn, 2, march(), dec("150")).unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.planned_amount, dec("150"));
    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM monthly_budgets WHERE category_id=2 AND month=3 AND year=2024",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);

    // Another month is a different key.
    set_monthly_budget(&conn, 2, march().next(), dec("10")).unwrap();
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM monthly_budgets", [], |r| r.get(0))
        .unwrap();
    assert_eq!(total, 2);
}

#[test]
fn negative_plan_is_rejected() {
    let conn = setup();
    let err = set_monthly_budget(&conn, 1, march(), dec("-1")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BudgetError>(),
        Some(BudgetError::Validation(_))
    ));
}

#[test]
fn plan_outside_amount_bounds_is_rejected() {
    let conn = setup();
    tx(&conn, "2024-03-05", "100", false, 1);
    for bad in [Decimal::new(1, 28), dec("0.005"), dec("10000000000000000"), Decimal::MAX] {
        let err = set_monthly_budget(&conn, 1, march(), bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BudgetError>(),
            Some(BudgetError::Validation(_))
        ));
    }
    assert!(conn.list_monthly_budgets(3, 2024).unwrap().is_empty());

    let b = set_monthly_budget(&conn, 1, march(), dec("0.01")).unwrap();
    assert_eq!(b.spent_amount, dec("100"));
    assert_eq!(b.percentage_used(), dec("1000000"));
}

#[test]
fn budget_for_missing_category_fails() {
    let conn = setup();
    assert!(set_monthly_budget(&conn, 42, march(), dec("10")).is_err());
}

#[test]
fn category_totals_count_expenses_only() {
    let conn = setup();
    march_scenario(&conn);
    tx(&conn, "2024-04-02", "30", false, 2);
    let totals = category_totals(&conn, d("2024-03-01"), d("2024-04-30")).unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals["Food"], dec("100"));
    assert_eq!(totals["Transport"], dec("80"));

    let none = category_totals(&conn, d("2023-01-01"), d("2023-12-31")).unwrap();
    assert!(none.is_empty());
}

#[test]
fn range_statistics_summarize_period() {
    let conn = setup();
    march_scenario(&conn);
    tx(&conn, "2024-03-11", "20", false, 2);
    let s = range_statistics(&conn, d("2024-03-01"), d("2024-03-31")).unwrap();
    assert_eq!(s.transaction_count, 4);
    assert_eq!(s.total_income, dec("1000"));
    assert_eq!(s.total_expenses, dec("170"));
    assert_eq!(s.balance, dec("830"));
    assert_eq!(s.average_daily_expense, dec("170") / dec("30"));
    assert_eq!(s.largest_expense, dec("100"));
    assert_eq!(s.largest_income, dec("1000"));
    assert_eq!(s.most_frequent_category.as_deref(), Some("Transport"));

    let empty = range_statistics(&conn, d("2020-01-01"), d("2020-01-01")).unwrap();
    assert_eq!(empty.transaction_count, 0);
    assert_eq!(empty.largest_expense, Decimal::ZERO);
    assert_eq!(empty.most_frequent_category, None);
}

#[test]
fn deactivated_category_still_named_in_history() {
    let conn = setup();
    tx(&conn, "2024-03-05", "70", false, 2);
    assert_eq!(
        repo::delete_category(&conn, 2).unwrap(),
        repo::CategoryRemoval::Deactivated
    );
    let s = monthly_summary(&conn, march()).unwrap();
    assert_eq!(s.categories[0].category_name, "Transport");
    assert_eq!(s.categories[0].color, "#3498DB");
    // But it drops out of the budget grid.
    let budgets = resolve_monthly_budgets(&conn, march()).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].category_name, "Food");
}
