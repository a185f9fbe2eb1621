#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::budget::{spent_by_category, usage_ratio};
use super::summary::{totals, totals_for_month};
use super::*;
use crate::models::{Budget, Category, Month, Transaction, TransactionDraft};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(amount: Decimal, category: Category, on: NaiveDate) -> Transaction {
    TransactionDraft::expense(amount, "Test expense", category, on).into_transaction(Utc::now())
}

fn income(amount: Decimal, on: NaiveDate) -> Transaction {
    TransactionDraft::income(amount, "Test income", on).into_transaction(Utc::now())
}

fn line_for(lines: &[BudgetLine], category: Category) -> &BudgetLine {
    lines.iter().find(|l| l.category == category).unwrap()
}

// ── percent_change ────────────────────────────────────────────

#[test]
fn test_percent_change_zero_previous_is_zero() {
    assert_eq!(percent_change(dec!(500), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percent_change(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percent_change(dec!(-20), Decimal::ZERO), Decimal::ZERO);
}

#[test]
fn test_percent_change_negative_previous_is_zero() {
    assert_eq!(percent_change(dec!(100), dec!(-50)), Decimal::ZERO);
}

#[test]
fn test_percent_change() {
    assert_eq!(percent_change(dec!(150), dec!(100)), dec!(50));
    assert_eq!(percent_change(dec!(50), dec!(200)), dec!(-75));
    assert_eq!(percent_change(dec!(100), dec!(100)), Decimal::ZERO);
}

// ── Totals / Summary ──────────────────────────────────────────

#[test]
fn test_scenario_salary_and_groceries() {
    let today = date(2024, 6, 12);
    let txns = vec![
        income(dec!(3500), today),
        expense(dec!(125.50), Category::Food, today),
    ];

    let summary = Summary::compute(&txns, today);
    assert_eq!(summary.all_time.income, dec!(3500.00));
    assert_eq!(summary.all_time.expenses, dec!(125.50));
    assert_eq!(summary.all_time.balance(), dec!(3374.50));

    let lines = budget_report(&Budget::defaults(), &txns, Month::of(today));
    assert_eq!(line_for(&lines, Category::Food).spent, dec!(125.50));
    assert_eq!(line_for(&lines, Category::Housing).spent, Decimal::ZERO);
}

#[test]
fn test_all_time_totals_ignore_month() {
    let txns = vec![
        income(dec!(1000), date(2023, 1, 1)),
        income(dec!(2000), date(2024, 5, 1)),
        expense(dec!(300), Category::Housing, date(2022, 12, 31)),
    ];
    let t = totals(&txns);
    assert_eq!(t.income, dec!(3000));
    assert_eq!(t.expenses, dec!(300));
    assert_eq!(t.balance(), dec!(2700));
}

#[test]
fn test_monthly_totals_respect_year() {
    let txns = vec![
        income(dec!(1000), date(2024, 3, 5)),
        income(dec!(999), date(2023, 3, 5)),
        expense(dec!(40), Category::Food, date(2024, 3, 31)),
        expense(dec!(60), Category::Food, date(2024, 4, 1)),
    ];
    let march = totals_for_month(&txns, Month::parse("2024-03").unwrap());
    assert_eq!(march.income, dec!(1000));
    assert_eq!(march.expenses, dec!(40));
}

#[test]
fn test_summary_month_over_month() {
    let as_of = date(2024, 5, 20);
    let txns = vec![
        income(dec!(3000), date(2024, 4, 1)),
        expense(dec!(1000), Category::Housing, date(2024, 4, 2)),
        income(dec!(3300), date(2024, 5, 1)),
        expense(dec!(1500), Category::Housing, date(2024, 5, 2)),
    ];
    let summary = Summary::compute(&txns, as_of);
    assert_eq!(summary.month, Month::of(as_of));
    assert_eq!(summary.this_month.income, dec!(3300));
    assert_eq!(summary.last_month.income, dec!(3000));
    assert_eq!(summary.income_change(), dec!(10));
    assert_eq!(summary.expense_change(), dec!(50));
    // nets: 1800 this month vs 2000 last month
    assert_eq!(summary.net_change(), dec!(-200));
    assert_eq!(summary.net_change_percent(), dec!(-10));
}

#[test]
fn test_summary_previous_month_crosses_year() {
    let as_of = date(2024, 1, 10);
    let txns = vec![
        income(dec!(200), date(2023, 12, 15)),
        income(dec!(999), date(2024, 12, 15)),
        income(dec!(300), date(2024, 1, 2)),
    ];
    let summary = Summary::compute(&txns, as_of);
    assert_eq!(summary.last_month.income, dec!(200));
    assert_eq!(summary.income_change(), dec!(50));
}

#[test]
fn test_summary_no_previous_month_reports_zero_change() {
    let as_of = date(2024, 5, 20);
    let txns = vec![income(dec!(3500), as_of)];
    let summary = Summary::compute(&txns, as_of);
    assert_eq!(summary.income_change(), Decimal::ZERO);
    assert_eq!(summary.expense_change(), Decimal::ZERO);
    assert_eq!(summary.net_change_percent(), Decimal::ZERO);
    assert_eq!(summary.net_change(), dec!(3500));
}

#[test]
fn test_monthly_trend() {
    let as_of = date(2024, 2, 14);
    let txns = vec![
        income(dec!(100), date(2023, 9, 1)),
        income(dec!(200), date(2023, 12, 1)),
        expense(dec!(50), Category::Food, date(2024, 2, 1)),
        // outside the window
        income(dec!(999), date(2023, 8, 31)),
    ];
    let trend = monthly_trend(&txns, as_of, 6);
    assert_eq!(trend.len(), 6);
    let months: Vec<String> = trend.iter().map(|p| p.month.to_string()).collect();
    assert_eq!(
        months,
        vec!["2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
    );
    assert_eq!(trend[0].totals.income, dec!(100));
    assert_eq!(trend[3].totals.income, dec!(200));
    assert_eq!(trend[5].totals.expenses, dec!(50));
    assert_eq!(trend[1].totals, Totals::default());
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_scenario_last_month_rent_excluded() {
    let rent = expense(dec!(1200), Category::Housing, date(2024, 4, 1));
    let as_of = date(2024, 5, 15);
    let lines = budget_report(&Budget::defaults(), &[rent], Month::of(as_of));
    assert_eq!(line_for(&lines, Category::Housing).spent, Decimal::ZERO);
}

#[test]
fn test_spent_only_counts_expenses_in_month() {
    let month = Month::parse("2024-05").unwrap();
    let txns = vec![
        expense(dec!(10), Category::Food, date(2024, 5, 1)),
        expense(dec!(15.25), Category::Food, date(2024, 5, 31)),
        expense(dec!(99), Category::Food, date(2024, 6, 1)),
        expense(dec!(99), Category::Food, date(2023, 5, 10)),
        expense(dec!(7), Category::Health, date(2024, 5, 3)),
        income(dec!(500), date(2024, 5, 3)),
    ];
    let spent = spent_by_category(&txns, month);
    assert_eq!(spent.get(&Category::Food), Some(&dec!(25.25)));
    assert_eq!(spent.get(&Category::Health), Some(&dec!(7)));
    assert_eq!(spent.get(&Category::Income), None);
}

#[test]
fn test_changes_outside_window_do_not_affect_spent() {
    let month = Month::parse("2024-05").unwrap();
    let mut txns = vec![
        expense(dec!(80), Category::Transport, date(2024, 5, 9)),
        expense(dec!(40), Category::Transport, date(2024, 4, 9)),
    ];
    let before = budget_report(&Budget::defaults(), &txns, month);
    txns[1].amount = dec!(4000);
    txns.push(expense(dec!(12), Category::Transport, date(2024, 6, 1)));
    let after = budget_report(&Budget::defaults(), &txns, month);
    assert_eq!(before, after);
    assert_eq!(line_for(&after, Category::Transport).spent, dec!(80));
}

#[test]
fn test_recompute_spent_overwrites_stale_values() {
    let month = Month::parse("2024-05").unwrap();
    let mut budgets = Budget::defaults();
    for b in budgets.iter_mut() {
        b.spent = dec!(12345);
    }
    let txns = vec![expense(dec!(30), Category::Shopping, date(2024, 5, 2))];
    recompute_spent(&mut budgets, &txns, month);
    for b in &budgets {
        if b.category == Category::Shopping {
            assert_eq!(b.spent, dec!(30));
        } else {
            assert_eq!(b.spent, Decimal::ZERO);
        }
    }
}

#[test]
fn test_budget_status_thresholds() {
    assert_eq!(BudgetStatus::from_ratio(dec!(0)), BudgetStatus::OnTrack);
    assert_eq!(BudgetStatus::from_ratio(dec!(0.8)), BudgetStatus::OnTrack);
    assert_eq!(BudgetStatus::from_ratio(dec!(0.81)), BudgetStatus::NearLimit);
    assert_eq!(BudgetStatus::from_ratio(dec!(1)), BudgetStatus::NearLimit);
    assert_eq!(BudgetStatus::from_ratio(dec!(1.01)), BudgetStatus::OverBudget);
}

#[test]
fn test_zero_limit_budget_is_on_track() {
    assert_eq!(usage_ratio(dec!(50), Decimal::ZERO), Decimal::ZERO);
    let month = Month::parse("2024-05").unwrap();
    let budgets = vec![Budget::new(Category::Health, Decimal::ZERO)];
    let txns = vec![expense(dec!(50), Category::Health, date(2024, 5, 5))];
    let lines = budget_report(&budgets, &txns, month);
    assert_eq!(lines[0].spent, dec!(50));
    assert_eq!(lines[0].ratio, Decimal::ZERO);
    assert_eq!(lines[0].status, BudgetStatus::OnTrack);
}

#[test]
fn test_budget_line_usage() {
    let month = Month::parse("2024-05").unwrap();
    let txns = vec![expense(dec!(450), Category::Food, date(2024, 5, 5))];
    let lines = budget_report(&Budget::defaults(), &txns, month);
    let food = line_for(&lines, Category::Food);
    assert_eq!(food.usage_percent(), dec!(112.5));
    assert_eq!(food.remaining(), dec!(-50));
    assert_eq!(food.status, BudgetStatus::OverBudget);
}

#[test]
fn test_overall_usage() {
    let month = Month::parse("2024-05").unwrap();
    let txns = vec![
        expense(dec!(215), Category::Food, date(2024, 5, 5)),
        expense(dec!(300), Category::Other, date(2024, 5, 5)),
    ];
    let lines = budget_report(&Budget::defaults(), &txns, month);
    let usage = overall_usage(&lines);
    assert_eq!(usage.total_limit, dec!(2150));
    assert_eq!(usage.total_spent, dec!(215));
    assert_eq!(usage.percent, dec!(10));
}

#[test]
fn test_overall_usage_empty() {
    let usage = overall_usage(&[]);
    assert_eq!(usage.percent, Decimal::ZERO);
}

#[test]
fn test_category_breakdown_includes_unbudgeted() {
    let month = Month::parse("2024-05").unwrap();
    let txns = vec![
        expense(dec!(20), Category::Food, date(2024, 5, 1)),
        expense(dec!(75), Category::Other, date(2024, 5, 2)),
        expense(dec!(5), Category::Food, date(2024, 5, 3)),
        expense(dec!(1), Category::Health, date(2024, 4, 3)),
    ];
    let breakdown = category_breakdown(&txns, month);
    assert_eq!(
        breakdown,
        vec![(Category::Other, dec!(75)), (Category::Food, dec!(25))]
    );
}

// ── Very large amounts ────────────────────────────────────────

#[test]
fn test_summary_totals_saturate_instead_of_overflowing() {
    let today = date(2024, 6, 12);
    let half = Decimal::MAX / dec!(2) + Decimal::ONE;
    let txns = vec![income(half, today), income(half, today)];

    let summary = Summary::compute(&txns, today);
    assert_eq!(summary.all_time.income, Decimal::MAX);
    assert_eq!(summary.this_month.income, Decimal::MAX);
    assert_eq!(summary.all_time.balance(), Decimal::MAX);
    assert_eq!(summary.income_change(), Decimal::ZERO);
    assert_eq!(summary.net_change(), Decimal::MAX);
}

#[test]
fn test_net_change_saturates_at_min() {
    let today = date(2024, 6, 12);
    let txns = vec![
        expense(Decimal::MAX, Category::Other, today),
        income(Decimal::MAX, date(2024, 5, 10)),
    ];
    let summary = Summary::compute(&txns, today);
    assert_eq!(summary.net_change(), Decimal::MIN);
}

#[test]
fn test_percent_change_saturates() {
    assert_eq!(percent_change(Decimal::MAX, dec!(0.01)), Decimal::MAX);
    assert_eq!(percent_change(dec!(0.01), dec!(0.01)), Decimal::ZERO);
}

#[test]
fn test_usage_ratio_clamps_unrepresentable_quotient() {
    assert_eq!(usage_ratio(Decimal::MAX, dec!(0.01)), Decimal::MAX);
}

#[test]
fn test_budget_report_with_huge_spending() {
    let month = Month::parse("2024-05").unwrap();
    let txns = vec![
        expense(Decimal::MAX, Category::Food, date(2024, 5, 1)),
        expense(Decimal::MAX, Category::Food, date(2024, 5, 2)),
        expense(Decimal::MAX, Category::Health, date(2024, 5, 3)),
    ];
    let budgets = vec![
        Budget::new(Category::Food, dec!(0.01)),
        Budget::new(Category::Health, dec!(100)),
    ];
    let lines = budget_report(&budgets, &txns, month);

    let food = line_for(&lines, Category::Food);
    assert_eq!(food.spent, Decimal::MAX);
    assert_eq!(food.ratio, Decimal::MAX);
    assert_eq!(food.usage_percent(), Decimal::MAX);
    assert_eq!(food.status, BudgetStatus::OverBudget);

    let usage = overall_usage(&lines);
    assert_eq!(usage.total_spent, Decimal::MAX);
    assert!(usage.percent > Decimal::ONE_HUNDRED);
}
