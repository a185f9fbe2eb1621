use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{Budget, Category, Month, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    /// Above 100% is over budget, above 80% is near the limit.
    pub(crate) fn from_ratio(ratio: Decimal) -> Self {
        if ratio > Decimal::ONE {
            Self::OverBudget
        } else if ratio > Decimal::new(8, 1) {
            Self::NearLimit
        } else {
            Self::OnTrack
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On track",
            Self::NearLimit => "Almost there",
            Self::OverBudget => "Over budget!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetLine {
    pub(crate) category: Category,
    pub(crate) name: String,
    pub(crate) limit: Decimal,
    pub(crate) spent: Decimal,
    pub(crate) ratio: Decimal,
    pub(crate) status: BudgetStatus,
}

impl BudgetLine {
    pub(crate) fn usage_percent(&self) -> Decimal {
        self.ratio.saturating_mul(Decimal::ONE_HUNDRED)
    }

    pub(crate) fn remaining(&self) -> Decimal {
        self.limit - self.spent
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BudgetUsage {
    pub(crate) total_limit: Decimal,
    pub(crate) total_spent: Decimal,
    pub(crate) percent: Decimal,
}

/// `spent / limit`, zero for a zero limit. A quotient too large to represent
/// is clamped to `Decimal::MAX`.
pub(crate) fn usage_ratio(spent: Decimal, limit: Decimal) -> Decimal {
    if limit.is_zero() {
        Decimal::ZERO
    } else {
        spent.checked_div(limit).unwrap_or(Decimal::MAX)
    }
}

/// Expense totals per category for `month`.
pub(crate) fn spent_by_category(
    transactions: &[Transaction],
    month: Month,
) -> BTreeMap<Category, Decimal> {
    let mut totals = BTreeMap::new();
    for txn in transactions
        .iter()
        .filter(|t| t.is_expense() && t.in_month(month))
    {
        let spent = totals.entry(txn.category).or_insert(Decimal::ZERO);
        *spent = spent.saturating_add(txn.amount);
    }
    totals
}

/// Overwrite every budget's `spent` with the total for `month`.
pub(crate) fn recompute_spent(budgets: &mut [Budget], transactions: &[Transaction], month: Month) {
    let totals = spent_by_category(transactions, month);
    for budget in budgets.iter_mut() {
        budget.spent = totals
            .get(&budget.category)
            .copied()
            .unwrap_or(Decimal::ZERO);
    }
}

pub(crate) fn budget_report(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: Month,
) -> Vec<BudgetLine> {
    let totals = spent_by_category(transactions, month);
    budgets
        .iter()
        .map(|b| {
            let spent = totals.get(&b.category).copied().unwrap_or(Decimal::ZERO);
            let ratio = usage_ratio(spent, b.amount);
            BudgetLine {
                category: b.category,
                name: b.name.clone(),
                limit: b.amount,
                spent,
                ratio,
                status: BudgetStatus::from_ratio(ratio),
            }
        })
        .collect()
}

pub(crate) fn overall_usage(lines: &[BudgetLine]) -> BudgetUsage {
    let total_limit = lines
        .iter()
        .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.limit));
    let total_spent = lines
        .iter()
        .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.spent));
    BudgetUsage {
        total_limit,
        total_spent,
        percent: usage_ratio(total_spent, total_limit).saturating_mul(Decimal::ONE_HUNDRED),
    }
}

/// Expense totals for `month`, largest first. Categories without a budget
/// (such as Other) are included.
pub(crate) fn category_breakdown(transactions: &[Transaction], month: Month) -> Vec<(Category, Decimal)> {
    let mut rows: Vec<(Category, Decimal)> = spent_by_category(transactions, month).into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    rows
}
