//! Values derived from the transaction list. Nothing here is stored; every
//! figure is recomputed from the transactions for an explicit as-of date.

mod budget;
mod summary;

pub(crate) use budget::{
    budget_report, category_breakdown, overall_usage, recompute_spent, BudgetLine, BudgetStatus,
};
pub(crate) use summary::{monthly_trend, percent_change, Summary, Totals};

#[cfg(test)]
mod tests;
