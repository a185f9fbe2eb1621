use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Month, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Totals {
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
}

impl Totals {
    pub(crate) fn balance(&self) -> Decimal {
        self.income - self.expenses
    }

    /// Totals saturate at `Decimal::MAX` rather than overflow.
    fn record(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionType::Income => self.income = self.income.saturating_add(txn.amount),
            TransactionType::Expense => self.expenses = self.expenses.saturating_add(txn.amount),
        }
    }
}

pub(crate) fn totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    let mut totals = Totals::default();
    for txn in transactions {
        totals.record(txn);
    }
    totals
}

pub(crate) fn totals_for_month(transactions: &[Transaction], month: Month) -> Totals {
    totals(transactions.iter().filter(|t| t.in_month(month)))
}

/// `(current - previous) / previous * 100`, or zero when `previous` is not
/// positive. Results too large to represent saturate.
pub(crate) fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let delta = current.saturating_sub(previous);
    let ratio = delta.checked_div(previous).unwrap_or(if delta.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    });
    ratio.saturating_mul(Decimal::ONE_HUNDRED)
}

/// All-time totals plus the as-of month compared with the month before it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) month: Month,
    pub(crate) all_time: Totals,
    pub(crate) this_month: Totals,
    pub(crate) last_month: Totals,
}

impl Summary {
    pub(crate) fn compute(transactions: &[Transaction], as_of: NaiveDate) -> Self {
        let month = Month::of(as_of);
        Self {
            month,
            all_time: totals(transactions),
            this_month: totals_for_month(transactions, month),
            last_month: totals_for_month(transactions, month.previous()),
        }
    }

    pub(crate) fn income_change(&self) -> Decimal {
        percent_change(self.this_month.income, self.last_month.income)
    }

    pub(crate) fn expense_change(&self) -> Decimal {
        percent_change(self.this_month.expenses, self.last_month.expenses)
    }

    /// Difference between this month's net and last month's.
    pub(crate) fn net_change(&self) -> Decimal {
        self.this_month.balance().saturating_sub(self.last_month.balance())
    }

    pub(crate) fn net_change_percent(&self) -> Decimal {
        percent_change(self.this_month.balance(), self.last_month.balance())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrendPoint {
    pub(crate) month: Month,
    pub(crate) totals: Totals,
}

/// Income and expenses for the `months` months ending with the as-of month,
/// oldest first.
pub(crate) fn monthly_trend(
    transactions: &[Transaction],
    as_of: NaiveDate,
    months: u32,
) -> Vec<TrendPoint> {
    let current = Month::of(as_of);
    (0..months)
        .rev()
        .map(|n| {
            let month = current.back(n);
            TrendPoint {
                month,
                totals: totals_for_month(transactions, month),
            }
        })
        .collect()
}
