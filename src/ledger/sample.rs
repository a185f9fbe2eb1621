use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Category, TransactionDraft};

pub(super) fn sample_transactions(today: NaiveDate) -> Vec<TransactionDraft> {
    let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
    vec![
        TransactionDraft::income(Decimal::from(3500), "Monthly Salary", today)
            .with_notes("Regular monthly salary"),
        TransactionDraft::expense(
            Decimal::new(12550, 2),
            "Grocery Shopping",
            Category::Food,
            days_ago(2),
        )
        .with_notes("Weekly groceries"),
        TransactionDraft::expense(
            Decimal::new(6530, 2),
            "Gas Station",
            Category::Transport,
            days_ago(5),
        )
        .with_notes("Car fuel"),
        TransactionDraft::expense(
            Decimal::new(8999, 2),
            "Online Shopping",
            Category::Shopping,
            days_ago(7),
        )
        .with_notes("New headphones"),
        TransactionDraft::expense(
            Decimal::from(1200),
            "Monthly Rent",
            Category::Housing,
            days_ago(10),
        )
        .with_notes("Apartment rent"),
    ]
}
