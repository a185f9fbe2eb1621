use rust_decimal::Decimal;

use crate::models::{Category, TransactionType};

/// Rejected input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("{kind} transactions cannot use the {category} category")]
    CategoryMismatch {
        kind: TransactionType,
        category: Category,
    },
    #[error("budget limit must not be negative (got {0})")]
    NegativeLimit(Decimal),
    #[error("the Income category cannot have a budget")]
    IncomeBudget,
}
