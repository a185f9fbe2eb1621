use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;
use crate::error::ValidationError;

/// A monthly spending limit for one expense category.
///
/// `spent` is written out alongside the limit so stored documents stay
/// readable, but it is never trusted on load: it is recomputed from the
/// transactions for whichever month is being reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub spent: Decimal,
}

impl Budget {
    pub fn new(category: Category, amount: Decimal) -> Self {
        Self {
            category,
            name: category.label().to_string(),
            amount,
            spent: Decimal::ZERO,
        }
    }

    pub fn defaults() -> Vec<Budget> {
        [
            (Category::Food, 400),
            (Category::Transport, 200),
            (Category::Shopping, 300),
            (Category::Housing, 1000),
            (Category::Entertainment, 150),
            (Category::Health, 100),
        ]
        .into_iter()
        .map(|(category, limit)| Self::new(category, Decimal::from(limit)))
        .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.category == Category::Income {
            return Err(ValidationError::IncomeBudget);
        }
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeLimit(self.amount));
        }
        Ok(())
    }
}
