use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Month};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The category a new transaction of this type falls back to.
    pub fn default_category(&self) -> Category {
        match self {
            Self::Income => Category::Income,
            Self::Expense => Category::Other,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Written as an exact decimal string; plain JSON numbers are accepted
    /// on read.
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with the sign of its effect on the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn in_month(&self, month: Month) -> bool {
        month.contains(self.date)
    }

    /// `needle` must already be lowercased.
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.description.to_lowercase().contains(needle)
            || self.notes.to_lowercase().contains(needle)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_fields(self.kind, self.amount, &self.description, self.category)
    }
}

/// User-supplied fields for a new or edited transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub id: Option<String>,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            kind,
            amount,
            description: description.into(),
            category,
            date,
            notes: String::new(),
            created_at: None,
        }
    }

    pub fn income(amount: Decimal, description: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(
            TransactionType::Income,
            amount,
            description,
            Category::Income,
            date,
        )
    }

    pub fn expense(
        amount: Decimal,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self::new(TransactionType::Expense, amount, description, category, date)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(self.kind, self.amount, &self.description, self.category)
    }

    /// Build the stored record, assigning an id and creation time if missing.
    pub(crate) fn into_transaction(self, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            category: self.category,
            date: self.date,
            notes: self.notes,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: Some(txn.id.clone()),
            kind: txn.kind,
            amount: txn.amount,
            description: txn.description.clone(),
            category: txn.category,
            date: txn.date,
            notes: txn.notes.clone(),
            created_at: Some(txn.created_at),
        }
    }
}

fn check_fields(
    kind: TransactionType,
    amount: Decimal,
    description: &str,
    category: Category,
) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if !category.allows(kind) {
        return Err(ValidationError::CategoryMismatch { kind, category });
    }
    Ok(())
}
