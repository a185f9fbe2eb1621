use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::Totals;
use crate::models::{Budget, Transaction};

/// A full snapshot of the ledger as written by `export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportDocument {
    pub(crate) exported_at: DateTime<Utc>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) budgets: Vec<Budget>,
    pub(crate) summary: ExportSummary,
}

/// Informational only; ignored on import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportSummary {
    pub(crate) total_income: Decimal,
    pub(crate) total_expenses: Decimal,
    pub(crate) current_balance: Decimal,
}

impl ExportDocument {
    pub(crate) fn new(
        exported_at: DateTime<Utc>,
        transactions: Vec<Transaction>,
        budgets: Vec<Budget>,
        totals: Totals,
    ) -> Self {
        Self {
            exported_at,
            transactions,
            budgets,
            summary: ExportSummary {
                total_income: totals.income,
                total_expenses: totals.expenses,
                current_balance: totals.balance(),
            },
        }
    }
}

pub(crate) fn export_file_name(date: NaiveDate) -> String {
    format!("expense_tracker_export_{}.json", date.format("%Y-%m-%d"))
}

pub(crate) fn write_export(doc: &ExportDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(doc).context("Failed to serialize export")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;
    Ok(())
}

pub(crate) fn read_export(path: &Path) -> Result<ExportDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid ledger export", path.display()))
}
