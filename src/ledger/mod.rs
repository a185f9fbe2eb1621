mod export;
mod sample;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::analytics::{self, BudgetLine, Summary};
use crate::db::Database;
use crate::error::ValidationError;
use crate::models::{Budget, Category, Month, Transaction, TransactionDraft};
use crate::store::TransactionStore;

pub(crate) use export::{export_file_name, read_export, write_export, ExportDocument};

pub(crate) const TRANSACTIONS_KEY: &str = "transactions";
pub(crate) const BUDGETS_KEY: &str = "budgets";

/// The transactions and budgets of one session, plus the derived views.
pub(crate) struct Ledger {
    store: TransactionStore,
    budgets: Vec<Budget>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            store: TransactionStore::new(),
            budgets: Budget::defaults(),
        }
    }
}

impl Ledger {
    /// Load both documents, falling back to defaults for anything missing or
    /// unreadable.
    pub(crate) fn load(db: &Database) -> Self {
        let mut ledger = Self::default();
        if let Some(txns) = load_document::<Vec<Transaction>>(db, TRANSACTIONS_KEY) {
            let txns = keep_valid(txns, TRANSACTIONS_KEY, Transaction::validate);
            ledger.store = TransactionStore::from_transactions(txns);
        }
        if let Some(budgets) = load_document::<Vec<Budget>>(db, BUDGETS_KEY) {
            ledger.budgets = keep_valid(budgets, BUDGETS_KEY, Budget::validate);
        }
        tracing::debug!(
            transactions = ledger.store.len(),
            budgets = ledger.budgets.len(),
            "Loaded ledger"
        );
        ledger
    }

    /// Persist both documents. Budget `spent` is refreshed for `as_of` first.
    pub(crate) fn save(&mut self, db: &mut Database, as_of: NaiveDate) -> Result<()> {
        analytics::recompute_spent(&mut self.budgets, self.store.all(), Month::of(as_of));
        let transactions = serde_json::to_string(self.store.all())
            .context("Failed to serialize transactions")?;
        let budgets =
            serde_json::to_string(&self.budgets).context("Failed to serialize budgets")?;
        db.set_items(&[(TRANSACTIONS_KEY, transactions), (BUDGETS_KEY, budgets)])
            .context("Failed to save ledger")?;
        tracing::info!(transactions = self.store.len(), "Saved ledger");
        Ok(())
    }

    pub(crate) fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub(crate) fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.store.get(id)
    }

    /// Returns the id of the new transaction.
    pub(crate) fn add_transaction(&mut self, draft: TransactionDraft) -> Result<String, ValidationError> {
        Ok(self.store.add(draft)?.id.clone())
    }

    /// `Ok(false)` when no transaction has `id`; nothing changes in that case.
    pub(crate) fn update_transaction(
        &mut self,
        id: &str,
        draft: TransactionDraft,
    ) -> Result<bool, ValidationError> {
        self.store.update(id, draft)
    }

    pub(crate) fn delete_transaction(&mut self, id: &str) -> bool {
        self.store.remove(id)
    }

    /// Configured budgets with `spent` computed for the month of `as_of`.
    pub(crate) fn budgets(&self, as_of: NaiveDate) -> Vec<Budget> {
        let mut budgets = self.budgets.clone();
        analytics::recompute_spent(&mut budgets, self.store.all(), Month::of(as_of));
        budgets
    }

    pub(crate) fn budget_report(&self, as_of: NaiveDate) -> Vec<BudgetLine> {
        analytics::budget_report(&self.budgets, self.store.all(), Month::of(as_of))
    }

    /// Change the monthly limit of an existing budget. `Ok(false)` when no
    /// budget tracks `category`.
    pub(crate) fn set_budget_limit(
        &mut self,
        category: Category,
        amount: Decimal,
    ) -> Result<bool, ValidationError> {
        Budget::new(category, amount).validate()?;
        match self.budgets.iter_mut().find(|b| b.category == category) {
            Some(budget) => {
                budget.amount = amount;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn summary(&self, as_of: NaiveDate) -> Summary {
        Summary::compute(self.store.all(), as_of)
    }

    pub(crate) fn export(&self, exported_at: DateTime<Utc>, as_of: NaiveDate) -> ExportDocument {
        ExportDocument::new(
            exported_at,
            self.store.all().to_vec(),
            self.budgets(as_of),
            self.summary(as_of).all_time,
        )
    }

    /// Replace both collections with the contents of `doc`. Every record is
    /// checked first; a single invalid one leaves the ledger untouched.
    pub(crate) fn import(&mut self, doc: ExportDocument) -> Result<(), ValidationError> {
        doc.transactions.iter().try_for_each(Transaction::validate)?;
        doc.budgets.iter().try_for_each(Budget::validate)?;
        tracing::info!(
            transactions = doc.transactions.len(),
            budgets = doc.budgets.len(),
            "Importing ledger"
        );
        self.store = TransactionStore::from_transactions(doc.transactions);
        self.budgets = doc.budgets;
        Ok(())
    }

    /// Fill an empty ledger with a handful of demo transactions dated
    /// relative to `today`. Returns `false` if there was already data.
    pub(crate) fn seed_sample_data(&mut self, today: NaiveDate) -> Result<bool, ValidationError> {
        if !self.store.is_empty() {
            return Ok(false);
        }
        for draft in sample::sample_transactions(today) {
            self.store.add(draft)?;
        }
        Ok(true)
    }
}

fn load_document<T: DeserializeOwned>(db: &Database, key: &str) -> Option<T> {
    let raw = match db.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %format!("{e:#}"), "Storage unavailable, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored document is unreadable, using defaults");
            None
        }
    }
}

/// Drop records that break the ledger's invariants, logging each one.
fn keep_valid<T>(
    records: Vec<T>,
    key: &str,
    validate: impl Fn(&T) -> Result<(), ValidationError>,
) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| match validate(record) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping invalid stored record");
                false
            }
        })
        .collect()
}
