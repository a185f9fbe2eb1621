use chrono::Utc;

use crate::error::ValidationError;
use crate::models::{CategoryFilter, Transaction, TransactionDraft};

/// Ordered, in-memory collection of transactions.
///
/// Records keep their insertion order; edits replace a record in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub(crate) fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn len(&self) -> usize {
        self.transactions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Validate and append. Supplied ids are taken as-is.
    pub(crate) fn add(&mut self, draft: TransactionDraft) -> Result<&Transaction, ValidationError> {
        draft.validate()?;
        let txn = draft.into_transaction(Utc::now());
        tracing::debug!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "Adding transaction");
        self.transactions.push(txn);
        let index = self.transactions.len() - 1;
        Ok(&self.transactions[index])
    }

    /// Replace the record with `id`, keeping its id and creation time.
    ///
    /// Returns `Ok(false)` without touching anything when `id` is unknown.
    pub(crate) fn update(
        &mut self,
        id: &str,
        draft: TransactionDraft,
    ) -> Result<bool, ValidationError> {
        draft.validate()?;
        let Some(existing) = self.transactions.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(id, "Update ignored: no such transaction");
            return Ok(false);
        };
        existing.kind = draft.kind;
        existing.amount = draft.amount;
        existing.description = draft.description;
        existing.category = draft.category;
        existing.date = draft.date;
        existing.notes = draft.notes;
        tracing::debug!(id, "Updated transaction");
        Ok(true)
    }

    /// Returns `false` when `id` is unknown.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() < before;
        if removed {
            tracing::debug!(id, "Removed transaction");
        } else {
            tracing::debug!(id, "Remove ignored: no such transaction");
        }
        removed
    }

    /// Transactions whose description or notes contain `search`
    /// (case-insensitive) and whose category passes `filter`.
    ///
    /// Newest date first; on equal dates the most recently inserted wins.
    pub(crate) fn query(&self, search: &str, filter: CategoryFilter) -> Vec<&Transaction> {
        let needle = search.to_lowercase();
        let mut matches: Vec<(usize, &Transaction)> = self
            .transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t.category) && t.mentions(&needle))
            .collect();
        matches.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));
        matches.into_iter().map(|(_, t)| t).collect()
    }
}

/// Slice out 1-indexed `page` of `page_size` items. Page 0 and pages past
/// the end are empty.
pub(crate) fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub(crate) fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}
