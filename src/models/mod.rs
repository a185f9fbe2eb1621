mod budget;
mod category;
mod month;
mod transaction;

pub use budget::Budget;
pub use category::{Category, CategoryFilter};
pub use month::Month;
pub use transaction::{Transaction, TransactionDraft, TransactionType};
