use serde::{Deserialize, Serialize};

use super::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Housing,
    Entertainment,
    Health,
    Income,
    Other,
}

impl Category {
    /// Storage key, as written in the JSON documents.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Housing => "housing",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Income => "income",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transport => "Transportation",
            Self::Shopping => "Shopping",
            Self::Housing => "Housing",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }

    /// Parse a category from its key or its label (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.key() == lower || c.label().to_lowercase() == lower)
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Shopping,
            Self::Housing,
            Self::Entertainment,
            Self::Health,
            Self::Income,
            Self::Other,
        ]
    }

    /// Categories an expense may be filed under.
    pub fn expense_categories() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Shopping,
            Self::Housing,
            Self::Entertainment,
            Self::Health,
            Self::Other,
        ]
    }

    pub fn for_type(kind: TransactionType) -> &'static [Category] {
        match kind {
            TransactionType::Income => &[Self::Income],
            TransactionType::Expense => Self::expense_categories(),
        }
    }

    pub fn allows(&self, kind: TransactionType) -> bool {
        Self::for_type(kind).contains(self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Category restriction applied when listing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Some(Self::All)
        } else {
            Category::parse(s).map(Self::Only)
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }
}
