use serde::{Deserialize, Serialize};
use tally_core::TransactionKind;

use crate::datatable::CanonicalField;

/// Canonical field → source column header. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: Vec<(CanonicalField, String)>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `field` to `column`, replacing any earlier mapping for `field`.
    pub fn with(mut self, field: CanonicalField, column: impl Into<String>) -> Self {
        self.insert(field, column);
        self
    }

    pub fn insert(&mut self, field: CanonicalField, column: impl Into<String>) {
        let column = column.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((field, column)),
        }
    }

    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> + '_ {
        self.entries.iter().map(|(f, c)| (*f, c.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> From<[(CanonicalField, &str); N]> for ColumnMapping {
    fn from(pairs: [(CanonicalField, &str); N]) -> Self {
        pairs
            .into_iter()
            .fold(ColumnMapping::new(), |m, (field, column)| m.with(field, column))
    }
}

pub const DEFAULT_TRANSFER_LABEL: &str = "转账";

/// A format's localized type text. Only income and expense are recognized in
/// source rows; transfers arise from reconciliation, so their label is only
/// used for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeVocabulary {
    pub income: String,
    pub expense: String,
    pub transfer: String,
}

impl TypeVocabulary {
    pub fn new(income: &str, expense: &str) -> Self {
        Self {
            income: income.to_string(),
            expense: expense.to_string(),
            transfer: DEFAULT_TRANSFER_LABEL.to_string(),
        }
    }

    pub fn with_transfer_label(mut self, transfer: &str) -> Self {
        self.transfer = transfer.to_string();
        self
    }

    pub fn recognize(&self, text: &str) -> Option<TransactionKind> {
        if text == self.income {
            Some(TransactionKind::Income)
        } else if text == self.expense {
            Some(TransactionKind::Expense)
        } else {
            None
        }
    }

    pub fn label(&self, kind: TransactionKind) -> &str {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
            TransactionKind::Transfer => &self.transfer,
        }
    }
}
