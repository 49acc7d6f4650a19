use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tally_core::TransactionKind;

use super::RowId;

/// The fixed transaction schema every source format maps into. Variant order
/// is the column order of a [`CanonicalTransactionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    TransactionType,
    TransactionTime,
    Category,
    SubCategory,
    AccountName,
    AccountCurrency,
    Amount,
    RelatedAccountName,
    RelatedAccountCurrency,
    RelatedAmount,
    Description,
    Member,
    Tags,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 13] = [
        CanonicalField::TransactionType,
        CanonicalField::TransactionTime,
        CanonicalField::Category,
        CanonicalField::SubCategory,
        CanonicalField::AccountName,
        CanonicalField::AccountCurrency,
        CanonicalField::Amount,
        CanonicalField::RelatedAccountName,
        CanonicalField::RelatedAccountCurrency,
        CanonicalField::RelatedAmount,
        CanonicalField::Description,
        CanonicalField::Member,
        CanonicalField::Tags,
    ];

    pub const RELATED_LEG: [CanonicalField; 3] = [
        CanonicalField::RelatedAccountName,
        CanonicalField::RelatedAccountCurrency,
        CanonicalField::RelatedAmount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::TransactionType => "transaction_type",
            CanonicalField::TransactionTime => "transaction_time",
            CanonicalField::Category => "category",
            CanonicalField::SubCategory => "sub_category",
            CanonicalField::AccountName => "account_name",
            CanonicalField::AccountCurrency => "account_currency",
            CanonicalField::Amount => "amount",
            CanonicalField::RelatedAccountName => "related_account_name",
            CanonicalField::RelatedAccountCurrency => "related_account_currency",
            CanonicalField::RelatedAmount => "related_amount",
            CanonicalField::Description => "description",
            CanonicalField::Member => "member",
            CanonicalField::Tags => "tags",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("Unknown canonical field: '{s}'"))
    }
}

/// One transaction in canonical form. Unset fields are absent, never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow(BTreeMap<CanonicalField, String>);

impl CanonicalRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Stores `value`; an empty value clears the field instead.
    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, value);
        }
    }

    pub fn remove(&mut self, field: CanonicalField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_transfer(&self) -> bool {
        self.get(CanonicalField::TransactionType) == Some(TransactionKind::Transfer.token())
    }

    pub fn fields(&self) -> impl Iterator<Item = (CanonicalField, &str)> + '_ {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(CanonicalField, &str); N]> for CanonicalRow {
    fn from(pairs: [(CanonicalField, &str); N]) -> Self {
        let mut row = CanonicalRow::new();
        for (field, value) in pairs {
            row.set(field, value);
        }
        row
    }
}

/// Read-only result of a table build: declared columns plus rows, transfers
/// already merged into single rows. Each row remembers the source line it
/// came from; a merged transfer points at its primary leg.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTransactionTable {
    columns: Vec<CanonicalField>,
    rows: Vec<CanonicalRow>,
    sources: Vec<RowId>,
}

impl CanonicalTransactionTable {
    pub(crate) fn new(columns: Vec<CanonicalField>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, source: RowId, row: CanonicalRow) {
        self.sources.push(source);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[CanonicalField] {
        &self.columns
    }

    pub fn has_column(&self, field: CanonicalField) -> bool {
        self.columns.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&CanonicalRow> {
        self.rows.get(index)
    }

    pub fn source_row(&self, index: usize) -> Option<RowId> {
        self.sources.get(index).copied()
    }

    /// Starts from the first row on every call.
    pub fn rows(&self) -> std::slice::Iter<'_, CanonicalRow> {
        self.rows.iter()
    }

    /// Rows paired with the source line each was built from.
    pub fn rows_with_source(&self) -> impl Iterator<Item = (RowId, &CanonicalRow)> + '_ {
        self.sources.iter().copied().zip(self.rows.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in CanonicalField::ALL {
            assert_eq!(field.name().parse::<CanonicalField>().unwrap(), field);
        }
        assert!("amount_cents".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn field_order_matches_schema_order() {
        let mut sorted = CanonicalField::ALL;
        sorted.sort();
        assert_eq!(sorted, CanonicalField::ALL);
    }

    #[test]
    fn setting_empty_value_clears_field() {
        let mut row = CanonicalRow::from([(CanonicalField::Description, "lunch")]);
        assert!(row.contains(CanonicalField::Description));
        row.set(CanonicalField::Description, "");
        assert!(!row.contains(CanonicalField::Description));
        assert!(row.is_empty());
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&CanonicalField::RelatedAccountCurrency).unwrap();
        assert_eq!(json, "\"related_account_currency\"");
    }

    #[test]
    fn rows_iterator_is_restartable() {
        let mut table = CanonicalTransactionTable::new(vec![CanonicalField::Amount]);
        table.push(RowId(2), CanonicalRow::from([(CanonicalField::Amount, "1")]));
        table.push(RowId(4), CanonicalRow::from([(CanonicalField::Amount, "2")]));
        assert_eq!(table.rows().count(), 2);
        assert_eq!(table.rows().next().unwrap().get(CanonicalField::Amount), Some("1"));
        assert!(table.has_column(CanonicalField::Amount));
        assert!(!table.has_column(CanonicalField::Tags));
        assert_eq!(table.source_row(1), Some(RowId(4)));
        assert_eq!(table.source_row(2), None);
        let sources: Vec<_> = table.rows_with_source().map(|(id, _)| id).collect();
        assert_eq!(sources, vec![RowId(2), RowId(4)]);
    }
}
