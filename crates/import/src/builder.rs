use std::collections::{BTreeSet, HashMap, HashSet};

use tally_core::TransactionKind;
use tracing::{debug, error};

use crate::datatable::{
    CanonicalField, CanonicalRow, CanonicalTransactionTable, NamedColumnView, NamedRow, RowId,
};
use crate::error::ImportError;
use crate::mapping::{ColumnMapping, TypeVocabulary};
use crate::transform::{RowOutcome, RowTransformer};

/// Drives a [`NamedColumnView`] through column mapping, type normalization,
/// row transformation and transfer reconciliation.
///
/// Formats that export a transfer as two rows sharing a related-record id
/// name that column with [`with_related_id_column`](Self::with_related_id_column).
/// The first row seen for an id becomes the primary leg; the second supplies
/// the `Related*` fields and the merged row is emitted at its position.
///
/// The builder holds no state between calls; every `build` owns its own
/// registry of pending legs.
pub struct TransactionTableBuilder<'a> {
    mapping: &'a ColumnMapping,
    vocabulary: &'a TypeVocabulary,
    transformer: &'a dyn RowTransformer,
    related_id_column: Option<&'a str>,
}

#[derive(Debug, Default)]
struct BuildStats {
    rows: usize,
    dropped: usize,
    transfers: usize,
}

impl<'a> TransactionTableBuilder<'a> {
    pub fn new(
        mapping: &'a ColumnMapping,
        vocabulary: &'a TypeVocabulary,
        transformer: &'a dyn RowTransformer,
    ) -> Self {
        Self {
            mapping,
            vocabulary,
            transformer,
            related_id_column: None,
        }
    }

    pub fn with_related_id_column(mut self, column: &'a str) -> Self {
        self.related_id_column = Some(column);
        self
    }

    fn reconciles(&self, view: &NamedColumnView) -> bool {
        self.related_id_column
            .is_some_and(|column| view.has_column(column))
    }

    /// Canonical columns the output table will declare for `view`.
    pub fn declared_columns(&self, view: &NamedColumnView) -> Vec<CanonicalField> {
        let mut columns = BTreeSet::from([
            CanonicalField::TransactionType,
            CanonicalField::TransactionTime,
        ]);

        for (field, column) in self.mapping.iter() {
            if view.has_column(column) {
                columns.insert(field);
            }
        }

        if self.reconciles(view) {
            columns.insert(CanonicalField::RelatedAccountName);
            columns.insert(CanonicalField::RelatedAmount);
            if columns.contains(&CanonicalField::AccountCurrency) {
                columns.insert(CanonicalField::RelatedAccountCurrency);
            }
        }

        columns.extend(self.transformer.added_columns().iter().copied());
        columns.into_iter().collect()
    }

    pub fn build(&self, view: &NamedColumnView) -> Result<CanonicalTransactionTable, ImportError> {
        let mut table = CanonicalTransactionTable::new(self.declared_columns(view));
        let related_id_column = self.related_id_column.filter(|_| self.reconciles(view));
        let mut pending: HashMap<String, (RowId, CanonicalRow)> = HashMap::new();
        let mut settled: HashSet<String> = HashSet::new();
        let mut stats = BuildStats::default();

        for row in view.data_rows() {
            stats.rows += 1;

            if row.column_count() < view.header_column_count() {
                error!(
                    row = %row.row_id(),
                    count = row.column_count(),
                    header_count = view.header_column_count(),
                    "cannot parse row, data row has fewer columns than header row"
                );
                return Err(ImportError::FewerFieldsThanHeader {
                    row: row.row_id(),
                    count: row.column_count(),
                    header_count: view.header_column_count(),
                });
            }

            let data = self.extract(&row)?;

            let data = match self.transformer.transform(&data)? {
                RowOutcome::Valid(data) => data,
                RowOutcome::Invalid => {
                    stats.dropped += 1;
                    continue;
                }
            };

            let related_id = related_id_column
                .map(|column| row.get_data(column))
                .filter(|id| !id.is_empty());

            let Some(related_id) = related_id else {
                table.push(row.row_id(), strip_related_leg(data));
                continue;
            };

            if settled.contains(related_id) {
                error!(row = %row.row_id(), related_id, "related id already paired");
                return Err(ImportError::DuplicateTransferLeg {
                    row: row.row_id(),
                    related_id: related_id.to_string(),
                });
            }

            match pending.remove(related_id) {
                None => {
                    pending.insert(related_id.to_string(), (row.row_id(), data));
                }
                Some((primary_row, primary)) => {
                    settled.insert(related_id.to_string());
                    stats.transfers += 1;
                    table.push(primary_row, merge_transfer(primary, &data));
                }
            }
        }

        if !pending.is_empty() {
            let related_ids = joined_related_ids(&pending);
            error!(
                count = pending.len(),
                related_ids = %related_ids,
                "transactions don't have related records"
            );
            return Err(ImportError::UnmatchedTransferLeg {
                count: pending.len(),
                related_ids,
            });
        }

        debug!(
            rows = stats.rows,
            dropped = stats.dropped,
            transfers = stats.transfers,
            output = table.len(),
            "built canonical transaction table"
        );

        Ok(table)
    }

    /// Copies mapped cells and rewrites the type text to its canonical token.
    fn extract(&self, row: &NamedRow<'_>) -> Result<CanonicalRow, ImportError> {
        let mut data = CanonicalRow::new();

        for (field, column) in self.mapping.iter() {
            if row.has_data(column) {
                data.set(field, row.get_data(column));
            }
        }

        let type_text = data
            .get(CanonicalField::TransactionType)
            .unwrap_or_default();

        match self.vocabulary.recognize(type_text) {
            Some(kind) => {
                data.set(CanonicalField::TransactionType, kind.token());
                Ok(data)
            }
            None => {
                error!(row = %row.row_id(), value = type_text, "cannot parse transaction type");
                Err(ImportError::InvalidTransactionType {
                    row: row.row_id(),
                    value: type_text.to_string(),
                })
            }
        }
    }
}

fn strip_related_leg(mut row: CanonicalRow) -> CanonicalRow {
    if !row.is_transfer() {
        for field in CanonicalField::RELATED_LEG {
            row.remove(field);
        }
    }
    row
}

fn merge_transfer(primary: CanonicalRow, related: &CanonicalRow) -> CanonicalRow {
    let mut merged = primary;

    merged.set(CanonicalField::TransactionType, TransactionKind::Transfer.token());

    for (from, to) in [
        (CanonicalField::AccountName, CanonicalField::RelatedAccountName),
        (CanonicalField::AccountCurrency, CanonicalField::RelatedAccountCurrency),
        (CanonicalField::Amount, CanonicalField::RelatedAmount),
    ] {
        merged.set(to, related.get(from).unwrap_or_default());
    }

    for field in [
        CanonicalField::Description,
        CanonicalField::Member,
        CanonicalField::Tags,
    ] {
        if !merged.contains(field) {
            if let Some(value) = related.get(field) {
                merged.set(field, value);
            }
        }
    }

    merged
}

/// Sorted so diagnostics don't depend on hash order.
fn joined_related_ids(pending: &HashMap<String, (RowId, CanonicalRow)>) -> String {
    let mut ids: Vec<&str> = pending.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids.join(",")
}
