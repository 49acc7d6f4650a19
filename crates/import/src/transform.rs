use crate::datatable::{CanonicalField, CanonicalRow};
use crate::error::ImportError;
use crate::util;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Valid(CanonicalRow),
    /// The row carries nothing importable and is dropped without an error.
    Invalid,
}

/// Per-format value fixups applied after generic column mapping.
/// Implementations are pure and must not depend on previous rows.
pub trait RowTransformer: Send + Sync {
    /// Canonical fields this transformer fills in beyond straight column copies.
    fn added_columns(&self) -> &[CanonicalField] {
        &[]
    }

    fn transform(&self, row: &CanonicalRow) -> Result<RowOutcome, ImportError>;
}

pub struct PassthroughTransformer;

impl RowTransformer for PassthroughTransformer {
    fn transform(&self, row: &CanonicalRow) -> Result<RowOutcome, ImportError> {
        Ok(RowOutcome::Valid(row.clone()))
    }
}

/// Widens `TransactionTime` to `YYYY-MM-DD HH:MM:SS`.
pub struct DateTimeNormalizer;

impl RowTransformer for DateTimeNormalizer {
    fn transform(&self, row: &CanonicalRow) -> Result<RowOutcome, ImportError> {
        let mut out = row.clone();

        if let Some(time) = row.get(CanonicalField::TransactionTime) {
            out.set(CanonicalField::TransactionTime, util::to_long_date_time(time));
        }

        Ok(RowOutcome::Valid(out))
    }
}
