use tally_core::DomainError;
use thiserror::Error;

use crate::datatable::RowId;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required columns in header row: {}", .columns.join(", "))]
    MissingHeaderColumn { columns: Vec<String> },
    #[error("Row {row} has {count} fields, fewer than the {header_count} in the header row")]
    FewerFieldsThanHeader {
        row: RowId,
        count: usize,
        header_count: usize,
    },
    #[error("Invalid transaction type \"{value}\" in row {row}")]
    InvalidTransactionType { row: RowId, value: String },
    #[error("No transaction data found in file")]
    NoTransactionData,
    #[error("{count} transactions have no related record (related ids: {related_ids})")]
    UnmatchedTransferLeg { count: usize, related_ids: String },
    #[error("Related id \"{related_id}\" in row {row} was already paired")]
    DuplicateTransferLeg { row: RowId, related_id: String },
    #[error("Invalid transaction time \"{value}\" in row {row}")]
    InvalidTransactionTime { row: RowId, value: String },
    #[error("Invalid amount \"{value}\" in row {row}")]
    InvalidAmount { row: RowId, value: String },
    #[error("Missing account name in row {row}")]
    MissingAccountName { row: RowId },
    #[error("No currency for new account \"{account}\" in row {row} and no default currency set")]
    MissingCurrency { row: RowId, account: String },
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidUtcOffset(i32),
    #[error("Invalid format profile: {0}")]
    InvalidProfile(String),
    #[error("Unknown import format: {0}")]
    UnknownFormat(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
