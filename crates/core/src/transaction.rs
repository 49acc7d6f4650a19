use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    /// Internal token written into canonical rows. Independent of any
    /// source app's display vocabulary.
    pub fn token(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(DomainError::UnknownTransactionKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unknown transaction kind: {0}")]
    UnknownTransactionKind(String),
    #[error("Account name is empty")]
    EmptyAccountName,
    #[error("Transfer is missing its destination leg")]
    MissingTransferLeg,
    #[error("{0} transaction must not carry a transfer leg")]
    UnexpectedTransferLeg(TransactionKind),
}

/// The receiving side of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLeg {
    pub account: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub kind: TransactionKind,
    pub time: DateTime<FixedOffset>,
    pub account: String,
    pub amount: Money,
    pub category: Option<String>,
    pub transfer: Option<TransferLeg>,
    pub description: Option<String>,
    pub member: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedTransaction {
    pub kind: TransactionKind,
    pub time: DateTime<FixedOffset>,
    pub account: String,
    /// Always a magnitude; `kind` carries the direction.
    pub amount: Money,
    pub category: Option<String>,
    pub transfer: Option<TransferLeg>,
    pub description: Option<String>,
    pub member: Option<String>,
    pub tags: Vec<String>,
}

impl ImportedTransaction {
    pub fn validate(tx: PendingTransaction) -> Result<ImportedTransaction, DomainError> {
        if tx.account.trim().is_empty() {
            return Err(DomainError::EmptyAccountName);
        }

        let transfer = match (tx.kind, tx.transfer) {
            (TransactionKind::Transfer, Some(leg)) => {
                if leg.account.trim().is_empty() {
                    return Err(DomainError::EmptyAccountName);
                }
                Some(TransferLeg {
                    account: leg.account,
                    amount: leg.amount.abs(),
                })
            }
            (TransactionKind::Transfer, None) => return Err(DomainError::MissingTransferLeg),
            (kind, Some(_)) => return Err(DomainError::UnexpectedTransferLeg(kind)),
            (_, None) => None,
        };

        Ok(ImportedTransaction {
            kind: tx.kind,
            time: tx.time,
            account: tx.account,
            amount: tx.amount.abs(),
            category: tx.category,
            transfer,
            description: tx.description.filter(|d| !d.is_empty()),
            member: tx.member.filter(|m| !m.is_empty()),
            tags: tx.tags,
        })
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }
}
