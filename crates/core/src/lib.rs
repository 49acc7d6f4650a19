pub mod entity;
pub mod money;
pub mod transaction;

pub use entity::{Account, Category, Tag};
pub use money::Money;
pub use transaction::{
    DomainError, ImportedTransaction, PendingTransaction, TransactionKind, TransferLeg,
};
