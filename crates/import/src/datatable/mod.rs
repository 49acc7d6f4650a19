//! Layered table abstractions: raw cells, a named-column view over them, and
//! the canonical transaction table the builder produces.

pub mod canonical;
pub mod raw;
pub mod view;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use canonical::{CanonicalField, CanonicalRow, CanonicalTransactionTable};
pub use raw::{RawRow, RawTable};
pub use view::{NamedColumnView, NamedRow};

/// 1-based line number of a row in the source export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
