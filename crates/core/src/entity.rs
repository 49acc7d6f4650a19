use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::TransactionKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<i64>,
    pub name: String,
    pub currency: String,
}

impl Account {
    pub fn new(name: &str, currency: &str) -> Self {
        Account {
            id: None,
            name: name.to_string(),
            currency: currency.to_string(),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.currency)
    }
}

/// Categories are scoped by transaction kind: "Salary" under income and
/// "Salary" under expense are distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub kind: TransactionKind,
    pub parent: Option<String>,
}

impl Category {
    pub fn new(name: &str, kind: TransactionKind, parent: Option<&str>) -> Self {
        Category {
            id: None,
            name: name.to_string(),
            kind,
            parent: parent.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Option<i64>,
    pub name: String,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Tag {
            id: None,
            name: name.to_string(),
        }
    }
}
