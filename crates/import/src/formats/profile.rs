//! User-defined formats loaded from TOML.
//!
//! ```toml
//! name = "bank-export"
//! delimiter = ";"
//! income_label = "Income"
//! expense_label = "Expense"
//! related_id_column = "Transfer Id"
//! required = ["account_name", "amount"]
//!
//! [columns]
//! transaction_time = "Date"
//! transaction_type = "Type"
//! account_name = "Account"
//! amount = "Amount"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{FormatExtractor, ImportFormat, TrimmedHeaderExtractor};
use crate::datatable::CanonicalField;
use crate::error::ImportError;
use crate::mapping::{ColumnMapping, TypeVocabulary};
use crate::transform::{DateTimeNormalizer, PassthroughTransformer, RowTransformer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatProfileConfig {
    pub name: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Canonical field name → header text.
    pub columns: BTreeMap<String, String>,
    #[serde(default)]
    pub required: Vec<CanonicalField>,
    pub income_label: String,
    pub expense_label: String,
    #[serde(default)]
    pub transfer_label: Option<String>,
    #[serde(default)]
    pub related_id_column: Option<String>,
    #[serde(default)]
    pub trim_header: bool,
    #[serde(default = "default_true")]
    pub normalize_time: bool,
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

pub struct FormatProfile {
    name: String,
    delimiter: u8,
    mapping: ColumnMapping,
    vocabulary: TypeVocabulary,
    required: Vec<String>,
    related_id_column: Option<String>,
    trim_header: bool,
    transformer: Box<dyn RowTransformer>,
}

impl FormatProfile {
    pub fn from_toml(toml_content: &str) -> Result<Self, ImportError> {
        let config: FormatProfileConfig = toml::from_str(toml_content)
            .map_err(|e| ImportError::InvalidProfile(format!("Failed to parse TOML: {e}")))?;
        Self::from_config(config)
    }

    pub fn from_config(config: FormatProfileConfig) -> Result<Self, ImportError> {
        let mut mapping = ColumnMapping::new();
        for (field, column) in &config.columns {
            let field = field
                .parse::<CanonicalField>()
                .map_err(ImportError::InvalidProfile)?;
            mapping.insert(field, column.as_str());
        }

        let mut required_fields = vec![
            CanonicalField::TransactionType,
            CanonicalField::TransactionTime,
        ];
        for field in &config.required {
            if !required_fields.contains(field) {
                required_fields.push(*field);
            }
        }

        let mut required = Vec::with_capacity(required_fields.len());
        for field in required_fields {
            let column = mapping.column_for(field).ok_or_else(|| {
                ImportError::InvalidProfile(format!("required field '{field}' has no column"))
            })?;
            required.push(column.to_string());
        }

        let delimiter = match config.delimiter.as_bytes() {
            [byte] => *byte,
            _ => {
                return Err(ImportError::InvalidProfile(format!(
                    "delimiter must be a single byte, got '{}'",
                    config.delimiter
                )))
            }
        };

        let mut vocabulary = TypeVocabulary::new(&config.income_label, &config.expense_label);
        if let Some(label) = &config.transfer_label {
            vocabulary = vocabulary.with_transfer_label(label);
        }

        let transformer: Box<dyn RowTransformer> = if config.normalize_time {
            Box::new(DateTimeNormalizer)
        } else {
            Box::new(PassthroughTransformer)
        };

        Ok(Self {
            name: config.name,
            delimiter,
            mapping,
            vocabulary,
            required,
            related_id_column: config.related_id_column,
            trim_header: config.trim_header,
            transformer,
        })
    }
}

impl ImportFormat for FormatProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn column_mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    fn type_vocabulary(&self) -> &TypeVocabulary {
        &self.vocabulary
    }

    fn required_columns(&self) -> Vec<&str> {
        self.required.iter().map(String::as_str).collect()
    }

    fn related_id_column(&self) -> Option<&str> {
        self.related_id_column.as_deref()
    }

    fn extractor(&self) -> Option<&dyn FormatExtractor> {
        if self.trim_header {
            Some(&TrimmedHeaderExtractor)
        } else {
            None
        }
    }

    fn row_transformer(&self) -> &dyn RowTransformer {
        self.transformer.as_ref()
    }
}
