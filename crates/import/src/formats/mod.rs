//! Per-format capability sets and the pipeline that runs them.

pub mod profile;
pub mod qianji;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error};

use crate::builder::TransactionTableBuilder;
use crate::datatable::{CanonicalTransactionTable, NamedColumnView, RawRow, RawTable};
use crate::error::ImportError;
use crate::mapping::{ColumnMapping, TypeVocabulary};
use crate::transform::RowTransformer;

pub use profile::FormatProfile;
pub use qianji::QianjiFormat;

/// Rewrites a raw export whose header cannot be used as-is into a table whose
/// first row is a clean header.
pub trait FormatExtractor: Send + Sync {
    fn extract(&self, table: RawTable) -> Result<RawTable, ImportError>;
}

/// Trims spaces from every cell and promotes the first row to header.
pub struct TrimmedHeaderExtractor;

impl FormatExtractor for TrimmedHeaderExtractor {
    fn extract(&self, table: RawTable) -> Result<RawTable, ImportError> {
        let rows: Vec<RawRow> = table
            .into_rows()
            .into_iter()
            .map(|row| {
                let id = row.id();
                let cells = row
                    .into_cells()
                    .into_iter()
                    .map(|cell| cell.trim_matches(' ').to_string())
                    .collect();
                RawRow::new(id, cells)
            })
            .collect();

        if rows.len() < 2 {
            error!(rows = rows.len(), "cannot parse import data, no data rows after header");
            return Err(ImportError::NoTransactionData);
        }

        Ok(RawTable::from_raw_rows(rows, true))
    }
}

/// Everything a source format contributes to the pipeline.
pub trait ImportFormat: Send + Sync {
    fn name(&self) -> &str;

    fn delimiter(&self) -> u8 {
        b','
    }

    fn column_mapping(&self) -> &ColumnMapping;

    fn type_vocabulary(&self) -> &TypeVocabulary;

    /// Header names that must be present for the import to proceed.
    fn required_columns(&self) -> Vec<&str>;

    fn related_id_column(&self) -> Option<&str> {
        None
    }

    fn extractor(&self) -> Option<&dyn FormatExtractor> {
        None
    }

    fn row_transformer(&self) -> &dyn RowTransformer;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatId {
    Qianji,
}

impl FormatId {
    pub const ALL: [FormatId; 1] = [FormatId::Qianji];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatId::Qianji => "qianji",
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatId {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qianji" => Ok(FormatId::Qianji),
            other => Err(ImportError::UnknownFormat(other.to_string())),
        }
    }
}

/// A fresh instance of a built-in format.
pub fn format_for(id: FormatId) -> Box<dyn ImportFormat> {
    match id {
        FormatId::Qianji => Box::new(QianjiFormat::new()),
    }
}

/// Runs decoded export text through the whole pipeline for `format`.
pub fn parse_transaction_table(
    format: &dyn ImportFormat,
    text: &str,
) -> Result<CanonicalTransactionTable, ImportError> {
    let extractor = format.extractor();
    // Extractors receive every row and decide which one is the header.
    let raw = RawTable::from_text(text, format.delimiter(), extractor.is_none())?;

    let raw = match extractor {
        Some(extractor) => extractor.extract(raw)?,
        None => raw,
    };

    let view = NamedColumnView::from_header(raw);

    let missing = view.missing_columns(&format.required_columns());
    if !missing.is_empty() {
        error!(
            import_format = format.name(),
            missing = %missing.join(","),
            "cannot parse import data, missing essential columns in header row"
        );
        return Err(ImportError::MissingHeaderColumn {
            columns: missing.into_iter().map(str::to_string).collect(),
        });
    }

    debug!(
        import_format = format.name(),
        rows = view.data_row_count(),
        "parsing transaction table"
    );

    let mut builder = TransactionTableBuilder::new(
        format.column_mapping(),
        format.type_vocabulary(),
        format.row_transformer(),
    );
    if let Some(column) = format.related_id_column() {
        builder = builder.with_related_id_column(column);
    }

    builder.build(&view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(rows: &[&[&str]]) -> RawTable {
        RawTable::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            false,
        )
    }

    #[test]
    fn extractor_trims_and_promotes_header() {
        let out = TrimmedHeaderExtractor
            .extract(lines(&[&[" 时间 ", "金额"], &["2024-01-01 ", " -1"]]))
            .unwrap();
        assert!(out.has_header());
        assert_eq!(out.header_row().unwrap().get(0), Some("时间"));
        assert_eq!(out.data_rows().next().unwrap().get(1), Some("-1"));
    }

    #[test]
    fn extractor_requires_a_data_row() {
        assert!(matches!(
            TrimmedHeaderExtractor.extract(lines(&[&["时间"]])),
            Err(ImportError::NoTransactionData)
        ));
        assert!(matches!(
            TrimmedHeaderExtractor.extract(lines(&[])),
            Err(ImportError::NoTransactionData)
        ));
    }

    #[test]
    fn extractor_is_idempotent() {
        let once = TrimmedHeaderExtractor
            .extract(lines(&[&[" a "], &[" b "]]))
            .unwrap();
        let twice = TrimmedHeaderExtractor.extract(once.clone()).unwrap();
        let cells = |t: &RawTable| -> Vec<Vec<String>> {
            t.clone().into_rows().into_iter().map(|r| r.into_cells()).collect()
        };
        assert_eq!(cells(&once), cells(&twice));
    }

    #[test]
    fn format_ids_parse_case_insensitively() {
        assert_eq!("Qianji".parse::<FormatId>().unwrap(), FormatId::Qianji);
        assert!(matches!(
            "mymoney".parse::<FormatId>(),
            Err(ImportError::UnknownFormat(name)) if name == "mymoney"
        ));
        for id in FormatId::ALL {
            assert_eq!(format_for(id).name(), id.as_str());
        }
    }
}
