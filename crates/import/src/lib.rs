pub mod builder;
pub mod datatable;
pub mod error;
pub mod formats;
pub mod importer;
pub mod mapping;
pub mod transform;
pub mod util;

pub use builder::TransactionTableBuilder;
pub use datatable::{
    CanonicalField, CanonicalRow, CanonicalTransactionTable, NamedColumnView, RawTable, RowId,
};
pub use error::ImportError;
pub use formats::{
    format_for, parse_transaction_table, FormatExtractor, FormatId, FormatProfile, ImportFormat,
    QianjiFormat, TrimmedHeaderExtractor,
};
pub use importer::{EntityLookup, ImportOptions, ImportOutcome, TransactionImporter};
pub use mapping::{ColumnMapping, TypeVocabulary};
pub use transform::{DateTimeNormalizer, PassthroughTransformer, RowOutcome, RowTransformer};

pub mod import {
    use crate::*;

    pub fn parse_table(
        format_id: FormatId,
        text: &str,
    ) -> Result<CanonicalTransactionTable, ImportError> {
        let format = format_for(format_id);
        parse_transaction_table(format.as_ref(), text)
    }

    /// Parses `text` with `format` and resolves the result against `lookup`.
    pub fn import_with_format(
        format: &dyn ImportFormat,
        text: &str,
        lookup: &EntityLookup,
        options: &ImportOptions,
    ) -> Result<ImportOutcome, ImportError> {
        let table = parse_transaction_table(format, text)?;
        TransactionImporter::new(format.type_vocabulary(), options).import(&table, lookup)
    }

    pub fn import_transactions(
        format_id: FormatId,
        text: &str,
        lookup: &EntityLookup,
        options: &ImportOptions,
    ) -> Result<ImportOutcome, ImportError> {
        let format = format_for(format_id);
        import_with_format(format.as_ref(), text, lookup, options)
    }

    pub fn load_profile(toml_content: &str) -> Result<FormatProfile, ImportError> {
        FormatProfile::from_toml(toml_content)
    }
}
