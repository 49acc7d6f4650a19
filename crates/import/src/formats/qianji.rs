//! Qianji (钱迹) CSV exports.
//!
//! Transfers are exported as two rows, an expense leg and an income leg,
//! linked through the `关联账单` column.

use super::{FormatExtractor, ImportFormat, TrimmedHeaderExtractor};
use crate::datatable::CanonicalField;
use crate::mapping::{ColumnMapping, TypeVocabulary};
use crate::transform::{DateTimeNormalizer, RowTransformer};

pub const TIME_COLUMN: &str = "时间";
pub const TYPE_COLUMN: &str = "类型";
pub const CATEGORY_COLUMN: &str = "分类";
pub const SUB_CATEGORY_COLUMN: &str = "二级分类";
pub const ACCOUNT_NAME_COLUMN: &str = "账户";
pub const ACCOUNT_CURRENCY_COLUMN: &str = "币种";
pub const AMOUNT_COLUMN: &str = "金额";
pub const DESCRIPTION_COLUMN: &str = "备注";
pub const MEMBER_COLUMN: &str = "记账者";
pub const RELATED_ID_COLUMN: &str = "关联账单";

pub const INCOME_TEXT: &str = "收入";
pub const EXPENSE_TEXT: &str = "支出";

pub struct QianjiFormat {
    mapping: ColumnMapping,
    vocabulary: TypeVocabulary,
}

impl QianjiFormat {
    pub fn new() -> Self {
        Self {
            mapping: ColumnMapping::from([
                (CanonicalField::TransactionTime, TIME_COLUMN),
                (CanonicalField::TransactionType, TYPE_COLUMN),
                (CanonicalField::Category, CATEGORY_COLUMN),
                (CanonicalField::SubCategory, SUB_CATEGORY_COLUMN),
                (CanonicalField::AccountName, ACCOUNT_NAME_COLUMN),
                (CanonicalField::AccountCurrency, ACCOUNT_CURRENCY_COLUMN),
                (CanonicalField::Amount, AMOUNT_COLUMN),
                (CanonicalField::Description, DESCRIPTION_COLUMN),
                (CanonicalField::Member, MEMBER_COLUMN),
            ]),
            vocabulary: TypeVocabulary::new(INCOME_TEXT, EXPENSE_TEXT),
        }
    }
}

impl Default for QianjiFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportFormat for QianjiFormat {
    fn name(&self) -> &str {
        "qianji"
    }

    fn column_mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    fn type_vocabulary(&self) -> &TypeVocabulary {
        &self.vocabulary
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![
            TIME_COLUMN,
            TYPE_COLUMN,
            SUB_CATEGORY_COLUMN,
            ACCOUNT_NAME_COLUMN,
            AMOUNT_COLUMN,
        ]
    }

    fn related_id_column(&self) -> Option<&str> {
        Some(RELATED_ID_COLUMN)
    }

    fn extractor(&self) -> Option<&dyn FormatExtractor> {
        Some(&TrimmedHeaderExtractor)
    }

    fn row_transformer(&self) -> &dyn RowTransformer {
        &DateTimeNormalizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::formats::parse_transaction_table;

    #[test]
    fn header_cells_are_trimmed_before_lookup() {
        let text = " 时间 , 类型 ,二级分类,账户,金额\n2024-03-01 18:20 , 收入 ,工资,工行,8000\n";
        let table = parse_transaction_table(&QianjiFormat::new(), text).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!(row.get(CanonicalField::TransactionTime), Some("2024-03-01 18:20:00"));
        assert_eq!(row.get(CanonicalField::TransactionType), Some("income"));
    }

    #[test]
    fn missing_required_columns_are_listed() {
        let text = "时间,类型,账户\n2024-01-01,支出,现金\n";
        match parse_transaction_table(&QianjiFormat::new(), text).unwrap_err() {
            ImportError::MissingHeaderColumn { columns } => {
                assert_eq!(columns, vec![SUB_CATEGORY_COLUMN, AMOUNT_COLUMN]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_only_file_has_no_data() {
        let text = "时间,类型,二级分类,账户,金额\n";
        assert!(matches!(
            parse_transaction_table(&QianjiFormat::new(), text),
            Err(ImportError::NoTransactionData)
        ));
    }

    #[test]
    fn optional_columns_absent_from_schema() {
        let text = "时间,类型,二级分类,账户,金额\n2024-01-01,支出,午餐,现金,-20\n";
        let table = parse_transaction_table(&QianjiFormat::new(), text).unwrap();
        assert!(!table.has_column(CanonicalField::Category));
        assert!(!table.has_column(CanonicalField::AccountCurrency));
        assert!(!table.has_column(CanonicalField::Member));
        assert!(!table.has_column(CanonicalField::RelatedAccountName));
    }
}
