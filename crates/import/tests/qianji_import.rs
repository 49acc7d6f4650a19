use tally_core::{Account, TransactionKind};
use tally_import::import::{import_transactions, import_with_format, parse_table};
use tally_import::{
    CanonicalField, EntityLookup, FormatId, FormatProfile, ImportError, ImportOptions, RowId,
};

const HEADER: &str = "时间,类型,分类,二级分类,账户,币种,金额,备注,关联账单";

fn export(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

#[test]
fn single_expense_row() {
    let text = "时间,类型,分类,二级分类,账户,币种,金额,备注\n2024-01-01,支出,饮食,午餐,招商银行,CNY,-35,\n";
    let table = parse_table(FormatId::Qianji, text).unwrap();

    assert_eq!(table.len(), 1);
    let row = table.row(0).unwrap();
    assert_eq!(row.get(CanonicalField::TransactionType), Some("expense"));
    assert_eq!(row.get(CanonicalField::TransactionTime), Some("2024-01-01 00:00:00"));
    assert_eq!(row.get(CanonicalField::Amount), Some("-35"));
    assert_eq!(row.get(CanonicalField::Category), Some("饮食"));
    assert_eq!(row.get(CanonicalField::SubCategory), Some("午餐"));
    assert!(!row.contains(CanonicalField::Description));
    assert_eq!(
        table.columns(),
        &[
            CanonicalField::TransactionType,
            CanonicalField::TransactionTime,
            CanonicalField::Category,
            CanonicalField::SubCategory,
            CanonicalField::AccountName,
            CanonicalField::AccountCurrency,
            CanonicalField::Amount,
            CanonicalField::Description,
        ]
    );
}

#[test]
fn transfer_pair_merges_into_one_row() {
    let text = export(&[
        "2024-01-02 10:00,支出,,转账,招商银行,CNY,-100,,T1",
        "2024-01-02 10:00,收入,,转账,现金,CNY,100,,T1",
    ]);
    let table = parse_table(FormatId::Qianji, &text).unwrap();

    assert_eq!(table.len(), 1);
    let row = table.row(0).unwrap();
    assert!(row.is_transfer());
    assert_eq!(row.get(CanonicalField::AccountName), Some("招商银行"));
    assert_eq!(row.get(CanonicalField::Amount), Some("-100"));
    assert_eq!(row.get(CanonicalField::RelatedAccountName), Some("现金"));
    assert_eq!(row.get(CanonicalField::RelatedAmount), Some("100"));
}

#[test]
fn lone_transfer_leg_rejects_import() {
    let text = export(&[
        "2024-01-02,支出,饮食,午餐,现金,CNY,-10,,",
        "2024-01-02,支出,,转账,招商银行,CNY,-100,,T7",
    ]);
    match parse_table(FormatId::Qianji, &text).unwrap_err() {
        ImportError::UnmatchedTransferLeg { count, related_ids } => {
            assert_eq!(count, 1);
            assert_eq!(related_ids, "T7");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unrecognized_type_rejects_import() {
    let text = export(&["2024-01-02,转账,,转账,招商银行,CNY,-100,,"]);
    assert!(matches!(
        parse_table(FormatId::Qianji, &text),
        Err(ImportError::InvalidTransactionType { row: RowId(2), ref value }) if value == "转账"
    ));
}

#[test]
fn short_row_rejects_import() {
    let text = "时间,类型,二级分类,账户,金额,备注\n2024-01-01,支出,午餐,现金,-5\n";
    assert!(matches!(
        parse_table(FormatId::Qianji, text),
        Err(ImportError::FewerFieldsThanHeader { count: 5, header_count: 6, .. })
    ));
}

#[test]
fn end_to_end_import_resolves_entities() {
    let text = export(&[
        "2024-01-01 08:30,支出,饮食,早餐,招商银行,CNY,-12,豆浆,",
        "2024-01-02,支出,,转账,招商银行,CNY,-100,取现,T1",
        "2024-01-02,收入,,转账,现金,CNY,100,,T1",
        "2024-01-03,收入,工资,奖金,招商银行,CNY,500,,",
    ]);
    let lookup = EntityLookup::default().with_account(Account::new("招商银行", "CNY"));
    let options = ImportOptions {
        default_currency: "CNY".to_string(),
        utc_offset_minutes: 480,
        ..ImportOptions::default()
    };

    let outcome = import_transactions(FormatId::Qianji, &text, &lookup, &options).unwrap();

    let kinds: Vec<_> = outcome.transactions.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Expense,
            TransactionKind::Transfer,
            TransactionKind::Income
        ]
    );
    assert_eq!(outcome.new_accounts, vec![Account::new("现金", "CNY")]);
    let names: Vec<_> = outcome.new_categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["早餐", "转账", "奖金"]);

    let transfer = &outcome.transactions[1];
    assert_eq!(transfer.description.as_deref(), Some("取现"));
    assert_eq!(transfer.transfer.as_ref().unwrap().account, "现金");
}

#[test]
fn profile_driven_import_with_tags() {
    let profile = FormatProfile::from_toml(
        r#"
name = "spending-tracker"
delimiter = ";"
income_label = "IN"
expense_label = "OUT"
related_id_column = "Link"

[columns]
transaction_time = "When"
transaction_type = "Dir"
account_name = "Wallet"
amount = "Value"
tags = "Labels"
"#,
    )
    .unwrap();

    let text = "When;Dir;Wallet;Value;Labels;Link\n\
                2024-05-01 09:15;OUT;Visa;-8.40;coffee|work;\n\
                2024-05-02;OUT;Visa;-50;;L1\n\
                2024-05-02;IN;Savings;50;;L1\n";

    let outcome = import_with_format(
        &profile,
        text,
        &EntityLookup::default(),
        &ImportOptions {
            default_currency: "EUR".to_string(),
            ..ImportOptions::default()
        },
    )
    .unwrap();

    assert_eq!(outcome.transactions.len(), 2);
    assert_eq!(outcome.transactions[0].tags, vec!["coffee", "work"]);
    assert_eq!(outcome.transactions[0].amount.to_cents(), Some(840));
    assert!(outcome.transactions[1].is_transfer());
    let tags: Vec<_> = outcome.new_tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, vec!["coffee", "work"]);
    assert!(outcome.new_categories.is_empty());
}

#[test]
fn income_leg_first_transfer_moves_money_out_of_the_paying_account() {
    let text = export(&[
        "2024-01-02,收入,,转账,现金,CNY,100,,T1",
        "2024-01-02,支出,,转账,招商银行,CNY,-100,取现,T1",
    ]);

    let outcome = import_transactions(
        FormatId::Qianji,
        &text,
        &EntityLookup::default(),
        &ImportOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.transactions.len(), 1);
    let tx = &outcome.transactions[0];
    assert_eq!(tx.kind, TransactionKind::Transfer);
    assert_eq!(tx.account, "招商银行");
    assert_eq!(tx.amount.to_cents(), Some(10000));
    let leg = tx.transfer.as_ref().unwrap();
    assert_eq!(leg.account, "现金");
    assert_eq!(leg.amount.to_cents(), Some(10000));
    assert_eq!(tx.description.as_deref(), Some("取现"));
}

#[test]
fn errors_name_the_export_line() {
    let text = export(&[
        "2024-01-01,支出,饮食,早餐,招商银行,CNY,-12,,",
        "2024-01-01,支出,饮食,午餐,招商银行,CNY,lots,,",
    ]);

    let err = import_transactions(
        FormatId::Qianji,
        &text,
        &EntityLookup::default(),
        &ImportOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ImportError::InvalidAmount { row: RowId(3), ref value } if value == "lots"
    ));
}

#[test]
fn missing_currency_column_needs_a_default() {
    let profile = FormatProfile::from_toml(
        r#"
name = "plain"
income_label = "IN"
expense_label = "OUT"

[columns]
transaction_time = "When"
transaction_type = "Dir"
account_name = "Wallet"
amount = "Value"
"#,
    )
    .unwrap();
    let text = "When,Dir,Wallet,Value\n2024-05-01,OUT,Visa,-8\n";

    let err = import_with_format(
        &profile,
        text,
        &EntityLookup::default(),
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ImportError::MissingCurrency { row: RowId(2), ref account } if account == "Visa"
    ));
}
