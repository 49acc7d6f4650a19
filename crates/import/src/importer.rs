use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tally_core::{
    Account, Category, ImportedTransaction, Money, PendingTransaction, Tag, TransactionKind,
    TransferLeg,
};
use tracing::{debug, error};

use crate::datatable::{CanonicalField, CanonicalRow, CanonicalTransactionTable, RowId};
use crate::error::ImportError;
use crate::mapping::TypeVocabulary;
use crate::util;

/// `default_currency` starts empty: callers set it for formats whose exports
/// may omit the currency column, otherwise creating such an account fails
/// with [`ImportError::MissingCurrency`].
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Currency for accounts created from rows without a currency cell.
    pub default_currency: String,
    /// Offset applied to the exported wall-clock times.
    pub utc_offset_minutes: i32,
    pub tag_separator: char,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            default_currency: String::new(),
            utc_offset_minutes: 0,
            tag_separator: '|',
        }
    }
}

/// Entities the caller already has, keyed the way rows refer to them.
#[derive(Debug, Clone, Default)]
pub struct EntityLookup {
    pub accounts: HashMap<String, Account>,
    pub categories: HashMap<(TransactionKind, String), Category>,
    pub tags: HashMap<String, Tag>,
}

impl EntityLookup {
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.insert(account.name.clone(), account);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories
            .insert((category.kind, category.name.clone()), category);
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag.name.clone(), tag);
        self
    }
}

/// Domain transactions plus the entities that have to be created for them,
/// in order of first appearance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub transactions: Vec<ImportedTransaction>,
    pub new_accounts: Vec<Account>,
    pub new_categories: Vec<Category>,
    pub new_tags: Vec<Tag>,
}

#[derive(Default)]
struct NewEntities {
    outcome: ImportOutcome,
    accounts: HashSet<String>,
    categories: HashSet<(TransactionKind, String)>,
    tags: HashSet<String>,
}

/// Turns a canonical table into domain transactions, resolving names against
/// an [`EntityLookup`]. Nothing is persisted.
pub struct TransactionImporter<'a> {
    vocabulary: &'a TypeVocabulary,
    options: &'a ImportOptions,
}

impl<'a> TransactionImporter<'a> {
    pub fn new(vocabulary: &'a TypeVocabulary, options: &'a ImportOptions) -> Self {
        Self {
            vocabulary,
            options,
        }
    }

    pub fn import(
        &self,
        table: &CanonicalTransactionTable,
        lookup: &EntityLookup,
    ) -> Result<ImportOutcome, ImportError> {
        let offset = FixedOffset::east_opt(self.options.utc_offset_minutes.saturating_mul(60))
            .ok_or(ImportError::InvalidUtcOffset(self.options.utc_offset_minutes))?;

        let mut created = NewEntities::default();

        for (source, row) in table.rows_with_source() {
            let tx = self.import_row(source, row, offset, lookup, &mut created)?;
            created.outcome.transactions.push(tx);
        }

        let outcome = created.outcome;
        debug!(
            transactions = outcome.transactions.len(),
            new_accounts = outcome.new_accounts.len(),
            new_categories = outcome.new_categories.len(),
            new_tags = outcome.new_tags.len(),
            "imported canonical transaction table"
        );

        Ok(outcome)
    }

    fn import_row(
        &self,
        source: RowId,
        row: &CanonicalRow,
        offset: FixedOffset,
        lookup: &EntityLookup,
        created: &mut NewEntities,
    ) -> Result<ImportedTransaction, ImportError> {
        let kind = self.kind_of(row)?;
        let time = parse_time(source, row, offset)?;

        let account = row
            .get(CanonicalField::AccountName)
            .ok_or(ImportError::MissingAccountName { row: source })?;
        self.resolve_account(
            source,
            account,
            row.get(CanonicalField::AccountCurrency),
            lookup,
            created,
        )?;
        let amount = parse_amount(source, row.get(CanonicalField::Amount).unwrap_or_default())?;

        let (account, amount, transfer) = if kind == TransactionKind::Transfer {
            let related = row
                .get(CanonicalField::RelatedAccountName)
                .ok_or(ImportError::MissingAccountName { row: source })?;
            self.resolve_account(
                source,
                related,
                row.get(CanonicalField::RelatedAccountCurrency),
                lookup,
                created,
            )?;
            let related_amount = parse_amount(
                source,
                row.get(CanonicalField::RelatedAmount).unwrap_or_default(),
            )?;

            // Money leaves the negative leg, whichever leg the export listed first.
            if related_amount.is_negative() && !amount.is_negative() {
                let leg = TransferLeg {
                    account: account.to_string(),
                    amount,
                };
                (related, related_amount, Some(leg))
            } else {
                let leg = TransferLeg {
                    account: related.to_string(),
                    amount: related_amount,
                };
                (account, amount, Some(leg))
            }
        } else {
            (account, amount, None)
        };

        let category = resolve_category(kind, row, lookup, created);
        let tags = self.resolve_tags(row, lookup, created);

        let pending = PendingTransaction {
            kind,
            time,
            account: account.to_string(),
            amount,
            category,
            transfer,
            description: row.get(CanonicalField::Description).map(str::to_string),
            member: row.get(CanonicalField::Member).map(str::to_string),
            tags,
        };

        ImportedTransaction::validate(pending).map_err(|e| {
            error!(row = %source, error = %e, "cannot import transaction");
            ImportError::from(e)
        })
    }

    /// Accepts the canonical token, or the format's own display text for rows
    /// that did not pass through the table builder.
    fn kind_of(&self, row: &CanonicalRow) -> Result<TransactionKind, ImportError> {
        let text = row
            .get(CanonicalField::TransactionType)
            .unwrap_or_default();

        if let Ok(kind) = text.parse::<TransactionKind>() {
            return Ok(kind);
        }
        if let Some(kind) = self.vocabulary.recognize(text) {
            return Ok(kind);
        }
        if text == self.vocabulary.label(TransactionKind::Transfer) {
            return Ok(TransactionKind::Transfer);
        }

        Err(tally_core::DomainError::UnknownTransactionKind(text.to_string()).into())
    }

    fn resolve_account(
        &self,
        source: RowId,
        name: &str,
        currency: Option<&str>,
        lookup: &EntityLookup,
        created: &mut NewEntities,
    ) -> Result<(), ImportError> {
        if lookup.accounts.contains_key(name) || created.accounts.contains(name) {
            return Ok(());
        }
        let currency = currency.unwrap_or(&self.options.default_currency);
        if currency.is_empty() {
            error!(row = %source, account = name, "no currency for new account");
            return Err(ImportError::MissingCurrency {
                row: source,
                account: name.to_string(),
            });
        }
        created.accounts.insert(name.to_string());
        created.outcome.new_accounts.push(Account::new(name, currency));
        Ok(())
    }

    fn resolve_tags(
        &self,
        row: &CanonicalRow,
        lookup: &EntityLookup,
        created: &mut NewEntities,
    ) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();

        for name in row
            .get(CanonicalField::Tags)
            .unwrap_or_default()
            .split(self.options.tag_separator)
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            if tags.iter().any(|t| t == name) {
                continue;
            }
            if !lookup.tags.contains_key(name) && created.tags.insert(name.to_string()) {
                created.outcome.new_tags.push(Tag::new(name));
            }
            tags.push(name.to_string());
        }

        tags
    }
}

/// The sub-category is the leaf; the top-level category becomes its parent.
fn resolve_category(
    kind: TransactionKind,
    row: &CanonicalRow,
    lookup: &EntityLookup,
    created: &mut NewEntities,
) -> Option<String> {
    let parent = row.get(CanonicalField::Category);
    let name = row.get(CanonicalField::SubCategory).or(parent)?;
    let parent = parent.filter(|p| *p != name);

    let key = (kind, name.to_string());
    if !lookup.categories.contains_key(&key) && !created.categories.contains(&key) {
        created.outcome.new_categories.push(Category::new(name, kind, parent));
        created.categories.insert(key);
    }

    Some(name.to_string())
}

fn parse_time(
    source: RowId,
    row: &CanonicalRow,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, ImportError> {
    let text = row
        .get(CanonicalField::TransactionTime)
        .unwrap_or_default();

    util::parse_long_date_time(text)
        .and_then(|naive| naive.and_local_timezone(offset).single())
        .ok_or_else(|| {
            error!(row = %source, value = text, "cannot parse transaction time");
            ImportError::InvalidTransactionTime {
                row: source,
                value: text.to_string(),
            }
        })
}

fn parse_amount(source: RowId, text: &str) -> Result<Money, ImportError> {
    Money::parse(text).map_err(|_| {
        error!(row = %source, value = text, "cannot parse amount");
        ImportError::InvalidAmount {
            row: source,
            value: text.to_string(),
        }
    })
}
