use std::collections::HashMap;

use super::raw::{RawRow, RawTable};
use super::RowId;

/// Exposes a [`RawTable`]'s data rows by column name. The name set is fixed at
/// construction; which names are mandatory is the caller's decision.
#[derive(Debug, Clone)]
pub struct NamedColumnView {
    indices: HashMap<String, usize>,
    names: Vec<String>,
    header_column_count: usize,
    rows: Vec<RawRow>,
}

impl NamedColumnView {
    /// Uses the table's header row for names. Duplicate names resolve to the
    /// first occurrence. A table without a header yields a view with no
    /// columns.
    pub fn from_header(table: RawTable) -> Self {
        let has_header = table.has_header();
        let mut rows = table.into_rows().into_iter();
        let header = if has_header { rows.next() } else { None };

        let mut indices = HashMap::new();
        let mut names = Vec::new();
        let mut header_column_count = 0;

        if let Some(header) = header {
            header_column_count = header.column_count();
            for (index, name) in header.into_cells().into_iter().enumerate() {
                if !indices.contains_key(&name) {
                    indices.insert(name.clone(), index);
                    names.push(name);
                }
            }
        }

        Self {
            indices,
            names,
            header_column_count,
            rows: rows.collect(),
        }
    }

    /// Uses an explicit name → index mapping, for exports without a usable
    /// header row. Any header row the table declares is skipped.
    pub fn with_column_indices(table: RawTable, mapping: &[(&str, usize)]) -> Self {
        let rows: Vec<RawRow> = table.data_rows().cloned().collect();
        let mut indices = HashMap::new();
        let mut names = Vec::new();

        for (name, index) in mapping {
            if !indices.contains_key(*name) {
                indices.insert(name.to_string(), *index);
                names.push(name.to_string());
            }
        }

        let header_column_count = mapping.iter().map(|(_, i)| i + 1).max().unwrap_or(0);

        Self {
            indices,
            names,
            header_column_count,
            rows,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn header_column_count(&self) -> usize {
        self.header_column_count
    }

    /// Names from `required` that did not resolve, in the order given.
    pub fn missing_columns<'n>(&self, required: &[&'n str]) -> Vec<&'n str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn data_rows(&self) -> impl Iterator<Item = NamedRow<'_>> + '_ {
        self.rows.iter().map(move |row| NamedRow { row, view: self })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NamedRow<'a> {
    row: &'a RawRow,
    view: &'a NamedColumnView,
}

impl<'a> NamedRow<'a> {
    pub fn row_id(&self) -> RowId {
        self.row.id()
    }

    pub fn column_count(&self) -> usize {
        self.row.column_count()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.row.get(index)
    }

    pub fn has_data(&self, name: &str) -> bool {
        !self.get_data(name).is_empty()
    }

    /// Cell under `name`, or `""` when the column is unknown or the row is
    /// too short to reach it.
    pub fn get_data(&self, name: &str) -> &'a str {
        self.view
            .column_index(name)
            .and_then(|index| self.row.get(index))
            .unwrap_or_default()
    }
}
