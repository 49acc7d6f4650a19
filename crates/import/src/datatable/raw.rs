use std::io::Read;

use super::RowId;
use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    id: RowId,
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(id: RowId, cells: Vec<String>) -> Self {
        Self { id, cells }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn column_count(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }
}

/// Row/column matrix of decoded text. When `has_header` is set the first row
/// is the header and is excluded from `data_rows`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    rows: Vec<RawRow>,
    has_header: bool,
}

impl RawTable {
    pub fn from_rows(lines: Vec<Vec<String>>, has_header: bool) -> Self {
        let rows = lines
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RawRow::new(RowId(i + 1), cells))
            .collect();
        Self { rows, has_header }
    }

    pub fn from_raw_rows(rows: Vec<RawRow>, has_header: bool) -> Self {
        Self { rows, has_header }
    }

    /// Reads delimited text. Ragged rows are kept as-is; length checks belong
    /// to whoever knows the header.
    pub fn from_reader<R: Read>(
        data: R,
        delimiter: u8,
        has_header: bool,
    ) -> Result<Self, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(rows.len() + 1);
            rows.push(RawRow::new(
                RowId(line),
                record.iter().map(str::to_string).collect(),
            ));
        }

        Ok(Self { rows, has_header })
    }

    pub fn from_text(text: &str, delimiter: u8, has_header: bool) -> Result<Self, ImportError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self::from_reader(text.as_bytes(), delimiter, has_header)
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn header_row(&self) -> Option<&RawRow> {
        if self.has_header {
            self.rows.first()
        } else {
            None
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.data_rows().len()
    }

    pub fn data_rows(&self) -> std::slice::Iter<'_, RawRow> {
        let skip = usize::from(self.has_header && !self.rows.is_empty());
        self.rows[skip..].iter()
    }

    pub fn into_rows(self) -> Vec<RawRow> {
        self.rows
    }
}
