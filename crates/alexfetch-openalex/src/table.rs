//! Result collections: ordered rows with a union-of-keys column set

use std::collections::HashSet;

use serde_json::Value;

use crate::page::Record;

/// Column naming the seed work a row was fetched for
pub const PROVENANCE_COLUMN: &str = "original_work";

/// Ordered records plus the union of their keys.
///
/// Columns appear in first-seen order. Rows are kept exactly as fetched:
/// no deduplication, no reordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    seen: HashSet<String>,
    rows: Vec<Record>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::new();
        table.extend(records);
        table
    }

    /// Concatenate tables in iteration order
    pub fn concat(tables: impl IntoIterator<Item = RecordTable>) -> Self {
        let mut out = Self::new();
        for table in tables {
            for column in &table.columns {
                out.add_column(column);
            }
            out.rows.extend(table.rows);
        }
        out
    }

    pub fn push(&mut self, record: Record) {
        for key in record.keys() {
            if !self.seen.contains(key) {
                self.seen.insert(key.clone());
                self.columns.push(key.clone());
            }
        }
        self.rows.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.push(record);
        }
    }

    /// Set `column` to `value` on every row, adding the column even when
    /// the table has no rows.
    pub fn tag(&mut self, column: &str, value: Value) {
        self.add_column(column);
        for row in &mut self.rows {
            row.insert(column.to_string(), value.clone());
        }
    }

    fn add_column(&mut self, column: &str) {
        if self.seen.insert(column.to_string()) {
            self.columns.push(column.to_string());
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, `None` where a row lacks the key
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}
