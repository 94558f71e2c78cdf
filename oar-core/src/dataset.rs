//! Loaded dataset model
//!
//! A `Dataset` is the parsed form of an uploaded tabular file: an ordered
//! column list plus one `Record` per data row. Text encoding (CSV parsing
//! and serialization) lives at the service boundary; this module only
//! models the parsed shape.

use std::collections::HashMap;

use serde::Serialize;

/// One row of the dataset: column name to cell value.
///
/// Cells are always strings. Reading a column the record does not have
/// yields `""`, so downstream code never branches on missing cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Cell value for `column`, or `""` when absent.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

/// An immutable, ordered collection of records plus the column order they
/// were loaded with.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Column names in load order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of data rows (the header is not a row).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The subset of `required` this dataset does not provide, in the
    /// order given. Empty means all requirements are met.
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.columns.contains(c))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_cell_reads_as_empty_string() {
        let r = record(&[("UserQuestion", "What is recursion?")]);
        assert_eq!(r.get("UserQuestion"), "What is recursion?");
        assert_eq!(r.get("ModelAnswer"), "");
    }

    #[test]
    fn missing_columns_preserves_request_order() {
        let ds = Dataset::new(
            vec!["A".into(), "C".into()],
            vec![record(&[("A", "1"), ("C", "3")])],
        );
        let required = vec!["A".to_string(), "B".to_string(), "D".to_string()];
        assert_eq!(ds.missing_columns(&required), vec!["B", "D"]);
    }

    #[test]
    fn missing_columns_empty_when_satisfied() {
        let ds = Dataset::new(vec!["A".into(), "B".into()], vec![]);
        assert!(ds.missing_columns(&["A".to_string()]).is_empty());
        assert!(ds.is_empty());
        assert_eq!(ds.len(), 0);
    }
}
