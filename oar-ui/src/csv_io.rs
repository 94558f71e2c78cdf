//! CSV boundary
//!
//! The core works on parsed datasets and merged tables; this module owns
//! the text encoding in both directions using the csv crate. Uploads are
//! parsed strictly (ragged rows are errors), every cell is kept as a
//! string, and the header row becomes the column list.

use std::collections::HashMap;

use oar_core::dataset::{Dataset, Record};
use oar_core::export::TabularData;

/// Parse uploaded CSV bytes into a dataset.
pub fn read_dataset(bytes: &[u8]) -> Result<Dataset, csv::Error> {
    let mut reader = csv::Reader::from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let raw = result?;
        let mut values = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            values.insert(column.clone(), raw.get(i).unwrap_or("").to_string());
        }
        rows.push(Record::new(values));
    }
    Ok(Dataset::new(columns, rows))
}

/// Serialize a merged table to CSV bytes, header row first.
pub fn write_csv(table: &TabularData) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}
