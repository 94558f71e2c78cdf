//! Export merge: original columns joined with judgment columns
//!
//! Builds one output row per record: the dataset's columns in load order,
//! then the schema-derived judgment columns. The join is a strict
//! index-aligned zip; a length mismatch between records and judgment
//! slots is an invariant violation and fails fast instead of truncating
//! or padding.
//!
//! `finalize` is the at-most-once save: the first call builds and stores
//! the merged table on the session, every later call returns the stored
//! artifact untouched.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::rubric::JudgmentField;
use crate::session::{Judgment, Session};

/// Cell values for exported issue flags.
const FLAG_TRUE: &str = "True";
const FLAG_FALSE: &str = "False";

/// A fully merged, ready-to-serialize table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The stored result of a finalized save.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Base filename the operator chose, without extension
    pub filename: String,
    pub table: TabularData,
}

/// Merge the session's records with its judgments.
///
/// Untouched records contribute schema defaults: empty strings for values
/// and comments, `False` for flags.
pub fn build_table(session: &Session) -> Result<TabularData> {
    let dataset = session.dataset();
    let slots = session.slots();
    if dataset.len() != slots.len() {
        return Err(Error::ShapeMismatch {
            records: dataset.len(),
            judgments: slots.len(),
        });
    }

    let schema = session.schema();
    let layout = schema.judgment_layout();
    let blank = Judgment::empty(schema);

    let mut columns: Vec<String> = dataset.columns().to_vec();
    columns.extend(layout.iter().map(|spec| spec.name.clone()));

    let mut rows = Vec::with_capacity(dataset.len());
    for (record, slot) in dataset.rows().iter().zip(slots) {
        let judgment = slot.as_ref().unwrap_or(&blank);
        let mut row: Vec<String> = dataset
            .columns()
            .iter()
            .map(|c| record.get(c).to_string())
            .collect();
        for spec in &layout {
            let cell = match &spec.field {
                JudgmentField::Rating(key) => judgment.rating(key).to_string(),
                JudgmentField::Flag(key) => {
                    if judgment.flag(key) { FLAG_TRUE } else { FLAG_FALSE }.to_string()
                }
                JudgmentField::Comment(key) => judgment.comment(key).to_string(),
            };
            row.push(cell);
        }
        rows.push(row);
    }

    debug!(
        rows = rows.len(),
        columns = columns.len(),
        "export table built"
    );
    Ok(TabularData { columns, rows })
}

/// Finalize the session's export at most once.
///
/// The first call merges the current judgments and stores the result under
/// `filename` (kept verbatim, extension is the caller's concern). Any
/// later call returns the stored artifact unchanged, whatever filename it
/// is given and however the judgments moved since.
pub fn finalize<'a>(session: &'a mut Session, filename: &str) -> Result<&'a ExportArtifact> {
    let artifact = match session.take_export() {
        Some(existing) => {
            debug!(
                requested = filename,
                stored = %existing.filename,
                "finalize on a saved session; keeping the original export"
            );
            existing
        }
        None => {
            let table = build_table(session)?;
            info!(filename, rows = table.rows.len(), "session finalized");
            ExportArtifact {
                filename: filename.to_string(),
                table,
            }
        }
    };
    Ok(session.install_export(artifact))
}
