//! Annotation session state machine
//!
//! A `Session` owns the loaded dataset, one judgment slot per record, the
//! cursor, and the save lifecycle. All state is in memory; persistence and
//! transport are the service layer's problem.
//!
//! Judgment slots are `Option<Judgment>`: `None` until the operator stores
//! something for that record. Skipping stores an all-empty judgment, which
//! is how a visited-but-declined record stays distinguishable from one the
//! operator never touched.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::{Dataset, Record};
use crate::error::{Error, Result};
use crate::export::ExportArtifact;
use crate::rubric::RubricSchema;

/// The operator's input for one record.
///
/// Field keys are a deterministic function of the schema: every criterion,
/// flag key, and comment slot is always present, defaulting to empty or
/// false. Judgments can only be built through the schema-driven
/// constructors, so any two judgments from the same schema are directly
/// comparable field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Judgment {
    /// Criterion key to selected value (`""` = unanswered)
    ratings: BTreeMap<String, String>,
    /// `{subject}_{flag}` key to checked state
    flags: BTreeMap<String, bool>,
    /// Comment slot key to text
    comments: BTreeMap<String, String>,
}

impl Judgment {
    /// The all-empty judgment for `schema`.
    pub fn empty(schema: &RubricSchema) -> Self {
        Self::from_parts(schema, &HashMap::new(), &HashMap::new(), &HashMap::new())
    }

    /// Build a judgment from operator input, normalized against `schema`:
    /// keys the schema does not declare are dropped, keys the input does
    /// not mention default to empty or false.
    pub fn from_parts(
        schema: &RubricSchema,
        ratings: &HashMap<String, String>,
        flags: &HashMap<String, bool>,
        comments: &HashMap<String, String>,
    ) -> Self {
        let rating_map = schema
            .criteria
            .iter()
            .map(|c| {
                let value = ratings.get(&c.key).cloned().unwrap_or_default();
                (c.key.clone(), value)
            })
            .collect();
        let flag_map = schema
            .flag_keys()
            .into_iter()
            .map(|key| {
                let checked = flags.get(&key).copied().unwrap_or(false);
                (key, checked)
            })
            .collect();
        let comment_map = schema
            .comment_slots()
            .into_iter()
            .map(|key| {
                let text = comments.get(&key).cloned().unwrap_or_default();
                (key, text)
            })
            .collect();
        Self {
            ratings: rating_map,
            flags: flag_map,
            comments: comment_map,
        }
    }

    /// Selected value for a criterion key, `""` if unanswered or unknown.
    pub fn rating(&self, key: &str) -> &str {
        self.ratings.get(key).map(String::as_str).unwrap_or("")
    }

    /// Checked state for a `{subject}_{flag}` key, false if unknown.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Comment text for a slot key, `""` if empty or unknown.
    pub fn comment(&self, key: &str) -> &str {
        self.comments.get(key).map(String::as_str).unwrap_or("")
    }

    /// True when every criterion has a non-empty value.
    pub fn is_complete(&self) -> bool {
        !self.ratings.is_empty() && self.ratings.values().all(|v| !v.is_empty())
    }

    /// True when every field is empty or false.
    pub fn is_blank(&self) -> bool {
        self.ratings.values().all(|v| v.is_empty())
            && self.flags.values().all(|checked| !checked)
            && self.comments.values().all(|v| v.is_empty())
    }
}

/// Completeness classification of one record's judgment slot.
///
/// Derived on demand, never stored:
/// - `Complete`: a judgment is stored and every criterion is answered
/// - `Skipped`: a judgment is stored but not every criterion is answered
///   (this includes explicit skips, which store an all-empty judgment)
/// - `Untouched`: nothing was ever stored for the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgmentStatus {
    Complete,
    Skipped,
    Untouched,
}

/// Progress counters over all judgment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl Progress {
    pub fn untouched(&self) -> usize {
        self.total - self.completed - self.skipped
    }
}

/// One in-memory review pass over a dataset.
#[derive(Debug)]
pub struct Session {
    dataset: Dataset,
    schema: RubricSchema,
    slots: Vec<Option<Judgment>>,
    cursor: usize,
    source_name: Option<String>,
    export: Option<ExportArtifact>,
}

impl Session {
    /// Start a session over `dataset` judged by `schema`.
    ///
    /// Fails fast on an invalid schema, an empty dataset, or a dataset
    /// missing the schema's source columns, so a session with nothing to
    /// annotate is unrepresentable.
    pub fn new(dataset: Dataset, schema: RubricSchema) -> Result<Self> {
        schema.validate()?;
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let missing = dataset.missing_columns(&schema.required_columns());
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                missing,
                available: dataset.columns().to_vec(),
            });
        }
        let slots = vec![None; dataset.len()];
        info!(
            records = dataset.len(),
            rubric = %schema.name,
            "session created"
        );
        Ok(Self {
            dataset,
            schema,
            slots,
            cursor: 0,
            source_name: None,
            export: None,
        })
    }

    /// Remember the name of the uploaded file for display.
    pub fn set_source_name(&mut self, name: impl Into<String>) {
        self.source_name = Some(name.into());
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Number of records under review.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn schema(&self) -> &RubricSchema {
        &self.schema
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Cursor position and the record under it.
    pub fn current(&self) -> (usize, &Record) {
        (self.cursor, &self.dataset.rows()[self.cursor])
    }

    /// Stored judgment for a record, `None` while untouched.
    pub fn judgment(&self, index: usize) -> Option<&Judgment> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn slots(&self) -> &[Option<Judgment>] {
        &self.slots
    }

    /// Store `judgment` for record `index`, replacing any previous one
    /// wholly. Never merges.
    pub fn record(&mut self, index: usize, judgment: Judgment) -> Result<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = Some(judgment);
        debug!(index, "judgment stored");
        Ok(())
    }

    /// Mark record `index` as explicitly skipped: stores the all-empty
    /// judgment, discarding any previous input for the record.
    pub fn skip(&mut self, index: usize) -> Result<()> {
        let blank = Judgment::empty(&self.schema);
        self.record(index, blank)?;
        debug!(index, "record skipped");
        Ok(())
    }

    /// Move the cursor forward one record, clamped to the last index.
    /// Returns the new position.
    pub fn advance(&mut self) -> usize {
        if self.cursor + 1 < self.slots.len() {
            self.cursor += 1;
        }
        self.cursor
    }

    /// Move the cursor back one record, clamped to zero. Returns the new
    /// position.
    pub fn retreat(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }

    /// Classification of one record's slot.
    pub fn status(&self, index: usize) -> Option<JudgmentStatus> {
        self.slots.get(index).map(|slot| match slot {
            None => JudgmentStatus::Untouched,
            Some(j) if j.is_complete() => JudgmentStatus::Complete,
            Some(_) => JudgmentStatus::Skipped,
        })
    }

    /// Recount progress across every slot. O(N) and recomputed per call;
    /// nothing is cached, so it can never drift from the slots.
    pub fn progress(&self) -> Progress {
        let mut completed = 0;
        let mut skipped = 0;
        for slot in &self.slots {
            match slot {
                None => {}
                Some(j) if j.is_complete() => completed += 1,
                Some(_) => skipped += 1,
            }
        }
        Progress {
            completed,
            skipped,
            total: self.slots.len(),
        }
    }

    /// The stored export, once [`crate::export::finalize`] has run.
    pub fn saved(&self) -> Option<&ExportArtifact> {
        self.export.as_ref()
    }

    pub(crate) fn take_export(&mut self) -> Option<ExportArtifact> {
        self.export.take()
    }

    pub(crate) fn install_export(&mut self, artifact: ExportArtifact) -> &ExportArtifact {
        self.export.get_or_insert(artifact)
    }
}
