//! Rubric schema: the configurable shape of a judgment
//!
//! A `RubricSchema` describes what the operator is asked for on each
//! record: an ordered list of criteria (single-answer ratings or pairwise
//! choices), optional boolean issue flags applied per compared answer,
//! and where free-text comments live. Completeness classification and the
//! export column layout are both derived from the schema, so adding a
//! rubric variant never touches the session or exporter logic.
//!
//! Schemas deserialize from TOML, which is how custom rubric files are
//! loaded at startup.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical pairwise choice values, stored and exported verbatim.
pub const PAIRWISE_FIRST: &str = "LLM_1";
pub const PAIRWISE_SECOND: &str = "LLM_2";
pub const PAIRWISE_NO_PREF: &str = "NO_PREF";

/// Key of the single comment slot in [`CommentMode::Global`] schemas.
/// Doubles as the export column name.
pub const GLOBAL_COMMENT_KEY: &str = "Comments";

/// One selectable option of a rating criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingOption {
    /// Stored and exported value
    pub value: String,
    /// Operator-facing label
    pub label: String,
}

impl RatingOption {
    /// Option whose label is its value.
    pub fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// What kind of answer a criterion collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionKind {
    /// Pick one option for a single answer
    Rating { options: Vec<RatingOption> },
    /// Prefer the first answer, the second, or neither
    Pairwise,
}

/// One required criterion of the rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Identifier used in judgment maps and derived column names
    pub key: String,
    /// Operator-facing heading
    pub label: String,
    /// Optional prompt shown under the heading
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl Criterion {
    /// Export column holding this criterion's value: `{key}_rating` for
    /// ratings, `{key}_winner` for pairwise choices.
    pub fn value_column(&self) -> String {
        match self.kind {
            CriterionKind::Rating { .. } => format!("{}_rating", self.key),
            CriterionKind::Pairwise => format!("{}_winner", self.key),
        }
    }

    /// Export column holding this criterion's comment (per-criterion mode).
    pub fn comment_column(&self) -> String {
        format!("{}_comment", self.key)
    }
}

/// A boolean issue flag, asked once per issue subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFlag {
    pub key: String,
    pub label: String,
}

/// Where free-text comments live in a judgment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentMode {
    /// No comment fields
    #[default]
    None,
    /// One shared comment per record, exported as `Comments`
    Global,
    /// One comment per criterion, exported as `{key}_comment`
    PerCriterion,
}

/// The judgment field a schema-derived export column reads.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgmentField {
    /// Rating or pairwise value, keyed by criterion key
    Rating(String),
    /// Issue flag, keyed by `{subject}_{flag}`
    Flag(String),
    /// Comment slot, keyed by criterion key or [`GLOBAL_COMMENT_KEY`]
    Comment(String),
}

/// One schema-derived export column and the judgment field it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub field: JudgmentField,
}

/// The judgment shape for one review variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricSchema {
    /// Preset or schema file name, surfaced in the UI and logs
    pub name: String,
    /// Dataset column holding the user question
    pub question_column: String,
    /// Dataset column(s) holding the answer(s) under review; one for
    /// single-answer rubrics, two for pairwise comparison
    pub answer_columns: Vec<String>,
    /// Ordered criteria; every one must be answered for completeness
    pub criteria: Vec<Criterion>,
    /// Issue flags, empty when the rubric has none
    #[serde(default)]
    pub issue_flags: Vec<IssueFlag>,
    /// Subjects the issue flags are asked for (e.g. `LLM_1`, `LLM_2`)
    #[serde(default)]
    pub issue_subjects: Vec<String>,
    #[serde(default)]
    pub comment: CommentMode,
}

impl RubricSchema {
    /// Dataset columns this schema requires: the question column followed
    /// by the answer column(s).
    pub fn required_columns(&self) -> Vec<String> {
        let mut cols = vec![self.question_column.clone()];
        cols.extend(self.answer_columns.iter().cloned());
        cols
    }

    /// Issue flag keys in export order, subject-major:
    /// every flag for the first subject, then every flag for the next.
    pub fn flag_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.issue_subjects.len() * self.issue_flags.len());
        for subject in &self.issue_subjects {
            for flag in &self.issue_flags {
                keys.push(format!("{}_{}", subject, flag.key));
            }
        }
        keys
    }

    /// Comment slot keys: one per criterion in per-criterion mode, the
    /// single global slot in global mode, none otherwise.
    pub fn comment_slots(&self) -> Vec<String> {
        match self.comment {
            CommentMode::None => Vec::new(),
            CommentMode::Global => vec![GLOBAL_COMMENT_KEY.to_string()],
            CommentMode::PerCriterion => self.criteria.iter().map(|c| c.key.clone()).collect(),
        }
    }

    /// Schema-derived export columns in order: each criterion's value
    /// column (immediately followed by its comment column in per-criterion
    /// mode), then the issue flag columns, then the global comment column.
    ///
    /// This is the single source of truth for the export tail; the
    /// exporter walks it to emit both the header and every row.
    pub fn judgment_layout(&self) -> Vec<ColumnSpec> {
        let mut layout = Vec::new();
        for criterion in &self.criteria {
            layout.push(ColumnSpec {
                name: criterion.value_column(),
                field: JudgmentField::Rating(criterion.key.clone()),
            });
            if self.comment == CommentMode::PerCriterion {
                layout.push(ColumnSpec {
                    name: criterion.comment_column(),
                    field: JudgmentField::Comment(criterion.key.clone()),
                });
            }
        }
        for key in self.flag_keys() {
            layout.push(ColumnSpec {
                name: key.clone(),
                field: JudgmentField::Flag(key),
            });
        }
        if self.comment == CommentMode::Global {
            layout.push(ColumnSpec {
                name: GLOBAL_COMMENT_KEY.to_string(),
                field: JudgmentField::Comment(GLOBAL_COMMENT_KEY.to_string()),
            });
        }
        layout
    }

    /// Column names of [`Self::judgment_layout`].
    pub fn judgment_columns(&self) -> Vec<String> {
        self.judgment_layout().into_iter().map(|c| c.name).collect()
    }

    /// Structural validation. Sessions refuse to start on a schema that
    /// fails here, so the session and exporter can rely on these holding.
    pub fn validate(&self) -> Result<()> {
        if self.criteria.is_empty() {
            return Err(Error::InvalidSchema(
                "schema declares no criteria".to_string(),
            ));
        }
        if self.answer_columns.is_empty() || self.answer_columns.len() > 2 {
            return Err(Error::InvalidSchema(format!(
                "expected 1 or 2 answer columns, got {}",
                self.answer_columns.len()
            )));
        }
        let mut seen = Vec::with_capacity(self.criteria.len());
        for criterion in &self.criteria {
            if criterion.key.is_empty() {
                return Err(Error::InvalidSchema(
                    "criterion with empty key".to_string(),
                ));
            }
            if seen.contains(&&criterion.key) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate criterion key: {}",
                    criterion.key
                )));
            }
            seen.push(&criterion.key);
            match &criterion.kind {
                CriterionKind::Rating { options } if options.is_empty() => {
                    return Err(Error::InvalidSchema(format!(
                        "criterion {} has no rating options",
                        criterion.key
                    )));
                }
                CriterionKind::Pairwise if self.answer_columns.len() != 2 => {
                    return Err(Error::InvalidSchema(format!(
                        "pairwise criterion {} requires two answer columns",
                        criterion.key
                    )));
                }
                _ => {}
            }
        }
        if !self.issue_flags.is_empty() && self.issue_subjects.is_empty() {
            return Err(Error::InvalidSchema(
                "issue flags declared without issue subjects".to_string(),
            ));
        }
        Ok(())
    }
}
