//! # OAR Core Library
//!
//! Domain logic for OAR, the single-operator annotation review tool:
//!
//! - **Dataset**: the parsed upload, an ordered column list plus records
//! - **Rubric**: the configurable judgment shape (criteria, issue flags,
//!   comment mode) and the export column layout derived from it
//! - **Session**: the in-memory state machine holding records, judgment
//!   slots, the cursor, and progress
//! - **Export**: the index-aligned merge of records with judgments and
//!   the at-most-once finalize
//!
//! Everything here is pure in-memory state. Parsing and serializing CSV
//! and all HTTP concerns live in the `oar-ui` service crate.

pub mod dataset;
pub mod error;
pub mod export;
pub mod rubric;
pub mod session;

pub use error::{Error, Result};
pub use session::{Judgment, JudgmentStatus, Progress, Session};
