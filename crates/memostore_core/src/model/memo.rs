//! Memo domain record.
//!
//! # Responsibility
//! - Define the single persisted entity: an integer identity plus bounded text.
//! - Provide the validation entry points used by every write path.
//!
//! # Invariants
//! - `id` is assigned by the backing store and immutable afterwards.
//! - `text` is non-empty and at most [`MEMO_TEXT_MAX_CHARS`] characters.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identity assigned by the backing store.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemoId = i64;

/// Upper bound on memo text length, counted in characters.
pub const MEMO_TEXT_MAX_CHARS: usize = 200;

/// Canonical persisted record.
///
/// `id` is `None` for a record that has not reached storage yet; the store
/// assigns the identity on first insert and the field never changes after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    /// Store-assigned identity, absent before first persistence.
    pub id: Option<MemoId>,
    /// Memo body, bounded by [`MEMO_TEXT_MAX_CHARS`].
    pub text: String,
}

impl Memo {
    /// Creates a memo that has not been persisted yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    /// Creates a memo carrying an already-known identity.
    ///
    /// Used by read paths and by upsert callers that address an existing row.
    pub fn with_id(id: MemoId, text: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
        }
    }

    /// Returns whether this memo has been through the store at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks the record against the text rules.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        Self::validate_text(&self.text)
    }

    /// Checks a candidate text value against the storage rules.
    ///
    /// Shared by full-record writes and the targeted text update so both
    /// paths enforce the identical bound.
    pub fn validate_text(text: &str) -> Result<(), MemoValidationError> {
        if text.is_empty() {
            return Err(MemoValidationError::EmptyText);
        }
        let length = text.chars().count();
        if length > MEMO_TEXT_MAX_CHARS {
            return Err(MemoValidationError::TextTooLong { length });
        }
        Ok(())
    }
}

/// Validation failures for memo records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoValidationError {
    /// Text is required and must not be empty.
    EmptyText,
    /// Text exceeds [`MEMO_TEXT_MAX_CHARS`] characters.
    TextTooLong { length: usize },
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "memo text cannot be empty"),
            Self::TextTooLong { length } => write!(
                f,
                "memo text is {length} characters, limit is {MEMO_TEXT_MAX_CHARS}"
            ),
        }
    }
}

impl Error for MemoValidationError {}
