use thiserror::Error;

use crate::model::ids::{WordId, WordlistId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("prompt side of a word pair cannot be empty")]
    EmptySideA,

    #[error("answer side of a word pair cannot be empty")]
    EmptySideB,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// A word pair that has not been stored yet.
///
/// Both sides are trimmed on construction and must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPairDraft {
    side_a: String,
    side_b: String,
}

impl WordPairDraft {
    /// Validate and trim both sides of a pair.
    ///
    /// # Errors
    ///
    /// Returns `WordError::EmptySideA` or `WordError::EmptySideB` when a side is blank.
    pub fn new(side_a: impl AsRef<str>, side_b: impl AsRef<str>) -> Result<Self, WordError> {
        let side_a = side_a.as_ref().trim();
        let side_b = side_b.as_ref().trim();
        if side_a.is_empty() {
            return Err(WordError::EmptySideA);
        }
        if side_b.is_empty() {
            return Err(WordError::EmptySideB);
        }
        Ok(Self {
            side_a: side_a.to_owned(),
            side_b: side_b.to_owned(),
        })
    }

    #[must_use]
    pub fn side_a(&self) -> &str {
        &self.side_a
    }

    #[must_use]
    pub fn side_b(&self) -> &str {
        &self.side_b
    }

    /// Attach storage-assigned identifiers.
    #[must_use]
    pub fn assign_id(self, id: WordId, wordlist_id: WordlistId) -> WordPair {
        WordPair {
            id,
            wordlist_id,
            side_a: self.side_a,
            side_b: self.side_b,
        }
    }
}

//
// ─── WORD PAIR ─────────────────────────────────────────────────────────────────
//

/// One translation entry of a wordlist.
///
/// `side_a` is shown as the prompt, `side_b` is the expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    id: WordId,
    wordlist_id: WordlistId,
    side_a: String,
    side_b: String,
}

impl WordPair {
    /// Rehydrate a stored word pair.
    ///
    /// Stored text is taken as-is so that legacy rows with stray whitespace
    /// still load; answer comparison normalizes both sides anyway.
    #[must_use]
    pub fn from_persisted(
        id: WordId,
        wordlist_id: WordlistId,
        side_a: impl Into<String>,
        side_b: impl Into<String>,
    ) -> Self {
        Self {
            id,
            wordlist_id,
            side_a: side_a.into(),
            side_b: side_b.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn wordlist_id(&self) -> WordlistId {
        self.wordlist_id
    }

    #[must_use]
    pub fn side_a(&self) -> &str {
        &self.side_a
    }

    #[must_use]
    pub fn side_b(&self) -> &str {
        &self.side_b
    }

    /// Replace both sides with the contents of a validated draft.
    #[must_use]
    pub fn with_sides(self, draft: WordPairDraft) -> Self {
        Self {
            side_a: draft.side_a,
            side_b: draft.side_b,
            ..self
        }
    }
}
