//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{WordId, WordlistError, WordlistId};
use drill_core::practice::PracticeError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `WordSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordSourceError {
    #[error("wordlist {wordlist_id} not found")]
    WordlistNotFound { wordlist_id: WordlistId },
    #[error("word {word_id} not found")]
    WordNotFound { word_id: WordId },
    #[error("word storage unavailable")]
    StorageUnavailable(#[source] StorageError),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeServiceError {
    #[error(transparent)]
    Practice(#[from] PracticeError),
    #[error(transparent)]
    Source(#[from] WordSourceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PracticeServiceError {
    /// True when the caller should restart practice rather than retry.
    #[must_use]
    pub fn is_no_active_session(&self) -> bool {
        matches!(self, Self::Practice(PracticeError::NoActiveSession))
    }
}

/// Errors emitted by `WordlistService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordlistServiceError {
    #[error(transparent)]
    Wordlist(#[from] WordlistError),
    #[error("at least one word pair is required")]
    NoWordPairs,
    #[error("wordlist {wordlist_id} not found")]
    WordlistNotFound { wordlist_id: WordlistId },
    #[error("word {word_id} does not belong to wordlist {wordlist_id}")]
    WordNotInList {
        word_id: WordId,
        wordlist_id: WordlistId,
    },
    #[error("word {word_id} appears in more than one row")]
    DuplicateWord { word_id: WordId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
