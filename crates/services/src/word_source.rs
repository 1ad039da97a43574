use std::sync::Arc;

use async_trait::async_trait;
use drill_core::model::{WordId, WordPair, WordlistId};
use storage::repository::{StorageError, WordRepository, WordlistRepository};

use crate::error::WordSourceError;

/// Read access to the word pairs a practice session needs.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// All words of a wordlist, in presentation order.
    ///
    /// An existing but empty wordlist yields `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns `WordSourceError::WordlistNotFound` or `WordSourceError::StorageUnavailable`.
    async fn fetch_words(&self, wordlist_id: WordlistId) -> Result<Vec<WordPair>, WordSourceError>;

    /// Re-hydrate a single word from its ID.
    ///
    /// # Errors
    ///
    /// Returns `WordSourceError::WordNotFound` or `WordSourceError::StorageUnavailable`.
    async fn resolve_word(&self, id: WordId) -> Result<WordPair, WordSourceError>;
}

/// `WordSource` backed by the storage repositories.
#[derive(Clone)]
pub struct StorageWordSource {
    wordlists: Arc<dyn WordlistRepository>,
    words: Arc<dyn WordRepository>,
}

impl StorageWordSource {
    #[must_use]
    pub fn new(wordlists: Arc<dyn WordlistRepository>, words: Arc<dyn WordRepository>) -> Self {
        Self { wordlists, words }
    }
}

fn unavailable(err: StorageError) -> WordSourceError {
    tracing::warn!(error = %err, "word storage call failed");
    WordSourceError::StorageUnavailable(err)
}

#[async_trait]
impl WordSource for StorageWordSource {
    async fn fetch_words(&self, wordlist_id: WordlistId) -> Result<Vec<WordPair>, WordSourceError> {
        self.wordlists
            .get_wordlist(wordlist_id)
            .await
            .map_err(unavailable)?
            .ok_or(WordSourceError::WordlistNotFound { wordlist_id })?;

        self.words
            .words_for_list(wordlist_id)
            .await
            .map_err(unavailable)
    }

    async fn resolve_word(&self, id: WordId) -> Result<WordPair, WordSourceError> {
        self.words
            .get_word(id)
            .await
            .map_err(unavailable)?
            .ok_or(WordSourceError::WordNotFound { word_id: id })
    }
}
