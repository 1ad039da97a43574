use std::collections::BTreeSet;
use std::sync::Arc;

use drill_core::model::{WordId, WordPair, WordPairDraft, Wordlist, WordlistId, validate_name};
use storage::repository::{NewWordlistRecord, StorageError, WordRepository, WordlistRepository};

use crate::Clock;
use crate::error::WordlistServiceError;
use crate::form::WordRow;

/// A wordlist together with its words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistDetails {
    pub wordlist: Wordlist,
    pub words: Vec<WordPair>,
}

/// What an edit changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub updated: usize,
    pub inserted: usize,
    pub deleted: usize,
}

/// Orchestrates wordlist creation, editing, and removal.
#[derive(Clone)]
pub struct WordlistService {
    clock: Clock,
    wordlists: Arc<dyn WordlistRepository>,
    words: Arc<dyn WordRepository>,
}

impl WordlistService {
    #[must_use]
    pub fn new(
        clock: Clock,
        wordlists: Arc<dyn WordlistRepository>,
        words: Arc<dyn WordRepository>,
    ) -> Self {
        Self {
            clock,
            wordlists,
            words,
        }
    }

    /// Create a wordlist with its initial word pairs.
    ///
    /// # Errors
    ///
    /// Returns `WordlistServiceError::Wordlist` for a blank name,
    /// `WordlistServiceError::NoWordPairs` if `pairs` is empty,
    /// or `WordlistServiceError::Storage` if persistence fails.
    pub async fn create_wordlist(
        &self,
        name: &str,
        pairs: &[WordPairDraft],
    ) -> Result<WordlistId, WordlistServiceError> {
        let name = validate_name(name)?;
        if pairs.is_empty() {
            return Err(WordlistServiceError::NoWordPairs);
        }

        let wordlist_id = self
            .wordlists
            .insert_new_wordlist(NewWordlistRecord {
                name: name.clone(),
                created_at: self.clock.now(),
            })
            .await?;

        if let Err(err) = self.words.insert_words(wordlist_id, pairs).await {
            tracing::warn!(%wordlist_id, error = %err, "word insert failed, removing new wordlist");
            if let Err(cleanup) = self.wordlists.delete_wordlist(wordlist_id).await {
                tracing::warn!(%wordlist_id, error = %cleanup, "could not remove partial wordlist");
            }
            return Err(err.into());
        }

        tracing::info!(%wordlist_id, %name, words = pairs.len(), "wordlist created");
        Ok(wordlist_id)
    }

    /// List wordlists ordered by ID, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `WordlistServiceError::Storage` if repository access fails.
    pub async fn list_wordlists(&self, limit: u32) -> Result<Vec<Wordlist>, WordlistServiceError> {
        Ok(self.wordlists.list_wordlists(limit).await?)
    }

    /// Fetch a wordlist and its words.
    ///
    /// # Errors
    ///
    /// Returns `WordlistServiceError::WordlistNotFound` if it does not exist.
    pub async fn get_wordlist(
        &self,
        wordlist_id: WordlistId,
    ) -> Result<WordlistDetails, WordlistServiceError> {
        let wordlist = self
            .wordlists
            .get_wordlist(wordlist_id)
            .await?
            .ok_or(WordlistServiceError::WordlistNotFound { wordlist_id })?;
        let words = self.words.words_for_list(wordlist_id).await?;
        Ok(WordlistDetails { wordlist, words })
    }

    /// Rename a wordlist and replace its words with `rows`.
    ///
    /// Rows with an ID update that word, rows without one become new words,
    /// and stored words missing from `rows` are deleted.
    ///
    /// All rows are checked before anything is written. The writes are
    /// separate storage calls (rename, update, insert, delete, in that order),
    /// so a storage failure partway leaves the earlier steps applied and the
    /// stale words in place.
    ///
    /// # Errors
    ///
    /// Returns `WordlistServiceError::WordlistNotFound`, `NoWordPairs`,
    /// `WordNotInList` for an ID from another list, `DuplicateWord` for an ID
    /// given twice, or storage errors.
    pub async fn edit_wordlist(
        &self,
        wordlist_id: WordlistId,
        name: &str,
        rows: Vec<WordRow>,
    ) -> Result<EditSummary, WordlistServiceError> {
        let name = validate_name(name)?;
        if rows.is_empty() {
            return Err(WordlistServiceError::NoWordPairs);
        }
        let existing = self.get_wordlist(wordlist_id).await?.words;

        let mut updates = Vec::new();
        let mut inserts = Vec::new();
        let mut submitted = BTreeSet::new();
        for row in rows {
            match row.id {
                Some(word_id) => {
                    let word = existing
                        .iter()
                        .find(|w| w.id() == word_id)
                        .ok_or(WordlistServiceError::WordNotInList {
                            word_id,
                            wordlist_id,
                        })?;
                    if !submitted.insert(word_id) {
                        return Err(WordlistServiceError::DuplicateWord { word_id });
                    }
                    updates.push(word.clone().with_sides(row.draft));
                }
                None => inserts.push(row.draft),
            }
        }
        let removed: Vec<WordId> = existing
            .iter()
            .map(WordPair::id)
            .filter(|id| !submitted.contains(id))
            .collect();

        self.wordlists
            .rename_wordlist(wordlist_id, &name)
            .await
            .map_err(|e| not_found_as(e, wordlist_id))?;
        if !updates.is_empty() {
            self.words.upsert_words(&updates).await?;
        }
        if !inserts.is_empty() {
            self.words.insert_words(wordlist_id, &inserts).await?;
        }
        if !removed.is_empty() {
            self.words.delete_words(wordlist_id, &removed).await?;
        }

        let summary = EditSummary {
            updated: updates.len(),
            inserted: inserts.len(),
            deleted: removed.len(),
        };
        tracing::info!(%wordlist_id, ?summary, "wordlist edited");
        Ok(summary)
    }

    /// Delete a wordlist and its words.
    ///
    /// # Errors
    ///
    /// Returns `WordlistServiceError::WordlistNotFound` if it does not exist.
    pub async fn delete_wordlist(&self, wordlist_id: WordlistId) -> Result<(), WordlistServiceError> {
        self.wordlists
            .delete_wordlist(wordlist_id)
            .await
            .map_err(|e| not_found_as(e, wordlist_id))?;
        tracing::info!(%wordlist_id, "wordlist deleted");
        Ok(())
    }
}

fn not_found_as(err: StorageError, wordlist_id: WordlistId) -> WordlistServiceError {
    match err {
        StorageError::NotFound => WordlistServiceError::WordlistNotFound { wordlist_id },
        other => WordlistServiceError::Storage(other),
    }
}
