use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drill_core::model::{SessionKey, WordId, WordPair, WordPairDraft, Wordlist, WordlistId};
use drill_core::practice::PracticeSessionRecord;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a wordlist; the id is assigned by storage.
#[derive(Debug, Clone)]
pub struct NewWordlistRecord {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Repository contract for wordlists.
#[async_trait]
pub trait WordlistRepository: Send + Sync {
    /// Insert a new wordlist and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the wordlist cannot be stored.
    async fn insert_new_wordlist(&self, record: NewWordlistRecord)
    -> Result<WordlistId, StorageError>;

    /// Fetch a wordlist by ID, with its current word count.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures; a missing list is `Ok(None)`.
    async fn get_wordlist(&self, id: WordlistId) -> Result<Option<Wordlist>, StorageError>;

    /// List wordlists ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn list_wordlists(&self, limit: u32) -> Result<Vec<Wordlist>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the wordlist does not exist.
    async fn rename_wordlist(&self, id: WordlistId, name: &str) -> Result<(), StorageError>;

    /// Delete a wordlist together with its words.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the wordlist does not exist.
    async fn delete_wordlist(&self, id: WordlistId) -> Result<(), StorageError>;
}

/// Repository contract for word pairs.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Insert drafts into a wordlist, returning the new IDs in input order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the wordlist does not exist.
    async fn insert_words(
        &self,
        wordlist_id: WordlistId,
        drafts: &[WordPairDraft],
    ) -> Result<Vec<WordId>, StorageError>;

    /// All words of a wordlist ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn words_for_list(&self, wordlist_id: WordlistId) -> Result<Vec<WordPair>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` for backend failures; a missing word is `Ok(None)`.
    async fn get_word(&self, id: WordId) -> Result<Option<WordPair>, StorageError>;

    /// Insert or update words by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an ID already belongs to another wordlist.
    async fn upsert_words(&self, words: &[WordPair]) -> Result<(), StorageError>;

    /// Delete the given words from a wordlist. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn delete_words(&self, wordlist_id: WordlistId, ids: &[WordId])
    -> Result<(), StorageError>;
}

/// Opaque key-value store for in-progress practice sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored payload cannot be decoded.
    async fn load_session(
        &self,
        key: &SessionKey,
    ) -> Result<Option<PracticeSessionRecord>, StorageError>;

    /// Store `record` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_session(
        &self,
        key: &SessionKey,
        record: &PracticeSessionRecord,
    ) -> Result<(), StorageError>;

    /// Remove the record under `key`. Clearing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn clear_session(&self, key: &SessionKey) -> Result<(), StorageError>;
}

pub(crate) fn encode_session(record: &PracticeSessionRecord) -> Result<String, StorageError> {
    serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode_session(payload: &str) -> Result<PracticeSessionRecord, StorageError> {
    serde_json::from_str(payload).map_err(|e| StorageError::Serialization(e.to_string()))
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct StoredWordlist {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    wordlists: BTreeMap<WordlistId, StoredWordlist>,
    words: BTreeMap<WordId, WordPair>,
    sessions: HashMap<SessionKey, String>,
    last_wordlist_id: u64,
    last_word_id: u64,
}

impl MemoryState {
    fn wordlist(&self, id: WordlistId) -> Result<Option<Wordlist>, StorageError> {
        let Some(stored) = self.wordlists.get(&id) else {
            return Ok(None);
        };
        let count = self.words.values().filter(|w| w.wordlist_id() == id).count();
        let count = u32::try_from(count)
            .map_err(|_| StorageError::Serialization("word count overflow".into()))?;
        Wordlist::new(id, &stored.name, stored.created_at, count)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl WordlistRepository for InMemoryRepository {
    async fn insert_new_wordlist(
        &self,
        record: NewWordlistRecord,
    ) -> Result<WordlistId, StorageError> {
        let mut guard = self.lock()?;
        guard.last_wordlist_id += 1;
        let id = WordlistId::new(guard.last_wordlist_id);
        guard.wordlists.insert(
            id,
            StoredWordlist {
                name: record.name,
                created_at: record.created_at,
            },
        );
        Ok(id)
    }

    async fn get_wordlist(&self, id: WordlistId) -> Result<Option<Wordlist>, StorageError> {
        self.lock()?.wordlist(id)
    }

    async fn list_wordlists(&self, limit: u32) -> Result<Vec<Wordlist>, StorageError> {
        let guard = self.lock()?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut lists = Vec::new();
        for id in guard.wordlists.keys().take(limit) {
            if let Some(list) = guard.wordlist(*id)? {
                lists.push(list);
            }
        }
        Ok(lists)
    }

    async fn rename_wordlist(&self, id: WordlistId, name: &str) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let stored = guard.wordlists.get_mut(&id).ok_or(StorageError::NotFound)?;
        name.clone_into(&mut stored.name);
        Ok(())
    }

    async fn delete_wordlist(&self, id: WordlistId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.wordlists.remove(&id).ok_or(StorageError::NotFound)?;
        guard.words.retain(|_, w| w.wordlist_id() != id);
        Ok(())
    }
}

#[async_trait]
impl WordRepository for InMemoryRepository {
    async fn insert_words(
        &self,
        wordlist_id: WordlistId,
        drafts: &[WordPairDraft],
    ) -> Result<Vec<WordId>, StorageError> {
        let mut guard = self.lock()?;
        if !guard.wordlists.contains_key(&wordlist_id) {
            return Err(StorageError::NotFound);
        }
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            guard.last_word_id += 1;
            let id = WordId::new(guard.last_word_id);
            guard.words.insert(id, draft.clone().assign_id(id, wordlist_id));
            ids.push(id);
        }
        Ok(ids)
    }

    async fn words_for_list(&self, wordlist_id: WordlistId) -> Result<Vec<WordPair>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .words
            .values()
            .filter(|w| w.wordlist_id() == wordlist_id)
            .cloned()
            .collect())
    }

    async fn get_word(&self, id: WordId) -> Result<Option<WordPair>, StorageError> {
        Ok(self.lock()?.words.get(&id).cloned())
    }

    async fn upsert_words(&self, words: &[WordPair]) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        for word in words {
            if !guard.wordlists.contains_key(&word.wordlist_id()) {
                return Err(StorageError::NotFound);
            }
            if let Some(existing) = guard.words.get(&word.id()) {
                if existing.wordlist_id() != word.wordlist_id() {
                    return Err(StorageError::Conflict);
                }
            }
        }
        for word in words {
            guard.last_word_id = guard.last_word_id.max(word.id().value());
            guard.words.insert(word.id(), word.clone());
        }
        Ok(())
    }

    async fn delete_words(
        &self,
        wordlist_id: WordlistId,
        ids: &[WordId],
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .words
            .retain(|id, w| !(w.wordlist_id() == wordlist_id && ids.contains(id)));
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn load_session(
        &self,
        key: &SessionKey,
    ) -> Result<Option<PracticeSessionRecord>, StorageError> {
        let guard = self.lock()?;
        guard.sessions.get(key).map(|p| decode_session(p)).transpose()
    }

    async fn save_session(
        &self,
        key: &SessionKey,
        record: &PracticeSessionRecord,
    ) -> Result<(), StorageError> {
        let payload = encode_session(record)?;
        self.lock()?.sessions.insert(key.clone(), payload);
        Ok(())
    }

    async fn clear_session(&self, key: &SessionKey) -> Result<(), StorageError> {
        self.lock()?.sessions.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub wordlists: Arc<dyn WordlistRepository>,
    pub words: Arc<dyn WordRepository>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            wordlists: Arc::new(repo.clone()),
            words: Arc::new(repo.clone()),
            sessions: Arc::new(repo),
        }
    }
}
