use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::practice::PracticeService;
use crate::word_source::StorageWordSource;
use crate::wordlist_service::WordlistService;

/// Assembles the app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    practice: Arc<PracticeService>,
    wordlists: Arc<WordlistService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        shuffle: bool,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, shuffle))
    }

    /// Build services over in-memory storage.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, false)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, shuffle: bool) -> Self {
        let source = Arc::new(StorageWordSource::new(
            Arc::clone(&storage.wordlists),
            Arc::clone(&storage.words),
        ));
        let practice = Arc::new(
            PracticeService::new(source, Arc::clone(&storage.sessions)).with_shuffle(shuffle),
        );
        let wordlists = Arc::new(WordlistService::new(
            clock,
            Arc::clone(&storage.wordlists),
            Arc::clone(&storage.words),
        ));
        Self {
            practice,
            wordlists,
        }
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn wordlists(&self) -> Arc<WordlistService> {
        Arc::clone(&self.wordlists)
    }
}
