use serde::{Deserialize, Serialize};

use crate::model::{WordId, WordlistId};

use super::session::{PracticeError, PracticeSession};

/// Persisted shape of a practice session.
///
/// Field names are part of the stored format and must not change:
/// `{"wordlistId", "queue", "missedQueue", "cursor", "retryCount"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PracticeSessionRecord {
    pub wordlist_id: u64,
    pub queue: Vec<u64>,
    pub missed_queue: Vec<u64>,
    pub cursor: u64,
    pub retry_count: u8,
}

impl PracticeSessionRecord {
    #[must_use]
    pub fn from_session(session: &PracticeSession) -> Self {
        Self {
            wordlist_id: session.wordlist_id().value(),
            queue: session.queue().iter().map(WordId::value).collect(),
            missed_queue: session.missed().iter().map(WordId::value).collect(),
            cursor: session.cursor() as u64,
            retry_count: session.retry_count(),
        }
    }

    /// Convert the record back into a session, validating every invariant.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InvalidSessionRecord` if the record is inconsistent.
    pub fn into_session(self) -> Result<PracticeSession, PracticeError> {
        let cursor = usize::try_from(self.cursor).map_err(|_| {
            PracticeError::InvalidSessionRecord(format!("cursor {} overflows", self.cursor))
        })?;
        PracticeSession::from_parts(
            WordlistId::new(self.wordlist_id),
            self.queue.into_iter().map(WordId::new).collect(),
            self.missed_queue.into_iter().map(WordId::new).collect(),
            cursor,
            self.retry_count,
        )
    }
}

impl From<&PracticeSession> for PracticeSessionRecord {
    fn from(session: &PracticeSession) -> Self {
        Self::from_session(session)
    }
}

impl TryFrom<PracticeSessionRecord> for PracticeSession {
    type Error = PracticeError;

    fn try_from(record: PracticeSessionRecord) -> Result<Self, Self::Error> {
        record.into_session()
    }
}
