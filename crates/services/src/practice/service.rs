use std::sync::Arc;

use drill_core::model::{SessionKey, WordlistId};
use drill_core::practice::{
    PassEvent, PracticeError, PracticePrompt, PracticeSession, PracticeSessionRecord, Progress,
    SessionPhase, SubmissionResult, answer_from_bytes,
};
use rand::seq::SliceRandom;
use storage::repository::{SessionStore, StorageError};

use crate::error::{PracticeServiceError, WordSourceError};
use crate::word_source::WordSource;

/// Result of one answer, plus what to show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub result: SubmissionResult,
    /// `None` once the session is complete, or when the next word has been
    /// deleted since the session started.
    pub next_prompt: Option<PracticePrompt>,
}

/// Runs practice sessions keyed by `SessionKey`.
///
/// Each call loads the stored session value, applies one engine transition,
/// and stores the result again. Concurrent calls for the same key are
/// last-write-wins.
#[derive(Clone)]
pub struct PracticeService {
    source: Arc<dyn WordSource>,
    sessions: Arc<dyn SessionStore>,
    shuffle: bool,
}

impl PracticeService {
    #[must_use]
    pub fn new(source: Arc<dyn WordSource>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            source,
            sessions,
            shuffle: false,
        }
    }

    /// Shuffle words once when a session starts.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Start a fresh session for `wordlist_id`, replacing whatever `key` held.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::EmptyWordlist` (leaving any stored session untouched),
    /// Word Source errors, or session store errors.
    pub async fn start_session(
        &self,
        key: &SessionKey,
        wordlist_id: WordlistId,
    ) -> Result<PracticePrompt, PracticeServiceError> {
        let mut words = self.source.fetch_words(wordlist_id).await?;
        if self.shuffle {
            words.shuffle(&mut rand::rng());
        }

        let session = PracticeSession::start(wordlist_id, &words)?;
        self.sessions
            .save_session(key, &PracticeSessionRecord::from_session(&session))
            .await?;
        tracing::info!(%key, %wordlist_id, words = words.len(), "practice session started");

        let first = words
            .into_iter()
            .next()
            .ok_or(PracticeError::EmptyWordlist { wordlist_id })?;
        Ok(session.prompt(first)?)
    }

    /// Resume the stored session if it drills `wordlist_id`, otherwise start a new one.
    ///
    /// A stored session that cannot be read, or whose current word has been
    /// deleted, is replaced by a fresh one.
    ///
    /// # Errors
    ///
    /// Same as [`PracticeService::start_session`] and [`PracticeService::current_prompt`].
    pub async fn start_or_resume(
        &self,
        key: &SessionKey,
        wordlist_id: WordlistId,
    ) -> Result<PracticePrompt, PracticeServiceError> {
        match self.load(key).await {
            Ok(Some(session)) if session.wordlist_id() == wordlist_id => {
                match self.prompt_for(&session).await {
                    Ok(prompt) => {
                        tracing::debug!(%key, %wordlist_id, "resuming practice session");
                        return Ok(prompt);
                    }
                    Err(PracticeServiceError::Source(
                        err @ WordSourceError::WordNotFound { .. },
                    )) => {
                        tracing::warn!(%key, error = %err, "restarting session on a deleted word");
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(Some(session)) => {
                tracing::info!(
                    %key,
                    previous = %session.wordlist_id(),
                    %wordlist_id,
                    "discarding session for another wordlist"
                );
            }
            Ok(None) => {}
            Err(
                err @ (PracticeServiceError::Practice(PracticeError::InvalidSessionRecord(_))
                | PracticeServiceError::Storage(StorageError::Serialization(_))),
            ) => {
                tracing::warn!(%key, error = %err, "replacing unreadable practice session");
            }
            Err(err) => return Err(err),
        }
        self.start_session(key, wordlist_id).await
    }

    /// The word currently being asked.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoActiveSession` if `key` holds no session.
    pub async fn current_prompt(
        &self,
        key: &SessionKey,
    ) -> Result<PracticePrompt, PracticeServiceError> {
        let session = self.require(key).await?;
        self.prompt_for(&session).await
    }

    /// Grade an answer for the current word and store the next state.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoActiveSession` if `key` holds no session,
    /// or Word Source and session store errors.
    pub async fn submit_answer(
        &self,
        key: &SessionKey,
        raw_answer: &str,
    ) -> Result<AnswerFeedback, PracticeServiceError> {
        let session = self.require(key).await?;
        let word = self.source.resolve_word(session.current_word_id()).await?;
        let submission = session.submit(&word, raw_answer)?;
        let result = submission.result;
        tracing::debug!(%key, word_id = %result.word_id, outcome = ?result.outcome, "answer graded");

        let next_prompt = match submission.next {
            Some(next) => {
                self.sessions
                    .save_session(key, &PracticeSessionRecord::from_session(&next))
                    .await?;
                if let PassEvent::RequeueStarted { words } = result.pass {
                    tracing::info!(%key, words, "requeued missed words");
                }
                if next.current_word_id() == word.id() {
                    Some(next.prompt(word)?)
                } else {
                    // the transition is already stored
                    match self.prompt_for(&next).await {
                        Ok(prompt) => Some(prompt),
                        Err(PracticeServiceError::Source(
                            err @ WordSourceError::WordNotFound { .. },
                        )) => {
                            tracing::warn!(%key, error = %err, "next word no longer exists");
                            None
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
            None => {
                self.sessions.clear_session(key).await?;
                tracing::info!(%key, wordlist_id = %session.wordlist_id(), "practice session complete");
                None
            }
        };

        Ok(AnswerFeedback {
            result,
            next_prompt,
        })
    }

    /// Like [`PracticeService::submit_answer`], for raw input bytes.
    ///
    /// Bytes that are not UTF-8 are graded as an empty answer.
    ///
    /// # Errors
    ///
    /// Same as [`PracticeService::submit_answer`].
    pub async fn submit_answer_bytes(
        &self,
        key: &SessionKey,
        raw_answer: &[u8],
    ) -> Result<AnswerFeedback, PracticeServiceError> {
        self.submit_answer(key, answer_from_bytes(raw_answer)).await
    }

    /// # Errors
    ///
    /// Returns `PracticeError::NoActiveSession` if `key` holds no session.
    pub async fn progress(&self, key: &SessionKey) -> Result<Progress, PracticeServiceError> {
        Ok(self.require(key).await?.progress())
    }

    /// `NotStarted` when nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns session store errors or `PracticeError::InvalidSessionRecord`.
    pub async fn phase(&self, key: &SessionKey) -> Result<SessionPhase, PracticeServiceError> {
        Ok(self
            .load(key)
            .await?
            .map_or(SessionPhase::NotStarted, |s| s.phase()))
    }

    /// Drop the session under `key`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns session store errors.
    pub async fn abandon(&self, key: &SessionKey) -> Result<bool, PracticeServiceError> {
        let existed = match self.sessions.load_session(key).await {
            Ok(record) => record.is_some(),
            Err(StorageError::Serialization(_)) => true,
            Err(err) => return Err(err.into()),
        };
        self.sessions.clear_session(key).await?;
        if existed {
            tracing::info!(%key, "practice session abandoned");
        }
        Ok(existed)
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<PracticeSession>, PracticeServiceError> {
        let Some(record) = self.sessions.load_session(key).await? else {
            return Ok(None);
        };
        Ok(Some(record.into_session()?))
    }

    async fn require(&self, key: &SessionKey) -> Result<PracticeSession, PracticeServiceError> {
        self.load(key)
            .await?
            .ok_or(PracticeServiceError::Practice(PracticeError::NoActiveSession))
    }

    async fn prompt_for(
        &self,
        session: &PracticeSession,
    ) -> Result<PracticePrompt, PracticeServiceError> {
        let word = self.source.resolve_word(session.current_word_id()).await?;
        Ok(session.prompt(word)?)
    }
}
