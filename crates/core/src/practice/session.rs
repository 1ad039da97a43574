use thiserror::Error;

use crate::model::{WordId, WordPair, WordlistId};

use super::answer::AnswerOutcome;
use super::progress::Progress;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("wordlist {wordlist_id} has no words to practice")]
    EmptyWordlist { wordlist_id: WordlistId },

    #[error("no active practice session")]
    NoActiveSession,

    #[error("word {found} is not the current word (expected {expected})")]
    WordMismatch { expected: WordId, found: WordId },

    #[error("invalid stored practice session: {0}")]
    InvalidSessionRecord(String),
}

//
// ─── RESULT TYPES ──────────────────────────────────────────────────────────────
//

/// Where a session stands, as seen by a caller.
///
/// A completed session is torn down, so it reads as `NotStarted` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    AwaitingAnswer,
    Retrying,
}

/// What happened to the pass as a whole after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEvent {
    /// The pass goes on with the word at the cursor.
    Continue,
    /// The pass ended with misses; a new pass over those words began.
    RequeueStarted { words: usize },
    /// Every word has been answered correctly; the session is gone.
    SessionComplete,
}

/// The word to show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticePrompt {
    pub word: WordPair,
    /// True after a first miss: render the hint state rather than a fresh prompt.
    pub is_retry: bool,
    pub progress: Progress,
}

/// Result event of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub word_id: WordId,
    pub outcome: AnswerOutcome,
    pub pass: PassEvent,
    /// Progress after the transition, `None` once the session is complete.
    pub progress: Option<Progress>,
}

impl SubmissionResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.pass, PassEvent::SessionComplete)
    }
}

/// Output of a transition: the next session value and the result event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// `None` when the session was torn down.
    pub next: Option<PracticeSession>,
    pub result: SubmissionResult,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One in-progress drill over a wordlist.
///
/// Invariants held by every constructor and transition:
/// `queue` is non-empty, `cursor < queue.len()`, `retry_count <= 1`,
/// and `missed` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    wordlist_id: WordlistId,
    queue: Vec<WordId>,
    missed: Vec<WordId>,
    cursor: usize,
    retry_count: u8,
}

impl PracticeSession {
    /// Start a fresh session over `words`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::EmptyWordlist` if `words` is empty.
    pub fn start(wordlist_id: WordlistId, words: &[WordPair]) -> Result<Self, PracticeError> {
        if words.is_empty() {
            return Err(PracticeError::EmptyWordlist { wordlist_id });
        }
        Ok(Self {
            wordlist_id,
            queue: words.iter().map(WordPair::id).collect(),
            missed: Vec::new(),
            cursor: 0,
            retry_count: 0,
        })
    }

    /// Rebuild a session from raw parts, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InvalidSessionRecord` describing the first violated invariant.
    pub fn from_parts(
        wordlist_id: WordlistId,
        queue: Vec<WordId>,
        missed: Vec<WordId>,
        cursor: usize,
        retry_count: u8,
    ) -> Result<Self, PracticeError> {
        let invalid = |reason: String| Err(PracticeError::InvalidSessionRecord(reason));
        if queue.is_empty() {
            return invalid("queue is empty".into());
        }
        if cursor >= queue.len() {
            return invalid(format!("cursor {cursor} out of range for {} words", queue.len()));
        }
        if retry_count > 1 {
            return invalid(format!("retry count {retry_count} is above 1"));
        }
        for (i, id) in missed.iter().enumerate() {
            if missed[..i].contains(id) {
                return invalid(format!("word {id} is missed twice"));
            }
        }
        Ok(Self {
            wordlist_id,
            queue,
            missed,
            cursor,
            retry_count,
        })
    }

    #[must_use]
    pub fn wordlist_id(&self) -> WordlistId {
        self.wordlist_id
    }

    #[must_use]
    pub fn queue(&self) -> &[WordId] {
        &self.queue
    }

    #[must_use]
    pub fn missed(&self) -> &[WordId] {
        &self.missed
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// Id of the word being asked.
    #[must_use]
    pub fn current_word_id(&self) -> WordId {
        // cursor < queue.len() while the session exists
        self.queue[self.cursor]
    }

    #[must_use]
    pub fn is_retry(&self) -> bool {
        self.retry_count > 0
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_retry() {
            SessionPhase::Retrying
        } else {
            SessionPhase::AwaitingAnswer
        }
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            current_position: self.cursor + 1,
            total_in_pass: self.queue.len(),
            missed_count: self.missed.len(),
        }
    }

    /// Build the prompt for the current word.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::WordMismatch` if `word` is not the current word.
    pub fn prompt(&self, word: WordPair) -> Result<PracticePrompt, PracticeError> {
        self.ensure_current(&word)?;
        Ok(PracticePrompt {
            word,
            is_retry: self.is_retry(),
            progress: self.progress(),
        })
    }

    /// Grade `raw_answer` for the current word and compute the next session value.
    ///
    /// `self` is left untouched; the caller persists `Submission::next`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::WordMismatch` if `word` is not the current word.
    pub fn submit(&self, word: &WordPair, raw_answer: &str) -> Result<Submission, PracticeError> {
        self.ensure_current(word)?;
        let word_id = word.id();
        let outcome = AnswerOutcome::grade(word.side_b(), raw_answer, self.retry_count);

        let mut next = self.clone();
        if let AnswerOutcome::IncorrectFinal { .. } = outcome {
            if !next.missed.contains(&word_id) {
                next.missed.push(word_id);
            }
        }

        let (next, pass) = if outcome.advances() {
            next.advance()
        } else {
            next.retry_count = 1;
            (Some(next), PassEvent::Continue)
        };

        let progress = next.as_ref().map(Self::progress);
        Ok(Submission {
            next,
            result: SubmissionResult {
                word_id,
                outcome,
                pass,
                progress,
            },
        })
    }

    fn advance(mut self) -> (Option<Self>, PassEvent) {
        self.retry_count = 0;
        self.cursor += 1;
        if self.cursor < self.queue.len() {
            return (Some(self), PassEvent::Continue);
        }
        if self.missed.is_empty() {
            return (None, PassEvent::SessionComplete);
        }
        self.queue = std::mem::take(&mut self.missed);
        self.cursor = 0;
        let words = self.queue.len();
        (Some(self), PassEvent::RequeueStarted { words })
    }

    fn ensure_current(&self, word: &WordPair) -> Result<(), PracticeError> {
        let expected = self.current_word_id();
        if word.id() != expected {
            return Err(PracticeError::WordMismatch {
                expected,
                found: word.id(),
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: u64, a: &str, b: &str) -> WordPair {
        WordPair::from_persisted(WordId::new(id), WordlistId::new(1), a, b)
    }

    fn hello_cat() -> Vec<WordPair> {
        vec![word(1, "hello", "ola"), word(2, "cat", "gato")]
    }

    fn lookup(words: &[WordPair], id: WordId) -> &WordPair {
        words.iter().find(|w| w.id() == id).unwrap()
    }

    /// Submit against whatever word is current.
    fn answer(session: &PracticeSession, words: &[WordPair], raw: &str) -> Submission {
        let current = lookup(words, session.current_word_id());
        session.submit(current, raw).unwrap()
    }

    #[test]
    fn start_presents_first_word_without_retry() {
        let words = hello_cat();
        let session = PracticeSession::start(WordlistId::new(1), &words).unwrap();
        let prompt = session.prompt(words[0].clone()).unwrap();
        assert_eq!(prompt.word, words[0]);
        assert!(!prompt.is_retry);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(
            prompt.progress,
            Progress {
                current_position: 1,
                total_in_pass: 2,
                missed_count: 0
            }
        );
    }

    #[test]
    fn empty_wordlist_cannot_start() {
        let err = PracticeSession::start(WordlistId::new(5), &[]).unwrap_err();
        assert_eq!(
            err,
            PracticeError::EmptyWordlist {
                wordlist_id: WordlistId::new(5)
            }
        );
    }

    #[test]
    fn hint_then_correct_then_complete() {
        let words = hello_cat();
        let s0 = PracticeSession::start(WordlistId::new(1), &words).unwrap();

        let step = answer(&s0, &words, "wrong");
        assert_eq!(
            step.result.outcome,
            AnswerOutcome::IncorrectRetry {
                hint: "o".into()
            }
        );
        assert_eq!(step.result.pass, PassEvent::Continue);
        let s1 = step.next.unwrap();
        assert_eq!(s1.current_word_id(), WordId::new(1));
        assert_eq!(s1.phase(), SessionPhase::Retrying);
        assert!(s1.prompt(words[0].clone()).unwrap().is_retry);

        let step = answer(&s1, &words, "ola");
        assert_eq!(step.result.outcome, AnswerOutcome::Correct);
        let s2 = step.next.unwrap();
        assert_eq!(s2.current_word_id(), WordId::new(2));
        assert_eq!(s2.retry_count(), 0);

        let step = answer(&s2, &words, "gato");
        assert_eq!(step.result.outcome, AnswerOutcome::Correct);
        assert_eq!(step.result.pass, PassEvent::SessionComplete);
        assert!(step.result.is_complete());
        assert!(step.result.progress.is_none());
        assert!(step.next.is_none());
    }

    #[test]
    fn two_misses_requeue_the_word() {
        let words = hello_cat();
        let s0 = PracticeSession::start(WordlistId::new(1), &words).unwrap();

        let s1 = answer(&s0, &words, "x").next.unwrap();
        let step = answer(&s1, &words, "y");
        assert_eq!(
            step.result.outcome,
            AnswerOutcome::IncorrectFinal {
                answer: "ola".into()
            }
        );
        let s2 = step.next.unwrap();
        assert_eq!(s2.missed(), &[WordId::new(1)]);
        assert_eq!(s2.current_word_id(), WordId::new(2));
        assert_eq!(s2.progress().missed_count, 1);

        let step = answer(&s2, &words, "gato");
        assert_eq!(step.result.pass, PassEvent::RequeueStarted { words: 1 });
        let s3 = step.next.unwrap();
        assert_eq!(s3.queue(), &[WordId::new(1)]);
        assert_eq!(s3.cursor(), 0);
        assert!(s3.missed().is_empty());

        let step = answer(&s3, &words, "ola");
        assert_eq!(step.result.pass, PassEvent::SessionComplete);
        assert!(step.next.is_none());
    }

    #[test]
    fn requeue_keeps_order_of_misses() {
        let words = vec![word(1, "a", "x"), word(2, "b", "y"), word(3, "c", "z")];
        let mut session = PracticeSession::start(WordlistId::new(1), &words).unwrap();
        // miss word 1 and word 3 twice, answer word 2
        for raw in ["-", "-", "y", "-", "-"] {
            session = answer(&session, &words, raw).next.unwrap();
        }
        assert_eq!(session.queue(), &[WordId::new(1), WordId::new(3)]);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn word_missed_again_in_next_pass_is_requeued_once() {
        let words = vec![word(1, "hello", "ola")];
        let mut session = PracticeSession::start(WordlistId::new(1), &words).unwrap();
        for _ in 0..3 {
            session = answer(&session, &words, "a").next.unwrap();
            let step = answer(&session, &words, "b");
            assert_eq!(step.result.pass, PassEvent::RequeueStarted { words: 1 });
            session = step.next.unwrap();
            assert_eq!(session.queue(), &[WordId::new(1)]);
            assert!(session.missed().is_empty());
        }
    }

    #[test]
    fn submit_rejects_a_word_that_is_not_current() {
        let words = hello_cat();
        let session = PracticeSession::start(WordlistId::new(1), &words).unwrap();
        let err = session.submit(&words[1], "gato").unwrap_err();
        assert_eq!(
            err,
            PracticeError::WordMismatch {
                expected: WordId::new(1),
                found: WordId::new(2)
            }
        );
    }

    #[test]
    fn submit_does_not_mutate_the_input_session() {
        let words = hello_cat();
        let session = PracticeSession::start(WordlistId::new(1), &words).unwrap();
        let before = session.clone();
        let _ = answer(&session, &words, "nope");
        assert_eq!(session, before);
    }

    #[test]
    fn invariants_hold_over_many_answer_sequences() {
        let words: Vec<WordPair> = (1..=4)
            .map(|i| word(i, &format!("w{i}"), &format!("a{i}")))
            .collect();
        // each bit of the pattern decides right (1) or wrong (0)
        for pattern in 0_u32..256 {
            let mut session = PracticeSession::start(WordlistId::new(1), &words).unwrap();
            for step in 0..64 {
                let current = lookup(&words, session.current_word_id());
                let right = (pattern >> (step % 8)) & 1 == 1 || step >= 40;
                let raw = if right { current.side_b().to_owned() } else { "?".into() };
                let submission = session.submit(current, &raw).unwrap();
                let Some(next) = submission.next else {
                    assert!(submission.result.is_complete());
                    break;
                };
                assert!(next.cursor() < next.queue().len());
                assert!(next.retry_count() <= 1);
                for (i, id) in next.missed().iter().enumerate() {
                    assert!(!next.missed()[..i].contains(id));
                }
                session = next;
            }
        }
    }

    #[test]
    fn from_parts_rejects_broken_invariants() {
        let list = WordlistId::new(1);
        let ids = vec![WordId::new(1), WordId::new(2)];
        assert!(PracticeSession::from_parts(list, Vec::new(), Vec::new(), 0, 0).is_err());
        assert!(PracticeSession::from_parts(list, ids.clone(), Vec::new(), 2, 0).is_err());
        assert!(PracticeSession::from_parts(list, ids.clone(), Vec::new(), 0, 2).is_err());
        assert!(
            PracticeSession::from_parts(list, ids.clone(), vec![WordId::new(1), WordId::new(1)], 1, 0)
                .is_err()
        );
        let ok = PracticeSession::from_parts(list, ids, vec![WordId::new(1)], 1, 1).unwrap();
        assert_eq!(ok.phase(), SessionPhase::Retrying);
    }
}
