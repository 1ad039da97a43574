//! Practice session engine.
//!
//! A session is a plain value; every submission computes the next value and a
//! result event. Callers persist the value between requests as a
//! [`PracticeSessionRecord`].

mod answer;
mod progress;
mod record;
mod session;

pub use answer::{AnswerOutcome, answer_from_bytes, normalize_answer};
pub use progress::Progress;
pub use record::PracticeSessionRecord;
pub use session::{
    PassEvent, PracticeError, PracticePrompt, PracticeSession, SessionPhase, Submission,
    SubmissionResult,
};
