mod service;

pub use crate::error::PracticeServiceError;
pub use service::{AnswerFeedback, PracticeService};
