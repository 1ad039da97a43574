use thiserror::Error;

use crate::model::{IdError, WordError, WordlistError};
use crate::practice::PracticeError;

/// Umbrella error for callers that want a single domain error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Wordlist(#[from] WordlistError),
    #[error(transparent)]
    Practice(#[from] PracticeError),
}
