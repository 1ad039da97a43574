use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::WordlistId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordlistError {
    #[error("wordlist name cannot be empty")]
    EmptyName,
}

/// Validates and trims a wordlist name.
///
/// # Errors
///
/// Returns `WordlistError::EmptyName` if the name is blank.
pub fn validate_name(name: impl AsRef<str>) -> Result<String, WordlistError> {
    let name = name.as_ref().trim();
    if name.is_empty() {
        return Err(WordlistError::EmptyName);
    }
    Ok(name.to_owned())
}

/// A named collection of word pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wordlist {
    id: WordlistId,
    name: String,
    created_at: DateTime<Utc>,
    word_count: u32,
}

impl Wordlist {
    /// # Errors
    ///
    /// Returns `WordlistError::EmptyName` if the name is blank.
    pub fn new(
        id: WordlistId,
        name: impl AsRef<str>,
        created_at: DateTime<Utc>,
        word_count: u32,
    ) -> Result<Self, WordlistError> {
        Ok(Self {
            id,
            name: validate_name(name)?,
            created_at,
            word_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> WordlistId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn word_count(&self) -> u32 {
        self.word_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn name_is_trimmed() {
        let list = Wordlist::new(WordlistId::new(1), "  Spanish basics ", fixed_now(), 2).unwrap();
        assert_eq!(list.name(), "Spanish basics");
        assert_eq!(list.word_count(), 2);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Wordlist::new(WordlistId::new(1), " \t", fixed_now(), 0).unwrap_err();
        assert_eq!(err, WordlistError::EmptyName);
    }
}
