use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for parsing or building identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("failed to parse {kind} from {raw:?}")]
    Parse { kind: &'static str, raw: String },

    #[error("session key cannot be empty")]
    EmptySessionKey,
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self::new)
                    .map_err(|_| IdError::Parse {
                        kind: stringify!($name),
                        raw: s.to_owned(),
                    })
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a word pair
    WordId
);

numeric_id!(
    /// Unique identifier for a wordlist
    WordlistId
);

/// Key under which one caller's practice session is stored.
///
/// Typically one per user or browser; the engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionKey(String);

impl SessionKey {
    /// Builds a key from a non-blank string.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptySessionKey` if the key is blank.
    pub fn new(key: impl Into<String>) -> Result<Self, IdError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptySessionKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionKey {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionKey> for String {
    fn from(key: SessionKey) -> Self {
        key.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_display_and_parse() {
        let id: WordId = " 42 ".parse().unwrap();
        assert_eq!(id, WordId::new(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "WordId(42)");
    }

    #[test]
    fn wordlist_id_rejects_garbage() {
        let err = "abc".parse::<WordlistId>().unwrap_err();
        assert_eq!(
            err,
            IdError::Parse {
                kind: "WordlistId",
                raw: "abc".into()
            }
        );
    }

    #[test]
    fn session_key_is_trimmed_and_non_empty() {
        assert_eq!(SessionKey::new("  browser-1 ").unwrap().as_str(), "browser-1");
        assert_eq!(SessionKey::new("   ").unwrap_err(), IdError::EmptySessionKey);
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&WordId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
