mod ids;
mod word;
mod wordlist;

pub use ids::{IdError, SessionKey, WordId, WordlistId};
pub use word::{WordError, WordPair, WordPairDraft};
pub use wordlist::{Wordlist, WordlistError, validate_name};
