#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod form;
pub mod practice;
pub mod word_source;
pub mod wordlist_service;

pub use drill_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, PracticeServiceError, WordSourceError, WordlistServiceError};
pub use form::{ParsedRows, WordRow, parse_new_pairs, parse_word_rows};
pub use practice::{AnswerFeedback, PracticeService};
pub use word_source::{StorageWordSource, WordSource};
pub use wordlist_service::{EditSummary, WordlistDetails, WordlistService};
