use drill_core::model::{WordId, WordPair, Wordlist, WordlistId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn wordlist_id_from_i64(v: i64) -> Result<WordlistId, StorageError> {
    Ok(WordlistId::new(i64_to_u64("wordlist_id", v)?))
}

pub(crate) fn word_id_from_i64(v: i64) -> Result<WordId, StorageError> {
    Ok(WordId::new(i64_to_u64("word_id", v)?))
}

pub(crate) fn wordlist_id_to_i64(id: WordlistId) -> Result<i64, StorageError> {
    u64_to_i64("wordlist_id", id.value())
}

pub(crate) fn word_id_to_i64(id: WordId) -> Result<i64, StorageError> {
    u64_to_i64("word_id", id.value())
}

pub(crate) fn map_word_row(row: &SqliteRow) -> Result<WordPair, StorageError> {
    Ok(WordPair::from_persisted(
        word_id_from_i64(row.try_get("id").map_err(ser)?)?,
        wordlist_id_from_i64(row.try_get("wordlist_id").map_err(ser)?)?,
        row.try_get::<String, _>("side_a").map_err(ser)?,
        row.try_get::<String, _>("side_b").map_err(ser)?,
    ))
}

pub(crate) fn map_wordlist_row(row: &SqliteRow) -> Result<Wordlist, StorageError> {
    let count = row.try_get::<i64, _>("word_count").map_err(ser)?;
    Wordlist::new(
        wordlist_id_from_i64(row.try_get("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        u32::try_from(count).map_err(|_| StorageError::Serialization("word_count overflow".into()))?,
    )
    .map_err(ser)
}
