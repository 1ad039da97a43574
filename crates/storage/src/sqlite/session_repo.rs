use chrono::Utc;
use drill_core::model::SessionKey;
use drill_core::practice::PracticeSessionRecord;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{SessionStore, StorageError, decode_session, encode_session};

#[async_trait::async_trait]
impl SessionStore for SqliteRepository {
    async fn load_session(
        &self,
        key: &SessionKey,
    ) -> Result<Option<PracticeSessionRecord>, StorageError> {
        let row = sqlx::query("SELECT payload FROM practice_sessions WHERE session_key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload").map_err(ser)?;
                decode_session(&payload).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save_session(
        &self,
        key: &SessionKey,
        record: &PracticeSessionRecord,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO practice_sessions (session_key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(session_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(encode_session(record)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn clear_session(&self, key: &SessionKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM practice_sessions WHERE session_key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
