use drill_core::model::{WordId, WordPair, WordPairDraft, WordlistId};

use super::SqliteRepository;
use super::mapping::{conn, map_word_row, word_id_from_i64, word_id_to_i64, wordlist_id_to_i64};
use crate::repository::{StorageError, WordRepository};

#[async_trait::async_trait]
impl WordRepository for SqliteRepository {
    async fn insert_words(
        &self,
        wordlist_id: WordlistId,
        drafts: &[WordPairDraft],
    ) -> Result<Vec<WordId>, StorageError> {
        let list = wordlist_id_to_i64(wordlist_id)?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let exists = sqlx::query("SELECT 1 FROM wordlists WHERE id = ?1")
            .bind(list)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let res = sqlx::query(
                r"
                INSERT INTO words (wordlist_id, side_a, side_b)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(list)
            .bind(draft.side_a())
            .bind(draft.side_b())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
            ids.push(word_id_from_i64(res.last_insert_rowid())?);
        }

        tx.commit().await.map_err(conn)?;
        Ok(ids)
    }

    async fn words_for_list(&self, wordlist_id: WordlistId) -> Result<Vec<WordPair>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, wordlist_id, side_a, side_b
            FROM words
            WHERE wordlist_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(wordlist_id_to_i64(wordlist_id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_word_row).collect()
    }

    async fn get_word(&self, id: WordId) -> Result<Option<WordPair>, StorageError> {
        let row = sqlx::query("SELECT id, wordlist_id, side_a, side_b FROM words WHERE id = ?1")
            .bind(word_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_word_row).transpose()
    }

    async fn upsert_words(&self, words: &[WordPair]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        for word in words {
            let res = sqlx::query(
                r"
                INSERT INTO words (id, wordlist_id, side_a, side_b)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    side_a = excluded.side_a,
                    side_b = excluded.side_b
                WHERE words.wordlist_id = excluded.wordlist_id
                ",
            )
            .bind(word_id_to_i64(word.id())?)
            .bind(wordlist_id_to_i64(word.wordlist_id())?)
            .bind(word.side_a())
            .bind(word.side_b())
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
                other => conn(other),
            })?;

            // the WHERE guard turns a cross-list update into a no-op
            if res.rows_affected() == 0 {
                return Err(StorageError::Conflict);
            }
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn delete_words(
        &self,
        wordlist_id: WordlistId,
        ids: &[WordId],
    ) -> Result<(), StorageError> {
        if ids.is_empty() {
            return Ok(());
        }

        let placeholders = (0..ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("DELETE FROM words WHERE wordlist_id = ?1 AND id IN ({placeholders})");

        let mut q = sqlx::query(&sql).bind(wordlist_id_to_i64(wordlist_id)?);
        for id in ids {
            q = q.bind(word_id_to_i64(*id)?);
        }
        q.execute(&self.pool).await.map_err(conn)?;
        Ok(())
    }
}
