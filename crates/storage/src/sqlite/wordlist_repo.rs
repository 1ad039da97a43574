use drill_core::model::{Wordlist, WordlistId};

use super::SqliteRepository;
use super::mapping::{conn, map_wordlist_row, wordlist_id_from_i64, wordlist_id_to_i64};
use crate::repository::{NewWordlistRecord, StorageError, WordlistRepository};

const SELECT_WORDLIST: &str = r"
    SELECT l.id, l.name, l.created_at, COUNT(w.id) AS word_count
    FROM wordlists l
    LEFT JOIN words w ON w.wordlist_id = l.id
";

#[async_trait::async_trait]
impl WordlistRepository for SqliteRepository {
    async fn insert_new_wordlist(
        &self,
        record: NewWordlistRecord,
    ) -> Result<WordlistId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO wordlists (name, created_at)
            VALUES (?1, ?2)
            ",
        )
        .bind(record.name)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        wordlist_id_from_i64(res.last_insert_rowid())
    }

    async fn get_wordlist(&self, id: WordlistId) -> Result<Option<Wordlist>, StorageError> {
        let sql = format!("{SELECT_WORDLIST} WHERE l.id = ?1 GROUP BY l.id");
        let row = sqlx::query(&sql)
            .bind(wordlist_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_wordlist_row).transpose()
    }

    async fn list_wordlists(&self, limit: u32) -> Result<Vec<Wordlist>, StorageError> {
        let sql = format!("{SELECT_WORDLIST} GROUP BY l.id ORDER BY l.id ASC LIMIT ?1");
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_wordlist_row).collect()
    }

    async fn rename_wordlist(&self, id: WordlistId, name: &str) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE wordlists SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(wordlist_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_wordlist(&self, id: WordlistId) -> Result<(), StorageError> {
        // words go with it through ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM wordlists WHERE id = ?1")
            .bind(wordlist_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
