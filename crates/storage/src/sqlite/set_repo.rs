use chrono::{DateTime, Utc};
use recall_core::model::{OwnerId, SetId, StudySet};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{set_id_from_i64, set_id_to_i64};
use crate::repository::{NewSetRecord, SetRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl SetRepository for SqliteRepository {
    async fn insert_new_set(&self, set: NewSetRecord) -> Result<SetId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO flashcard_sets (owner, name, context, created_at, last_used_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(set.owner.as_str().to_owned())
        .bind(set.name)
        .bind(set.context)
        .bind(set.created_at)
        .bind(set.last_used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        set_id_from_i64(res.last_insert_rowid())
    }

    async fn list_sets(&self, owner: &OwnerId, limit: u32) -> Result<Vec<StudySet>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, owner, name, context, created_at, last_used_at
            FROM flashcard_sets
            WHERE owner = ?1
            ORDER BY last_used_at DESC, id ASC
            LIMIT ?2
            ",
        )
        .bind(owner.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut sets = Vec::with_capacity(rows.len());
        for row in rows {
            sets.push(set_from_row(&row)?);
        }
        Ok(sets)
    }

    async fn get_set(&self, id: SetId) -> Result<Option<StudySet>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, owner, name, context, created_at, last_used_at
            FROM flashcard_sets WHERE id = ?1
            ",
        )
        .bind(set_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => set_from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn update_set(&self, set: &StudySet) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE flashcard_sets
            SET name = ?2, context = ?3
            WHERE id = ?1
            ",
        )
        .bind(set_id_to_i64(set.id())?)
        .bind(set.name().to_owned())
        .bind(set.context().map(ToOwned::to_owned))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn touch_set(&self, id: SetId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE flashcard_sets
            SET last_used_at = ?2
            WHERE id = ?1
            ",
        )
        .bind(set_id_to_i64(id)?)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_set(&self, id: SetId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM flashcard_sets WHERE id = ?1")
            .bind(set_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn set_from_row(row: &SqliteRow) -> Result<StudySet, StorageError> {
    StudySet::new(
        set_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        OwnerId::new(row.try_get::<String, _>("owner").map_err(ser)?),
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<Option<String>, _>("context").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("last_used_at").map_err(ser)?,
    )
    .map_err(|e| StorageError::Serialization(e.to_string()))
}
