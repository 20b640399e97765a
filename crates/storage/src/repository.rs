use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recall_core::model::{OwnerId, SetError, SetId, StudySet, normalize_context, normalize_name};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Fields for a set that has not been assigned an id yet.
///
/// The repository owns id allocation, so creation goes through this record
/// rather than a full `StudySet`.
#[derive(Debug, Clone)]
pub struct NewSetRecord {
    pub owner: OwnerId,
    pub name: String,
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl NewSetRecord {
    /// Validating constructor. Name and context are normalized exactly as
    /// `StudySet::new` normalizes them.
    ///
    /// # Errors
    ///
    /// Returns `SetError::EmptyName` if the name is empty or whitespace-only.
    pub fn new(
        owner: OwnerId,
        name: impl Into<String>,
        context: Option<String>,
        created_at: DateTime<Utc>,
        last_used_at: DateTime<Utc>,
    ) -> Result<Self, SetError> {
        Ok(Self {
            owner,
            name: normalize_name(name)?,
            context: normalize_context(context),
            created_at,
            last_used_at,
        })
    }
}

/// Repository contract for the persisted `flashcard_sets` collection.
///
/// `list_sets` is the only owner-scoped call; mutations address rows by id
/// alone and trust the backend to enforce ownership, matching the dashboard's
/// trust model.
#[async_trait]
pub trait SetRepository: Send + Sync {
    /// Persist a new set and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be stored.
    async fn insert_new_set(&self, set: NewSetRecord) -> Result<SetId, StorageError>;

    /// List an owner's sets ordered by `last_used_at` descending, ties
    /// broken by insertion order, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_sets(&self, owner: &OwnerId, limit: u32) -> Result<Vec<StudySet>, StorageError>;

    /// Fetch a set by id. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn get_set(&self, id: SetId) -> Result<Option<StudySet>, StorageError>;

    /// Persist an updated name/context for an existing set. Timestamps are
    /// written as-is, so recency is not advanced by edits.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set is missing, or other
    /// storage errors.
    async fn update_set(&self, set: &StudySet) -> Result<(), StorageError>;

    /// Advance a set's `last_used_at` to `at`, leaving everything else alone.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set is missing, or other
    /// storage errors.
    async fn touch_set(&self, id: SetId, at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Remove a set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row matched, or other storage
    /// errors.
    async fn delete_set(&self, id: SetId) -> Result<(), StorageError>;
}

/// In-memory repository for tests and prototyping.
///
/// Keeps sets in insertion order so tie-breaking matches what SQLite rowid
/// ordering produces.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<InMemoryState>>,
}

#[derive(Default)]
struct InMemoryState {
    sets: Vec<StudySet>,
    next_id: u64,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SetRepository for InMemoryRepository {
    async fn insert_new_set(&self, set: NewSetRecord) -> Result<SetId, StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = SetId::new(guard.next_id);
        let stored = StudySet::new(
            id,
            set.owner,
            set.name,
            set.context,
            set.created_at,
            set.last_used_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.sets.push(stored);
        Ok(id)
    }

    async fn list_sets(&self, owner: &OwnerId, limit: u32) -> Result<Vec<StudySet>, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut sets: Vec<StudySet> = guard
            .sets
            .iter()
            .filter(|set| set.owner() == owner)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        sets.sort_by(|a, b| b.last_used_at().cmp(&a.last_used_at()));
        sets.truncate(limit as usize);
        Ok(sets)
    }

    async fn get_set(&self, id: SetId) -> Result<Option<StudySet>, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.sets.iter().find(|set| set.id() == id).cloned())
    }

    async fn update_set(&self, set: &StudySet) -> Result<(), StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let slot = guard
            .sets
            .iter_mut()
            .find(|existing| existing.id() == set.id())
            .ok_or(StorageError::NotFound)?;
        *slot = set.clone();
        Ok(())
    }

    async fn touch_set(&self, id: SetId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let slot = guard
            .sets
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or(StorageError::NotFound)?;
        let touched = StudySet::new(
            slot.id(),
            slot.owner().clone(),
            slot.name().to_owned(),
            slot.context().map(str::to_owned),
            slot.created_at(),
            at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        *slot = touched;
        Ok(())
    }

    async fn delete_set(&self, id: SetId) -> Result<(), StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.sets.len();
        guard.sets.retain(|set| set.id() != id);
        if guard.sets.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sets: Arc<dyn SetRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sets: Arc<dyn SetRepository> = Arc::new(repo);
        Self { sets }
    }
}
