use std::sync::Arc;

use recall_core::model::{OwnerId, SetId, StudySet};
use storage::repository::{NewSetRecord, SetRepository, StorageError};

use crate::Clock;
use crate::error::SetServiceError;

const LIST_LIMIT: u32 = 64;

/// Orchestrates study-set persistence for the dashboard.
#[derive(Clone)]
pub struct SetService {
    clock: Clock,
    sets: Arc<dyn SetRepository>,
}

impl SetService {
    #[must_use]
    pub fn new(clock: Clock, sets: Arc<dyn SetRepository>) -> Self {
        Self { clock, sets }
    }

    /// List an owner's sets, most recently used first.
    ///
    /// # Errors
    ///
    /// Returns `SetServiceError::Storage` if repository access fails.
    pub async fn list_sets(&self, owner: &OwnerId) -> Result<Vec<StudySet>, SetServiceError> {
        let sets = self.sets.list_sets(owner, LIST_LIMIT).await?;
        Ok(sets)
    }

    /// Create a new set and persist it.
    ///
    /// Stamps both `created_at` and `last_used_at` with the current time, so
    /// the new set sorts first on the next listing.
    ///
    /// # Errors
    ///
    /// Returns `SetServiceError::Set` for validation failures.
    /// Returns `SetServiceError::Storage` if persistence fails.
    pub async fn create_set(
        &self,
        owner: OwnerId,
        name: String,
        context: Option<String>,
    ) -> Result<SetId, SetServiceError> {
        let now = self.clock.now();
        let record = NewSetRecord::new(owner, name, context, now, now)?;
        let set_id = self.sets.insert_new_set(record).await?;
        Ok(set_id)
    }

    /// Fetch a set by id.
    ///
    /// Returns `Ok(None)` when the set does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SetServiceError::Storage` if repository access fails.
    pub async fn get_set(&self, set_id: SetId) -> Result<Option<StudySet>, SetServiceError> {
        let set = self.sets.get_set(set_id).await?;
        Ok(set)
    }

    /// Update a set's name and generation context; recency is untouched.
    ///
    /// # Errors
    ///
    /// Returns `SetServiceError::Set` if validation fails.
    /// Returns `SetServiceError::Storage` if repository access fails.
    pub async fn update_set(
        &self,
        set_id: SetId,
        name: String,
        context: Option<String>,
    ) -> Result<(), SetServiceError> {
        let set = self
            .sets
            .get_set(set_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let updated = set.with_details(name, context)?;
        self.sets.update_set(&updated).await?;
        Ok(())
    }

    /// Record that a set was just used by advancing `last_used_at` to now.
    ///
    /// # Errors
    ///
    /// Returns `SetServiceError::Storage` if repository access fails.
    pub async fn touch_set(&self, set_id: SetId) -> Result<(), SetServiceError> {
        self.sets.touch_set(set_id, self.clock.now()).await?;
        Ok(())
    }

    /// Delete a set permanently.
    ///
    /// # Errors
    ///
    /// Returns `SetServiceError::Storage` if the set is missing or the
    /// repository fails.
    pub async fn delete_set(&self, set_id: SetId) -> Result<(), SetServiceError> {
        self.sets.delete_set(set_id).await?;
        Ok(())
    }
}
