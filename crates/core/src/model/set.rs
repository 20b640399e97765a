use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{OwnerId, SetId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    #[error("set name cannot be empty")]
    EmptyName,
}

/// A named, owner-scoped collection of flashcards with a recency timestamp.
///
/// `last_used_at` is the sole sort key for dashboard ordering. It advances
/// only when the set is created or explicitly touched, never as a side
/// effect of renames or other edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySet {
    id: SetId,
    owner: OwnerId,
    name: String,
    context: Option<String>,
    created_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
}

impl StudySet {
    /// Creates a new `StudySet`.
    ///
    /// The `context` is the free-form generation prompt the set was built
    /// from; the dashboard carries it opaquely and never inspects it.
    ///
    /// # Errors
    ///
    /// Returns `SetError::EmptyName` if the name is empty or whitespace-only.
    pub fn new(
        id: SetId,
        owner: OwnerId,
        name: impl Into<String>,
        context: Option<String>,
        created_at: DateTime<Utc>,
        last_used_at: DateTime<Utc>,
    ) -> Result<Self, SetError> {
        Ok(Self {
            id,
            owner,
            name: normalize_name(name)?,
            context: normalize_context(context),
            created_at,
            last_used_at,
        })
    }

    /// Returns a copy with a new name and context, keeping identity and
    /// both timestamps untouched.
    ///
    /// # Errors
    ///
    /// Returns `SetError::EmptyName` if the new name is empty.
    pub fn with_details(
        &self,
        name: impl Into<String>,
        context: Option<String>,
    ) -> Result<Self, SetError> {
        Self::new(
            self.id,
            self.owner.clone(),
            name,
            context,
            self.created_at,
            self.last_used_at,
        )
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SetId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn last_used_at(&self) -> DateTime<Utc> {
        self.last_used_at
    }
}

/// Trims a set name, rejecting empty or whitespace-only input.
///
/// # Errors
///
/// Returns `SetError::EmptyName` if nothing remains after trimming.
pub fn normalize_name(name: impl Into<String>) -> Result<String, SetError> {
    let name = name.into();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SetError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

/// Trims an optional generation context, dropping it entirely when blank.
#[must_use]
pub fn normalize_context(context: Option<String>) -> Option<String> {
    context
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
}
