//! User repository trait.
//!
//! Defines the interface for user persistence operations. Counter updates
//! (`record_appearance`) are modeled as atomic store operations rather than
//! read-modify-write in application memory.

use super::model::{User, UserRole};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filter for the eligibility query.
///
/// Mirrors the selection contract: participant role, not frozen, active
/// within the recency window, not currently appearing, and past the
/// appearance cooldown (or never appeared).
#[derive(Debug, Clone)]
pub struct ParticipantFilter {
    /// Users must have been active at or after this instant.
    pub active_since: DateTime<Utc>,
    /// Users whose last appearance is after this instant are still cooling
    /// down and excluded. Never-appeared users always pass.
    pub cooldown_cutoff: DateTime<Utc>,
    /// Ids to exclude (participants of non-completed sessions).
    pub exclude_ids: Vec<String>,
    /// Maximum number of users to return.
    pub limit: usize,
}

/// An abstract repository for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>>;

    /// Inserts a new user.
    async fn insert(&self, user: &User) -> Result<()>;

    /// Stamps `last_active_at`. Called on every poll.
    async fn touch_activity(&self, user_id: &str, now: DateTime<Utc>) -> Result<()>;

    /// Counts unfrozen users active at or after `cutoff`.
    async fn count_active_since(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Lists unfrozen users active at or after `cutoff`, any role.
    async fn list_active_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<User>>;

    /// Finds eligible participants, ordered ascending by
    /// `last_appearance_date` with never-appeared users first.
    ///
    /// Returns fewer than `filter.limit` when the pool is short; callers
    /// must treat partial results as valid.
    async fn find_participants_for_selection(
        &self,
        role: UserRole,
        filter: &ParticipantFilter,
    ) -> Result<Vec<User>>;

    /// Atomically stamps `last_appearance_date` and increments
    /// `appearance_count` by one.
    async fn record_appearance(&self, user_id: &str, now: DateTime<Utc>) -> Result<()>;

    /// Overwrites the trust score.
    async fn set_trust_score(&self, user_id: &str, trust_score: f64) -> Result<()>;

    /// Sets or clears the frozen flag.
    async fn set_frozen(&self, user_id: &str, frozen: bool) -> Result<()>;
}
