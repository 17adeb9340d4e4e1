//! Group repository trait.

use super::model::GroupAssignment;
use crate::error::Result;
use crate::session::model::SessionGroup;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An abstract repository for viewer cohorts.
///
/// "Active" throughout this trait means: the group's session is not yet
/// completed.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Active groups with their assignment counts, ascending by size with
    /// group creation order as the tie-break.
    async fn active_groups_by_size(&self) -> Result<Vec<(SessionGroup, usize)>>;

    /// Attaches a user to a group. Idempotent: when the (group, user) pair
    /// already exists the existing assignment is returned, not an error.
    async fn assign(
        &self,
        group_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<GroupAssignment>;

    /// Ids of all users currently assigned to any active group.
    async fn assigned_user_ids_for_active_groups(&self) -> Result<Vec<String>>;

    /// The user's assignment to an active group, with that group, if any.
    async fn find_active_assignment(
        &self,
        user_id: &str,
    ) -> Result<Option<(GroupAssignment, SessionGroup)>>;
}
