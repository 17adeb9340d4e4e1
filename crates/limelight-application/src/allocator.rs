//! Viewer pool allocation.
//!
//! Two entry points: the batch distribution run once per creation cycle,
//! and the late-join path that attaches a single polling user to the
//! smallest active cohort.

use limelight_core::config::EngineConfig;
use limelight_core::error::Result;
use limelight_core::group::model::GroupAssignment;
use limelight_core::group::repository::GroupRepository;
use limelight_core::random::RandomSource;
use limelight_core::session::model::SessionGroup;
use limelight_core::user::repository::UserRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Distributes idle viewers across session cohorts.
pub struct ViewerAllocator {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    random: Arc<dyn RandomSource>,
    config: EngineConfig,
}

impl ViewerAllocator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        random: Arc<dyn RandomSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            users,
            groups,
            random,
            config,
        }
    }

    /// One-shot batch distribution for freshly created sessions.
    ///
    /// Gathers every active, unfrozen user who is neither one of this
    /// cycle's participants nor already assigned to an active group,
    /// shuffles them uniformly, and deals them round-robin so group sizes
    /// differ by at most one. Late joiners are not this method's concern.
    pub async fn distribute(
        &self,
        new_groups: &[SessionGroup],
        participant_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if new_groups.is_empty() {
            return Ok(0);
        }

        let cutoff = now - self.config.active_window();
        let already_assigned = self.groups.assigned_user_ids_for_active_groups().await?;
        let viewers: Vec<String> = self
            .users
            .list_active_since(cutoff)
            .await?
            .into_iter()
            .map(|u| u.id)
            .filter(|id| !participant_ids.iter().any(|p| p == id))
            .filter(|id| !already_assigned.iter().any(|a| a == id))
            .collect();

        // Uniform shuffle, no bias toward recently active users
        let order = self.random.permutation(viewers.len());
        for (i, viewer_index) in order.into_iter().enumerate() {
            let group = &new_groups[i % new_groups.len()];
            self.groups
                .assign(&group.id, &viewers[viewer_index], now)
                .await?;
        }

        tracing::info!(
            viewers = viewers.len(),
            groups = new_groups.len(),
            "distributed viewer pool"
        );
        Ok(viewers.len())
    }

    /// Late join: attaches `user_id` to the active group with the fewest
    /// assignments (creation order breaks ties). Idempotent when the user
    /// is already in that group; `None` when no active group exists.
    pub async fn assign_to_smallest_group(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<GroupAssignment>> {
        let groups = self.groups.active_groups_by_size().await?;
        let Some((smallest, _size)) = groups.first() else {
            return Ok(None);
        };
        let assignment = self.groups.assign(&smallest.id, user_id, now).await?;
        Ok(Some(assignment))
    }
}
