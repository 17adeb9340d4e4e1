//! Eligibility selection.
//!
//! Finds participants allowed to go under the light this cycle: not
//! frozen, active within the recency window, not already appearing, and
//! past the appearance cooldown (or never appeared at all).

use limelight_core::config::EngineConfig;
use limelight_core::error::Result;
use limelight_core::session::SessionRepository;
use limelight_core::user::model::{User, UserRole};
use limelight_core::user::repository::{ParticipantFilter, UserRepository};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Selects eligible participants for new sessions.
pub struct EligibilitySelector {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    config: EngineConfig,
}

impl EligibilitySelector {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        config: EngineConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Returns up to `count` eligible participants, those who have waited
    /// longest (or never appeared) first.
    ///
    /// A short result is a valid outcome, not an error: the caller simply
    /// creates fewer sessions.
    pub async fn select(&self, count: usize, now: DateTime<Utc>) -> Result<Vec<User>> {
        let exclude_ids = self.sessions.active_participant_ids().await?;
        let filter = ParticipantFilter {
            active_since: now - self.config.active_window(),
            cooldown_cutoff: now - self.config.appearance_cooldown(),
            exclude_ids,
            limit: count,
        };
        let eligible = self
            .users
            .find_participants_for_selection(UserRole::Participant, &filter)
            .await?;
        tracing::debug!(
            requested = count,
            found = eligible.len(),
            "eligibility selection finished"
        );
        Ok(eligible)
    }
}
