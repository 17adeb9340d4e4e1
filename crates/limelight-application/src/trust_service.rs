//! Trust score recomputation and freeze policy application.

use limelight_core::config::EngineConfig;
use limelight_core::error::{EngineError, Result};
use limelight_core::session::SessionRepository;
use limelight_core::trust;
use limelight_core::user::repository::UserRepository;
use std::sync::Arc;

/// Applies the trust math to stored state.
pub struct TrustService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    config: EngineConfig,
}

impl TrustService {
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

    /// Recomputes the participant's trust score from scratch over all of
    /// their completed sessions and stores it.
    ///
    /// Full recomputation costs O(past sessions) but stays correct under
    /// out-of-order completion; participants appear at most a few dozen
    /// times, so the cost is acceptable.
    pub async fn recalculate(&self, participant_id: &str) -> Result<f64> {
        let completed = self
            .sessions
            .list_completed_for_participant(participant_id)
            .await?;
        let score = trust::mean_trust_score(&completed, self.config.default_trust_score);
        self.users.set_trust_score(participant_id, score).await?;
        tracing::info!(
            participant = participant_id,
            score,
            sessions = completed.len(),
            "trust score recalculated"
        );
        Ok(score)
    }

    /// Evaluates the freeze policy against current state and applies it.
    ///
    /// Returns whether the participant is now frozen. The freeze is
    /// permanent as far as this engine is concerned; reversal is an
    /// external operation.
    pub async fn evaluate_freeze(&self, participant_id: &str) -> Result<bool> {
        let user = self
            .users
            .find_by_id(participant_id)
            .await?
            .ok_or_else(|| EngineError::not_found("user", participant_id))?;
        let completed = self
            .sessions
            .list_completed_for_participant(participant_id)
            .await?;

        if !trust::should_freeze(&user, &completed, &self.config) {
            return Ok(false);
        }
        self.users.set_frozen(participant_id, true).await?;
        tracing::warn!(
            participant = participant_id,
            trust_score = user.trust_score,
            "participant frozen"
        );
        Ok(true)
    }
}
