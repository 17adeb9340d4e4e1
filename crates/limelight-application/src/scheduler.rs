//! The periodic creation cycle.
//!
//! The engine exposes a single "run one creation cycle" operation and a
//! shared-secret trigger wrapper around it; how the trigger fires (cron,
//! external timer, a poll with no assignment) is not its concern.

use crate::allocator::ViewerAllocator;
use crate::eligibility::EligibilitySelector;
use crate::question_selector::QuestionSelector;
use limelight_core::config::EngineConfig;
use limelight_core::error::{EngineError, Result};
use limelight_core::question::model::Question;
use limelight_core::session::SessionRepository;
use limelight_core::session::model::{Session, SessionGroup};
use limelight_core::user::model::User;
use limelight_core::user::repository::UserRepository;
use chrono::{DateTime, NaiveTime, Utc};
use std::sync::Arc;

/// A session created by one cycle, with its cohort group and question set.
#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub session: Session,
    pub group: SessionGroup,
    pub questions: Vec<Question>,
}

/// Result of an authenticated trigger invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerOutcome {
    pub created: usize,
    pub session_ids: Vec<String>,
}

/// Runs creation cycles.
pub struct Scheduler {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    eligibility: EligibilitySelector,
    question_selector: QuestionSelector,
    allocator: ViewerAllocator,
    config: EngineConfig,
    trigger_secret: String,
}

impl Scheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        eligibility: EligibilitySelector,
        question_selector: QuestionSelector,
        allocator: ViewerAllocator,
        config: EngineConfig,
        trigger_secret: impl Into<String>,
    ) -> Self {
        Self {
            users,
            sessions,
            eligibility,
            question_selector,
            allocator,
            config,
            trigger_secret: trigger_secret.into(),
        }
    }

    /// The protected periodic-invocation surface.
    ///
    /// Authenticates the shared secret, runs one cycle, and reports only
    /// the count and ids of new sessions. Internal failures surface as an
    /// opaque Internal error.
    pub async fn trigger(&self, secret: &str, now: DateTime<Utc>) -> Result<TriggerOutcome> {
        if secret != self.trigger_secret {
            return Err(EngineError::authorization("invalid trigger secret"));
        }
        let created = self.run_cycle(now).await.map_err(|e| {
            tracing::error!(error = %e, "creation cycle failed");
            EngineError::internal("session creation cycle failed")
        })?;
        Ok(TriggerOutcome {
            created: created.len(),
            session_ids: created.iter().map(|c| c.session.id.clone()).collect(),
        })
    }

    /// Runs one session creation cycle.
    ///
    /// Quota: `floor(active_users / users_per_session)` minus currently
    /// active sessions, clamped by what remains of the daily cap. The
    /// bootstrap rule forces a single session when the quota rounds to
    /// zero while nothing is active and enough users are around — but the
    /// daily cap is checked first and the bootstrap session counts against
    /// it like any other.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<Vec<CreatedSession>> {
        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let today_count = self.sessions.count_created_since(today_start).await?;
        if today_count >= u64::from(self.config.max_daily_sessions) {
            tracing::debug!(today_count, "daily session cap reached");
            return Ok(Vec::new());
        }

        let cutoff = now - self.config.active_window();
        let active_users = self.users.count_active_since(cutoff).await?;
        let active_sessions = self.sessions.count_active().await?;

        let target = active_users / u64::from(self.config.users_per_session);
        let remaining_quota = u64::from(self.config.max_daily_sessions) - today_count;
        let needed = target.saturating_sub(active_sessions).min(remaining_quota);

        if active_users < u64::from(self.config.min_users_for_session) && active_sessions == 0 {
            tracing::debug!(active_users, "not enough users for any session");
            return Ok(Vec::new());
        }

        // Bootstrap: enough users for one session, but the quota rounded
        // down to zero and nothing is running.
        let to_create = if needed == 0
            && active_sessions == 0
            && active_users >= u64::from(self.config.min_users_for_session)
        {
            1
        } else {
            needed
        };
        if to_create == 0 {
            return Ok(Vec::new());
        }

        let participants = self.eligibility.select(to_create as usize, now).await?;
        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let mut created = Vec::new();
        for participant in &participants {
            // One bad participant never aborts the batch.
            match self.create_for_participant(participant, now).await {
                Ok(Some(session)) => created.push(session),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        participant = participant.id,
                        error = %e,
                        "skipping participant after creation failure"
                    );
                }
            }
        }

        if !created.is_empty() {
            let participant_ids: Vec<String> = created
                .iter()
                .map(|c| c.session.participant_id.clone())
                .collect();
            let groups: Vec<SessionGroup> = created.iter().map(|c| c.group.clone()).collect();
            self.allocator
                .distribute(&groups, &participant_ids, now)
                .await?;
        }

        tracing::info!(created = created.len(), "creation cycle finished");
        Ok(created)
    }

    /// Creates the session bundle for one participant, or `None` when the
    /// question bank cannot supply a full set. A failure after the bundle
    /// exists rolls the whole bundle back so no orphan rows remain.
    async fn create_for_participant(
        &self,
        participant: &User,
        now: DateTime<Utc>,
    ) -> Result<Option<CreatedSession>> {
        let Some(questions) = self.question_selector.select_for(&participant.id).await? else {
            return Ok(None);
        };
        let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();

        let (session, group) = self
            .sessions
            .create_with_slots(&participant.id, &question_ids, now)
            .await?;

        if let Err(e) = self.users.record_appearance(&participant.id, now).await {
            self.sessions.delete_session(&session.id).await?;
            return Err(e);
        }

        // The bundle is now committed, so the exposure bookkeeping sticks.
        self.question_selector.commit_usage(&questions).await?;

        Ok(Some(CreatedSession {
            session,
            group,
            questions,
        }))
    }
}
