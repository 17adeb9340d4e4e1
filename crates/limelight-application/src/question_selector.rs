//! Question selection.
//!
//! Picks exactly K category-diverse questions for a participant: shuffle
//! the category enumeration, take the first K, and within each category
//! prefer the least-used active question the participant has never seen.
//! Usage counts are bumped separately once the session bundle commits,
//! which load-balances exposure across the bank over time.

use limelight_core::config::EngineConfig;
use limelight_core::error::Result;
use limelight_core::question::model::{Question, QuestionCategory};
use limelight_core::question::repository::QuestionRepository;
use limelight_core::random::RandomSource;
use limelight_core::session::SessionRepository;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// Selects the question set for a new session.
pub struct QuestionSelector {
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    random: Arc<dyn RandomSource>,
    config: EngineConfig,
}

impl QuestionSelector {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        random: Arc<dyn RandomSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            questions,
            sessions,
            random,
            config,
        }
    }

    /// Selects questions for `participant_id`.
    ///
    /// Returns `None` when fewer than K questions could be sourced; the
    /// caller must then treat the session as not creatable and leave no
    /// partial rows behind. Selection reads the bank but writes nothing:
    /// usage counters move only through [`Self::commit_usage`].
    pub async fn select_for(&self, participant_id: &str) -> Result<Option<Vec<Question>>> {
        let k = self.config.questions_per_session;

        let categories: Vec<QuestionCategory> = QuestionCategory::iter().collect();
        let order = self.random.permutation(categories.len());
        let chosen: Vec<QuestionCategory> =
            order.into_iter().take(k).map(|i| categories[i]).collect();

        let seen = self
            .sessions
            .question_ids_seen_by_participant(participant_id)
            .await?;

        let mut selected = Vec::with_capacity(k);
        for category in chosen {
            let candidate = match self
                .questions
                .find_least_used_active(category, &seen)
                .await?
            {
                Some(q) => Some(q),
                // Edge case: the participant has exhausted this category.
                // Drop the exclusion rather than failing the session.
                None => self.questions.find_least_used_active(category, &[]).await?,
            };

            let Some(question) = candidate else {
                tracing::debug!(?category, "no candidate question in category");
                continue;
            };
            selected.push(question);
        }

        if selected.len() < k {
            tracing::warn!(
                participant = participant_id,
                selected = selected.len(),
                required = k,
                "question shortfall, session not creatable"
            );
            return Ok(None);
        }

        Ok(Some(selected))
    }

    /// Bumps the usage counter of every question in a committed session.
    ///
    /// Kept separate from selection so a creation that rolls back after
    /// selection (appearance bookkeeping failed, bundle deleted) leaves no
    /// phantom exposure in the bank.
    pub async fn commit_usage(&self, questions: &[Question]) -> Result<()> {
        for question in questions {
            self.questions.increment_usage(&question.id).await?;
        }
        Ok(())
    }
}
