//! The polling view.
//!
//! Clients observe state by re-fetching their current assignment; there is
//! no push delivery. Every poll also stamps the user's activity, which is
//! what feeds the active-user window.

use crate::allocator::ViewerAllocator;
use limelight_core::config::EngineConfig;
use limelight_core::error::{EngineError, Result};
use limelight_core::group::repository::GroupRepository;
use limelight_core::question::model::QuestionCategory;
use limelight_core::question::repository::QuestionRepository;
use limelight_core::session::SessionRepository;
use limelight_core::session::model::{Session, VoteValue};
use limelight_core::user::repository::UserRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One answered (or pending) question as shown to clients, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerView {
    pub question_id: String,
    pub question_text: String,
    pub category: QuestionCategory,
    pub order_index: usize,
    /// Empty until the participant reveals the answer
    pub answer_text: String,
}

/// A session as shown to clients, with its ordered answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session: Session,
    pub answers: Vec<AnswerView>,
}

/// What a polling user currently sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssignmentView {
    /// The user is the participant of an active session.
    Participant { session: SessionView },
    /// The user is a viewer attached to an active session.
    Viewer {
        session: SessionView,
        has_voted: bool,
        vote: Option<VoteValue>,
    },
    /// Just assigned to a cohort; the next poll returns the session.
    Waiting,
    /// Nothing active; live counts so the client can show progress.
    NoSession {
        active_users: u64,
        active_sessions: u64,
        min_users_needed: u32,
    },
}

/// Answers the "what am I looking at right now" poll.
pub struct AssignmentQuery {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    groups: Arc<dyn GroupRepository>,
    questions: Arc<dyn QuestionRepository>,
    allocator: Arc<ViewerAllocator>,
    config: EngineConfig,
}

impl AssignmentQuery {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        groups: Arc<dyn GroupRepository>,
        questions: Arc<dyn QuestionRepository>,
        allocator: Arc<ViewerAllocator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            groups,
            questions,
            allocator,
            config,
        }
    }

    /// Resolves the current view for a user, trying late-join assignment
    /// when they have none.
    pub async fn current_view(&self, user_id: &str, now: DateTime<Utc>) -> Result<AssignmentView> {
        self.users.touch_activity(user_id, now).await?;

        // Participant of an active session?
        if let Some(session) = self.sessions.find_active_by_participant(user_id).await? {
            let view = self.session_view(session).await?;
            return Ok(AssignmentView::Participant { session: view });
        }

        // Viewer in an active cohort?
        if let Some((_assignment, group)) = self.groups.find_active_assignment(user_id).await? {
            let session = self
                .sessions
                .find_by_id(&group.session_id)
                .await?
                .ok_or_else(|| EngineError::not_found("session", group.session_id.clone()))?;
            let vote = self.sessions.find_vote(&session.id, user_id).await?;
            let view = self.session_view(session).await?;
            return Ok(AssignmentView::Viewer {
                session: view,
                has_voted: vote.is_some(),
                vote: vote.map(|v| v.value),
            });
        }

        // Late join into the smallest cohort, if one exists
        if self
            .allocator
            .assign_to_smallest_group(user_id, now)
            .await?
            .is_some()
        {
            return Ok(AssignmentView::Waiting);
        }

        let cutoff = now - self.config.active_window();
        Ok(AssignmentView::NoSession {
            active_users: self.users.count_active_since(cutoff).await?,
            active_sessions: self.sessions.count_active().await?,
            min_users_needed: self.config.min_users_for_session,
        })
    }

    async fn session_view(&self, session: Session) -> Result<SessionView> {
        let answers = self.sessions.answers_for_session(&session.id).await?;
        let mut views = Vec::with_capacity(answers.len());
        for answer in answers {
            let question = self
                .questions
                .find_by_id(&answer.question_id)
                .await?
                .ok_or_else(|| EngineError::not_found("question", answer.question_id.clone()))?;
            views.push(AnswerView {
                question_id: question.id,
                question_text: question.text,
                category: question.category,
                order_index: answer.order_index,
                answer_text: answer.text,
            });
        }
        Ok(SessionView {
            session,
            answers: views,
        })
    }
}
