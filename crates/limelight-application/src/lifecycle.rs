//! Session lifecycle use cases: answer submission, vote submission and
//! completion.
//!
//! All status changes go through the core transition table and are applied
//! with compare-and-set repository operations, so two near-simultaneous
//! "last answer" submissions or completion calls cannot double-fire a
//! transition.

use crate::trust_service::TrustService;
use limelight_core::config::EngineConfig;
use limelight_core::error::{EngineError, Result};
use limelight_core::session::lifecycle::{SessionEvent, transition};
use limelight_core::session::model::{Answer, Session, SessionStatus, Vote, VoteValue};
use limelight_core::session::repository::SessionRepository;
use limelight_core::user::repository::UserRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Outcome of an accepted answer submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub answer: Answer,
    /// Empty slots left after this submission. Zero means the session
    /// just moved to voting.
    pub remaining_questions: usize,
}

/// Outcome of a completed session, with the participant's updated
/// reputation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub session: Session,
    pub trust_score: f64,
    pub participant_frozen: bool,
}

/// Drives sessions through their lifecycle.
pub struct SessionLifecycle {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
    trust: Arc<TrustService>,
    config: EngineConfig,
}

impl SessionLifecycle {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        trust: Arc<TrustService>,
        config: EngineConfig,
    ) -> Self {
        Self {
            sessions,
            users,
            trust,
            config,
        }
    }

    /// Submits the participant's answer to one question of their session.
    ///
    /// On the first accepted answer the session moves WAITING ->
    /// IN_PROGRESS; when the last empty slot fills it moves to VOTING.
    pub async fn submit_answer(
        &self,
        caller_id: &str,
        session_id: &str,
        question_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome> {
        if text.is_empty() {
            return Err(EngineError::validation("answer text must not be empty"));
        }
        if text.chars().count() > self.config.max_answer_length {
            return Err(EngineError::validation(format!(
                "answer must not exceed {} characters",
                self.config.max_answer_length
            )));
        }

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| EngineError::not_found("session", session_id))?;
        if session.participant_id != caller_id {
            return Err(EngineError::authorization(
                "only the session's participant may answer",
            ));
        }
        let status_before = session.status;
        if !matches!(
            status_before,
            SessionStatus::Waiting | SessionStatus::InProgress
        ) {
            return Err(EngineError::conflict(
                "session is no longer accepting answers",
            ));
        }

        let answer = self
            .sessions
            .fill_answer(session_id, question_id, text, now)
            .await?;

        if status_before == SessionStatus::Waiting {
            if let Some(next) = transition(SessionStatus::Waiting, SessionEvent::FirstAnswer) {
                // Losing this CAS just means another answer got in first.
                self.sessions
                    .transition_status(session_id, SessionStatus::Waiting, next, now)
                    .await?;
            }
        }

        // The voting decision is computed from a count taken after the
        // write; the CAS keeps a racing last answer from flipping twice.
        let remaining = self.sessions.count_unanswered(session_id).await?;
        if remaining == 0 {
            for from in [SessionStatus::InProgress, SessionStatus::Waiting] {
                if let Some(next) = transition(from, SessionEvent::LastAnswer) {
                    if self
                        .sessions
                        .transition_status(session_id, from, next, now)
                        .await?
                    {
                        tracing::info!(session = session_id, "all answers in, voting opened");
                        break;
                    }
                }
            }
        }

        Ok(AnswerOutcome {
            answer,
            remaining_questions: remaining,
        })
    }

    /// Casts a truthfulness vote on a session in the voting stage.
    pub async fn submit_vote(
        &self,
        caller_id: &str,
        session_id: &str,
        value: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Vote> {
        let voter = self
            .users
            .find_by_id(caller_id)
            .await?
            .ok_or_else(|| EngineError::not_found("user", caller_id))?;
        if voter.is_frozen {
            return Err(EngineError::authorization("frozen accounts cannot vote"));
        }

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| EngineError::not_found("session", session_id))?;
        if session.status != SessionStatus::Voting {
            return Err(EngineError::conflict("session is not open for voting"));
        }
        if session.participant_id == caller_id {
            return Err(EngineError::authorization(
                "participants cannot vote on their own session",
            ));
        }

        // Store-level uniqueness turns a duplicate into a Conflict here.
        let vote = self
            .sessions
            .insert_vote(session_id, caller_id, value, now)
            .await?;
        Ok(vote)
    }

    /// Closes voting: VOTING -> COMPLETED, trust result derived from the
    /// tallies, then the participant's score and freeze status refresh.
    ///
    /// Re-invoking on an already completed session is rejected with a
    /// Conflict so the score is never applied twice.
    pub async fn complete(&self, session_id: &str, now: DateTime<Utc>) -> Result<CompletionOutcome> {
        let session = self.sessions.finalize(session_id, now).await?;
        tracing::info!(
            session = session_id,
            trust_result = session.trust_result,
            votes = session.total_votes,
            "session completed"
        );

        let trust_score = self.trust.recalculate(&session.participant_id).await?;
        let participant_frozen = self.trust.evaluate_freeze(&session.participant_id).await?;
        Ok(CompletionOutcome {
            session,
            trust_score,
            participant_frozen,
        })
    }
}
