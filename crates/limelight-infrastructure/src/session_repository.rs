//! In-memory session repository implementation.
//!
//! Each method takes the store lock exactly once, so the conditional
//! answer fill, the status compare-and-set and the vote-plus-tallies write
//! are each one atomic transaction.

use crate::store::MemoryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use limelight_core::error::{EngineError, Result};
use limelight_core::session::model::{
    Answer, Session, SessionGroup, SessionStatus, Vote, VoteValue,
};
use limelight_core::session::repository::SessionRepository;
use limelight_core::trust::session_trust_result;

/// Session repository backed by the shared [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemorySessionRepository {
    store: MemoryStore,
}

impl MemorySessionRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create_with_slots(
        &self,
        participant_id: &str,
        question_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<(Session, SessionGroup)> {
        let mut tables = self.store.tables.lock().await;

        // A participant owns at most one non-completed session at a time.
        let already_active = tables
            .sessions
            .values()
            .any(|s| s.participant_id == participant_id && s.status.is_active());
        if already_active {
            return Err(EngineError::conflict(format!(
                "participant '{}' already owns an active session",
                participant_id
            )));
        }

        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            participant_id: participant_id.to_string(),
            status: SessionStatus::Waiting,
            created_at: now,
            started_at: None,
            ended_at: None,
            true_votes: 0,
            false_votes: 0,
            total_votes: 0,
            trust_result: None,
        };
        let group = SessionGroup {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session.id.clone(),
            created_at: now,
        };

        for (order_index, question_id) in question_ids.iter().enumerate() {
            tables.answers.push(Answer {
                id: uuid::Uuid::new_v4().to_string(),
                session_id: session.id.clone(),
                question_id: question_id.clone(),
                order_index,
                text: String::new(),
                revealed_at: None,
            });
        }
        tables.sessions.insert(session.id.clone(), session.clone());
        tables.groups.push(group.clone());

        Ok((session, group))
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut tables = self.store.tables.lock().await;
        tables.sessions.remove(session_id);
        let group_ids: Vec<String> = tables
            .groups
            .iter()
            .filter(|g| g.session_id == session_id)
            .map(|g| g.id.clone())
            .collect();
        tables.groups.retain(|g| g.session_id != session_id);
        tables
            .assignments
            .retain(|a| !group_ids.iter().any(|id| id == &a.group_id));
        tables.answers.retain(|a| a.session_id != session_id);
        tables.votes.retain(|v| v.session_id != session_id);
        Ok(())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let tables = self.store.tables.lock().await;
        Ok(tables.sessions.get(session_id).cloned())
    }

    async fn find_active_by_participant(&self, participant_id: &str) -> Result<Option<Session>> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .sessions
            .values()
            .find(|s| s.participant_id == participant_id && s.status.is_active())
            .cloned())
    }

    async fn active_participant_ids(&self) -> Result<Vec<String>> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .sessions
            .values()
            .filter(|s| s.status.is_active())
            .map(|s| s.participant_id.clone())
            .collect())
    }

    async fn count_active(&self) -> Result<u64> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .sessions
            .values()
            .filter(|s| s.status.is_active())
            .count() as u64)
    }

    async fn count_created_since(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .sessions
            .values()
            .filter(|s| s.created_at >= cutoff)
            .count() as u64)
    }

    async fn list_completed_for_participant(&self, participant_id: &str) -> Result<Vec<Session>> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .sessions
            .values()
            .filter(|s| s.participant_id == participant_id && s.status == SessionStatus::Completed)
            .cloned()
            .collect())
    }

    async fn fill_answer(
        &self,
        session_id: &str,
        question_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Answer> {
        let mut tables = self.store.tables.lock().await;
        let answer = tables
            .answers
            .iter_mut()
            .find(|a| a.session_id == session_id && a.question_id == question_id)
            .ok_or_else(|| EngineError::not_found("answer", format!("{session_id}/{question_id}")))?;

        // The guard and the write share the critical section; a concurrent
        // duplicate submission sees the non-empty text and conflicts.
        if !answer.text.is_empty() {
            return Err(EngineError::conflict(
                "answer already submitted, editing is not allowed",
            ));
        }
        answer.text = text.to_string();
        answer.revealed_at = Some(now);
        Ok(answer.clone())
    }

    async fn count_unanswered(&self, session_id: &str) -> Result<usize> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| a.session_id == session_id && a.is_unanswered())
            .count())
    }

    async fn answers_for_session(&self, session_id: &str) -> Result<Vec<Answer>> {
        let tables = self.store.tables.lock().await;
        let mut answers: Vec<Answer> = tables
            .answers
            .iter()
            .filter(|a| a.session_id == session_id)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.order_index);
        Ok(answers)
    }

    async fn question_ids_seen_by_participant(&self, participant_id: &str) -> Result<Vec<String>> {
        let tables = self.store.tables.lock().await;
        let session_ids: Vec<&str> = tables
            .sessions
            .values()
            .filter(|s| s.participant_id == participant_id)
            .map(|s| s.id.as_str())
            .collect();
        Ok(tables
            .answers
            .iter()
            .filter(|a| session_ids.iter().any(|id| *id == a.session_id))
            .map(|a| a.question_id.clone())
            .collect())
    }

    async fn transition_status(
        &self,
        session_id: &str,
        from: SessionStatus,
        to: SessionStatus,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tables = self.store.tables.lock().await;
        let session = tables
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| EngineError::not_found("session", session_id))?;

        if session.status != from {
            return Ok(false);
        }
        session.status = to;
        if to == SessionStatus::InProgress && session.started_at.is_none() {
            session.started_at = Some(now);
        }
        if to == SessionStatus::Completed {
            session.ended_at = Some(now);
        }
        Ok(true)
    }

    async fn insert_vote(
        &self,
        session_id: &str,
        voter_id: &str,
        value: VoteValue,
        now: DateTime<Utc>,
    ) -> Result<Vote> {
        let mut tables = self.store.tables.lock().await;
        let status = tables
            .sessions
            .get(session_id)
            .map(|s| s.status)
            .ok_or_else(|| EngineError::not_found("session", session_id))?;

        // Vote rows exist only for sessions in the voting stage. Checking
        // inside the critical section closes the race with finalize: a vote
        // that loses to completion sees Completed here and conflicts, so
        // tallies never move after trust_result is set.
        if status != SessionStatus::Voting {
            return Err(EngineError::conflict("session is not open for voting"));
        }

        // Uniqueness constraint on (session, voter)
        let duplicate = tables
            .votes
            .iter()
            .any(|v| v.session_id == session_id && v.voter_id == voter_id);
        if duplicate {
            return Err(EngineError::conflict("voter already voted on this session"));
        }

        let vote = Vote {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            voter_id: voter_id.to_string(),
            value,
            created_at: now,
        };
        tables.votes.push(vote.clone());

        let session = tables
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| EngineError::not_found("session", session_id))?;
        session.total_votes += 1;
        match value {
            VoteValue::True => session.true_votes += 1,
            VoteValue::False => session.false_votes += 1,
        }
        Ok(vote)
    }

    async fn find_vote(&self, session_id: &str, voter_id: &str) -> Result<Option<Vote>> {
        let tables = self.store.tables.lock().await;
        Ok(tables
            .votes
            .iter()
            .find(|v| v.session_id == session_id && v.voter_id == voter_id)
            .cloned())
    }

    async fn finalize(&self, session_id: &str, now: DateTime<Utc>) -> Result<Session> {
        let mut tables = self.store.tables.lock().await;
        let session = tables
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| EngineError::not_found("session", session_id))?;

        // Compare-and-set: a second finalize sees Completed and conflicts
        // instead of applying the score twice.
        if session.status != SessionStatus::Voting {
            return Err(EngineError::conflict(
                "session is not in the voting stage, cannot complete",
            ));
        }
        session.status = SessionStatus::Completed;
        session.ended_at = Some(now);
        session.trust_result = Some(session_trust_result(
            session.true_votes,
            session.total_votes,
        ));
        Ok(session.clone())
    }
}
