//! End-to-end scenarios for the orchestration engine, run against the
//! in-memory infrastructure with seeded randomness.

use chrono::{DateTime, Duration, Utc};
use limelight_application::allocator::ViewerAllocator;
use limelight_application::assignment::{AssignmentQuery, AssignmentView};
use limelight_application::eligibility::EligibilitySelector;
use limelight_application::lifecycle::SessionLifecycle;
use limelight_application::question_selector::QuestionSelector;
use limelight_application::scheduler::Scheduler;
use limelight_application::trust_service::TrustService;
use limelight_core::config::EngineConfig;
use limelight_core::group::repository::GroupRepository;
use limelight_core::question::model::{Question, QuestionCategory};
use limelight_core::question::repository::QuestionRepository;
use limelight_core::random::SeededRandomSource;
use limelight_core::session::model::{SessionStatus, VoteValue};
use limelight_core::session::repository::SessionRepository;
use limelight_core::user::model::{User, UserRole};
use limelight_core::user::repository::UserRepository;
use limelight_infrastructure::{
    MemoryGroupRepository, MemoryQuestionRepository, MemorySessionRepository, MemoryStore,
    MemoryUserRepository,
};
use std::sync::Arc;
use strum::IntoEnumIterator;

const TRIGGER_SECRET: &str = "cycle-secret";

struct Engine {
    users: Arc<MemoryUserRepository>,
    sessions: Arc<MemorySessionRepository>,
    groups: Arc<MemoryGroupRepository>,
    lifecycle: SessionLifecycle,
    scheduler: Scheduler,
    assignment: AssignmentQuery,
    config: EngineConfig,
}

fn small_config() -> EngineConfig {
    EngineConfig {
        users_per_session: 3,
        min_users_for_session: 3,
        max_daily_sessions: 30,
        questions_per_session: 2,
        ..EngineConfig::default()
    }
}

async fn seed_question_bank(questions: &MemoryQuestionRepository) {
    for category in QuestionCategory::iter() {
        for i in 0..3 {
            questions
                .insert(&Question::new(format!("{category:?} #{i}"), category))
                .await
                .unwrap();
        }
    }
}

async fn seed_users(
    engine: &Engine,
    participants: usize,
    viewers: usize,
    now: DateTime<Utc>,
) -> (Vec<User>, Vec<User>) {
    let mut ps = Vec::new();
    for i in 0..participants {
        let user = User::new(format!("participant-{i}"), UserRole::Participant, 50.0, now);
        engine.users.insert(&user).await.unwrap();
        ps.push(user);
    }
    let mut vs = Vec::new();
    for i in 0..viewers {
        let user = User::new(format!("viewer-{i}"), UserRole::Viewer, 50.0, now);
        engine.users.insert(&user).await.unwrap();
        vs.push(user);
    }
    (ps, vs)
}

/// Convenience: an engine with a full question bank already seeded.
async fn ready_engine(config: EngineConfig, seed: u64) -> (Engine, Arc<MemoryQuestionRepository>) {
    let store = MemoryStore::new();
    let engine = engine_with_store(config, seed, store.clone());
    let questions = Arc::new(MemoryQuestionRepository::new(store));
    seed_question_bank(&questions).await;
    (engine, questions)
}

fn engine_with_store(config: EngineConfig, seed: u64, store: MemoryStore) -> Engine {
    let users = Arc::new(MemoryUserRepository::new(store.clone()));
    let sessions = Arc::new(MemorySessionRepository::new(store.clone()));
    let groups = Arc::new(MemoryGroupRepository::new(store.clone()));
    let questions = Arc::new(MemoryQuestionRepository::new(store.clone()));
    let random = Arc::new(SeededRandomSource::new(seed));

    let trust = Arc::new(TrustService::new(
        users.clone(),
        sessions.clone(),
        config.clone(),
    ));
    let lifecycle = SessionLifecycle::new(
        sessions.clone(),
        users.clone(),
        trust.clone(),
        config.clone(),
    );
    let allocator = Arc::new(ViewerAllocator::new(
        users.clone(),
        groups.clone(),
        random.clone(),
        config.clone(),
    ));
    let scheduler = Scheduler::new(
        users.clone(),
        sessions.clone(),
        EligibilitySelector::new(users.clone(), sessions.clone(), config.clone()),
        QuestionSelector::new(
            questions.clone(),
            sessions.clone(),
            random.clone(),
            config.clone(),
        ),
        ViewerAllocator::new(
            users.clone(),
            groups.clone(),
            random.clone(),
            config.clone(),
        ),
        config.clone(),
        TRIGGER_SECRET,
    );
    let assignment = AssignmentQuery::new(
        users.clone(),
        sessions.clone(),
        groups.clone(),
        questions.clone(),
        allocator,
        config.clone(),
    );

    Engine {
        users,
        sessions,
        groups,
        lifecycle,
        scheduler,
        assignment,
        config,
    }
}

// ============================================================================
// Answer submission and the countdown to voting
// ============================================================================

#[tokio::test]
async fn five_answers_count_down_to_voting() {
    let now = Utc::now();
    let config = EngineConfig {
        questions_per_session: 5,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 1).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;
    let participant = &participants[0];

    let question_ids: Vec<String> = (0..5).map(|i| format!("q{i}")).collect();
    let (session, _group) = engine
        .sessions
        .create_with_slots(&participant.id, &question_ids, now)
        .await
        .unwrap();

    // Answer 3 questions: still in progress, 2 remaining
    for (i, qid) in question_ids.iter().take(3).enumerate() {
        let outcome = engine
            .lifecycle
            .submit_answer(&participant.id, &session.id, qid, &format!("answer {i}"), now)
            .await
            .unwrap();
        assert_eq!(outcome.remaining_questions, 4 - i);
    }
    let stored = engine.sessions.find_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::InProgress);
    assert!(stored.started_at.is_some());

    // Fourth answer: one left, still in progress
    let outcome = engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, &question_ids[3], "fourth", now)
        .await
        .unwrap();
    assert_eq!(outcome.remaining_questions, 1);
    let stored = engine.sessions.find_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::InProgress);

    // Fifth answer flips the session to voting
    let outcome = engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, &question_ids[4], "fifth", now)
        .await
        .unwrap();
    assert_eq!(outcome.remaining_questions, 0);
    let stored = engine.sessions.find_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Voting);
}

#[tokio::test]
async fn answer_rules_are_enforced() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 2).await;
    let (participants, viewers) = seed_users(&engine, 1, 1, now).await;
    let participant = &participants[0];

    let (session, _) = engine
        .sessions
        .create_with_slots(&participant.id, &["q0".to_string(), "q1".to_string()], now)
        .await
        .unwrap();

    // Only the participant may answer
    let err = engine
        .lifecycle
        .submit_answer(&viewers[0].id, &session.id, "q0", "hello", now)
        .await
        .unwrap_err();
    assert!(err.is_authorization());

    // Length limit
    let long = "x".repeat(engine.config.max_answer_length + 1);
    let err = engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, "q0", &long, now)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // Unknown slot
    let err = engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, "q9", "hello", now)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    // No edit after submit: the first write wins and is never overwritten
    engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, "q0", "first", now)
        .await
        .unwrap();
    let err = engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, "q0", "second", now)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    let answers = engine.sessions.answers_for_session(&session.id).await.unwrap();
    assert_eq!(answers[0].text, "first");
}

// ============================================================================
// Voting
// ============================================================================

#[tokio::test]
async fn voting_rules_and_tally_consistency() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 3).await;
    let (participants, viewers) = seed_users(&engine, 1, 3, now).await;
    let participant = &participants[0];

    let (session, _) = engine
        .sessions
        .create_with_slots(&participant.id, &["q0".to_string()], now)
        .await
        .unwrap();

    // Voting before the voting stage conflicts
    let err = engine
        .lifecycle
        .submit_vote(&viewers[0].id, &session.id, VoteValue::True, now)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, "q0", "only answer", now)
        .await
        .unwrap();

    // Self-vote is rejected
    let err = engine
        .lifecycle
        .submit_vote(&participant.id, &session.id, VoteValue::True, now)
        .await
        .unwrap_err();
    assert!(err.is_authorization());

    // Frozen voters are rejected
    engine.users.set_frozen(&viewers[2].id, true).await.unwrap();
    let err = engine
        .lifecycle
        .submit_vote(&viewers[2].id, &session.id, VoteValue::True, now)
        .await
        .unwrap_err();
    assert!(err.is_authorization());

    engine
        .lifecycle
        .submit_vote(&viewers[0].id, &session.id, VoteValue::True, now)
        .await
        .unwrap();
    // Second vote from the same voter conflicts and changes nothing
    let err = engine
        .lifecycle
        .submit_vote(&viewers[0].id, &session.id, VoteValue::False, now)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    engine
        .lifecycle
        .submit_vote(&viewers[1].id, &session.id, VoteValue::False, now)
        .await
        .unwrap();

    let stored = engine.sessions.find_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(stored.total_votes, 2);
    assert_eq!(stored.true_votes, 1);
    assert_eq!(stored.false_votes, 1);
}

// ============================================================================
// Completion and trust scoring
// ============================================================================

async fn run_session_with_votes(
    engine: &Engine,
    participant: &User,
    true_votes: u32,
    false_votes: u32,
    now: DateTime<Utc>,
) -> limelight_application::lifecycle::CompletionOutcome {
    let (session, _) = engine
        .sessions
        .create_with_slots(&participant.id, &["q0".to_string()], now)
        .await
        .unwrap();
    engine
        .lifecycle
        .submit_answer(&participant.id, &session.id, "q0", "answer", now)
        .await
        .unwrap();

    for i in 0..true_votes {
        let voter = User::new(format!("t-{}-{i}", session.id), UserRole::Viewer, 50.0, now);
        engine.users.insert(&voter).await.unwrap();
        engine
            .lifecycle
            .submit_vote(&voter.id, &session.id, VoteValue::True, now)
            .await
            .unwrap();
    }
    for i in 0..false_votes {
        let voter = User::new(format!("f-{}-{i}", session.id), UserRole::Viewer, 50.0, now);
        engine.users.insert(&voter).await.unwrap();
        engine
            .lifecycle
            .submit_vote(&voter.id, &session.id, VoteValue::False, now)
            .await
            .unwrap();
    }

    engine.lifecycle.complete(&session.id, now).await.unwrap()
}

#[tokio::test]
async fn completion_derives_trust_result_and_is_final() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 4).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;

    let outcome = run_session_with_votes(&engine, &participants[0], 18, 12, now).await;
    assert_eq!(outcome.session.status, SessionStatus::Completed);
    assert_eq!(outcome.session.trust_result, Some(60.0));
    assert_eq!(outcome.session.ended_at, Some(now));
    // One qualifying session: the score is exactly its result
    assert_eq!(outcome.trust_score, 60.0);

    // Completing again is rejected, never silently repeated
    let err = engine
        .lifecycle
        .complete(&outcome.session.id, now)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    let stored = engine
        .sessions
        .find_by_id(&outcome.session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.trust_result, Some(60.0));
}

#[tokio::test]
async fn trust_score_is_the_unweighted_mean() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 5).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;
    let participant = &participants[0];

    // 80% over 10 votes, then 40% over 30 votes: mean is 60, not the
    // vote-weighted 50
    run_session_with_votes(&engine, participant, 8, 2, now).await;
    let outcome = run_session_with_votes(&engine, participant, 12, 18, now).await;
    assert!((outcome.trust_score - 60.0).abs() < 1e-9);

    let stored = engine.users.find_by_id(&participant.id).await.unwrap().unwrap();
    assert!((stored.trust_score - 60.0).abs() < 1e-9);
}

#[tokio::test]
async fn zero_vote_sessions_do_not_poison_the_score() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 6).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;

    let outcome = run_session_with_votes(&engine, &participants[0], 0, 0, now).await;
    assert_eq!(outcome.session.trust_result, Some(0.0));
    // The zero-vote session does not qualify; the neutral prior stands
    assert_eq!(outcome.trust_score, engine.config.default_trust_score);
}

// ============================================================================
// Freeze policy
// ============================================================================

#[tokio::test]
async fn sustained_low_trust_freezes_a_participant() {
    let now = Utc::now();
    let config = EngineConfig {
        min_appearances_for_freeze: 3,
        min_votes_per_session_for_freeze: 30,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 7).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;
    let participant = &participants[0];

    // Three appearances, each with 30 votes at ~7% truthful
    for _ in 0..3 {
        engine.users.record_appearance(&participant.id, now).await.unwrap();
    }
    run_session_with_votes(&engine, participant, 2, 28, now).await;
    run_session_with_votes(&engine, participant, 2, 28, now).await;
    let outcome = run_session_with_votes(&engine, participant, 2, 28, now).await;

    assert!(outcome.participant_frozen);
    let stored = engine.users.find_by_id(&participant.id).await.unwrap().unwrap();
    assert!(stored.is_frozen);
    assert!(stored.trust_score < 10.0);
}

#[tokio::test]
async fn thin_vote_samples_block_the_freeze() {
    let now = Utc::now();
    let config = EngineConfig {
        min_appearances_for_freeze: 3,
        min_votes_per_session_for_freeze: 30,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 8).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;
    let participant = &participants[0];

    for _ in 0..3 {
        engine.users.record_appearance(&participant.id, now).await.unwrap();
    }
    run_session_with_votes(&engine, participant, 2, 28, now).await;
    run_session_with_votes(&engine, participant, 2, 28, now).await;
    // Only 20 votes here: shields the participant despite the low score
    let outcome = run_session_with_votes(&engine, participant, 2, 18, now).await;

    assert!(!outcome.participant_frozen);
    let stored = engine.users.find_by_id(&participant.id).await.unwrap().unwrap();
    assert!(!stored.is_frozen);
    assert!(stored.trust_score < 10.0);
}

#[tokio::test]
async fn too_few_appearances_block_the_freeze() {
    let now = Utc::now();
    let config = EngineConfig {
        min_appearances_for_freeze: 3,
        min_votes_per_session_for_freeze: 30,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 9).await;
    let (participants, _) = seed_users(&engine, 1, 0, now).await;
    let participant = &participants[0];

    engine.users.record_appearance(&participant.id, now).await.unwrap();
    let outcome = run_session_with_votes(&engine, participant, 0, 30, now).await;

    // Score is rock bottom but one appearance is not enough
    assert_eq!(outcome.trust_score, 0.0);
    assert!(!outcome.participant_frozen);
}

// ============================================================================
// Scheduler
// ============================================================================

#[tokio::test]
async fn cycle_creates_sessions_and_balances_viewers() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 10).await;
    // 9 active users: target = 9 / 3 = 3, but only 2 eligible participants
    let (_participants, _viewers) = seed_users(&engine, 2, 7, now).await;

    let created = engine.scheduler.run_cycle(now).await.unwrap();
    assert_eq!(created.len(), 2);
    for c in &created {
        assert_eq!(c.session.status, SessionStatus::Waiting);
        assert_eq!(c.questions.len(), engine.config.questions_per_session);
        // Appearance bookkeeping happened
        let participant = engine
            .users
            .find_by_id(&c.session.participant_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(participant.appearance_count, 1);
        assert!(participant.last_appearance_date.is_some());
    }

    // 7 viewers over 2 cohorts: sizes differ by at most one
    let groups = engine.groups.active_groups_by_size().await.unwrap();
    let sizes: Vec<usize> = groups.iter().map(|(_, s)| *s).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 7);
    assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);
}

#[tokio::test]
async fn cycle_respects_the_minimum_user_gate() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 11).await;
    seed_users(&engine, 1, 1, now).await; // 2 active < 3 minimum

    let created = engine.scheduler.run_cycle(now).await.unwrap();
    assert!(created.is_empty());
}

#[tokio::test]
async fn bootstrap_creates_one_session_when_quota_rounds_to_zero() {
    let now = Utc::now();
    let config = EngineConfig {
        users_per_session: 10,
        min_users_for_session: 4,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 12).await;
    // 5 active users: target = 5 / 10 = 0, nothing active, minimum met
    seed_users(&engine, 1, 4, now).await;

    let created = engine.scheduler.run_cycle(now).await.unwrap();
    assert_eq!(created.len(), 1);
}

#[tokio::test]
async fn daily_cap_beats_the_bootstrap_rule() {
    let now = Utc::now();
    let config = EngineConfig {
        users_per_session: 10,
        min_users_for_session: 4,
        max_daily_sessions: 1,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 13).await;
    seed_users(&engine, 2, 4, now).await;

    let first = engine.scheduler.run_cycle(now).await.unwrap();
    assert_eq!(first.len(), 1);

    // Even after completing it, today's quota is spent
    let session_id = &first[0].session.id;
    engine
        .sessions
        .transition_status(session_id, SessionStatus::Waiting, SessionStatus::Voting, now)
        .await
        .unwrap();
    engine.lifecycle.complete(session_id, now).await.unwrap();

    let second = engine.scheduler.run_cycle(now).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn cycle_never_double_books_a_participant() {
    let now = Utc::now();
    let config = EngineConfig {
        users_per_session: 2,
        min_users_for_session: 2,
        ..small_config()
    };
    let (engine, _questions) = ready_engine(config, 14).await;
    seed_users(&engine, 1, 5, now).await;

    let first = engine.scheduler.run_cycle(now).await.unwrap();
    assert_eq!(first.len(), 1);

    // The sole participant is mid-session (and cooling down): no new one
    let second = engine.scheduler.run_cycle(now).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn question_usage_commits_only_with_the_session() {
    let now = Utc::now();
    let (engine, questions) = ready_engine(small_config(), 19).await;
    let (participants, _) = seed_users(&engine, 1, 2, now).await;

    // Selection alone writes nothing to the bank
    let selector = QuestionSelector::new(
        questions.clone(),
        engine.sessions.clone(),
        Arc::new(SeededRandomSource::new(99)),
        engine.config.clone(),
    );
    let picked = selector
        .select_for(&participants[0].id)
        .await
        .unwrap()
        .unwrap();
    for q in &picked {
        let stored = questions.find_by_id(&q.id).await.unwrap().unwrap();
        assert_eq!(stored.usage_count, 0);
    }

    // A committed session bumps exactly its own questions by one
    let created = engine.scheduler.run_cycle(now).await.unwrap();
    assert_eq!(created.len(), 1);
    for q in &created[0].questions {
        let stored = questions.find_by_id(&q.id).await.unwrap().unwrap();
        assert_eq!(stored.usage_count, 1);
    }
}

#[tokio::test]
async fn trigger_requires_the_shared_secret() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 15).await;
    seed_users(&engine, 2, 7, now).await;

    let err = engine.scheduler.trigger("wrong", now).await.unwrap_err();
    assert!(err.is_authorization());

    let outcome = engine.scheduler.trigger(TRIGGER_SECRET, now).await.unwrap();
    assert_eq!(outcome.created, 2);
    assert_eq!(outcome.session_ids.len(), 2);
}

// ============================================================================
// Polling views
// ============================================================================

#[tokio::test]
async fn polling_views_for_every_role() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 16).await;
    let (participants, viewers) = seed_users(&engine, 1, 3, now).await;

    // No session anywhere yet
    let view = engine
        .assignment
        .current_view(&viewers[0].id, now)
        .await
        .unwrap();
    match view {
        AssignmentView::NoSession {
            active_users,
            active_sessions,
            min_users_needed,
        } => {
            assert_eq!(active_users, 4);
            assert_eq!(active_sessions, 0);
            assert_eq!(min_users_needed, engine.config.min_users_for_session);
        }
        other => panic!("expected NoSession, got {other:?}"),
    }

    let created = engine.scheduler.run_cycle(now).await.unwrap();
    assert_eq!(created.len(), 1);

    // The participant sees their own session with ordered question slots
    let view = engine
        .assignment
        .current_view(&participants[0].id, now)
        .await
        .unwrap();
    match view {
        AssignmentView::Participant { session } => {
            assert_eq!(session.session.participant_id, participants[0].id);
            assert_eq!(session.answers.len(), engine.config.questions_per_session);
            assert!(session.answers.iter().all(|a| a.answer_text.is_empty()));
        }
        other => panic!("expected Participant, got {other:?}"),
    }

    // Batch-assigned viewers see the session and their vote state
    let view = engine
        .assignment
        .current_view(&viewers[0].id, now)
        .await
        .unwrap();
    match view {
        AssignmentView::Viewer {
            session, has_voted, ..
        } => {
            assert_eq!(session.session.participant_id, participants[0].id);
            assert!(!has_voted);
        }
        other => panic!("expected Viewer, got {other:?}"),
    }

    // A latecomer gets Waiting on the poll that assigns them, then Viewer
    let late = User::new("latecomer", UserRole::Viewer, 50.0, now);
    engine.users.insert(&late).await.unwrap();
    let view = engine.assignment.current_view(&late.id, now).await.unwrap();
    assert_eq!(view, AssignmentView::Waiting);
    let view = engine.assignment.current_view(&late.id, now).await.unwrap();
    assert!(matches!(view, AssignmentView::Viewer { .. }));
}

#[tokio::test]
async fn viewer_view_reports_the_cast_vote() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 17).await;
    let (participants, viewers) = seed_users(&engine, 1, 3, now).await;
    let participant = &participants[0];

    let created = engine.scheduler.run_cycle(now).await.unwrap();
    let session_id = created[0].session.id.clone();

    // Answer everything to open voting
    for answer in engine.sessions.answers_for_session(&session_id).await.unwrap() {
        engine
            .lifecycle
            .submit_answer(&participant.id, &session_id, &answer.question_id, "truth", now)
            .await
            .unwrap();
    }
    engine
        .lifecycle
        .submit_vote(&viewers[0].id, &session_id, VoteValue::False, now)
        .await
        .unwrap();

    let view = engine
        .assignment
        .current_view(&viewers[0].id, now)
        .await
        .unwrap();
    match view {
        AssignmentView::Viewer {
            has_voted, vote, ..
        } => {
            assert!(has_voted);
            assert_eq!(vote, Some(VoteValue::False));
        }
        other => panic!("expected Viewer, got {other:?}"),
    }
}

// ============================================================================
// Eligibility edges
// ============================================================================

#[tokio::test]
async fn eligibility_skips_frozen_inactive_and_busy_users() {
    let now = Utc::now();
    let (engine, _questions) = ready_engine(small_config(), 18).await;

    let mut frozen = User::new("frozen", UserRole::Participant, 50.0, now);
    frozen.is_frozen = true;
    let inactive = User::new(
        "inactive",
        UserRole::Participant,
        50.0,
        now - Duration::hours(2),
    );
    let busy = User::new("busy", UserRole::Participant, 50.0, now);
    let fresh = User::new("fresh", UserRole::Participant, 50.0, now);
    for u in [&frozen, &inactive, &busy, &fresh] {
        engine.users.insert(u).await.unwrap();
    }
    engine
        .sessions
        .create_with_slots(&busy.id, &["q".to_string()], now)
        .await
        .unwrap();

    let selector = EligibilitySelector::new(
        engine.users.clone(),
        engine.sessions.clone(),
        engine.config.clone(),
    );
    let eligible = selector.select(10, now).await.unwrap();
    let ids: Vec<&str> = eligible.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec![fresh.id.as_str()]);
}
