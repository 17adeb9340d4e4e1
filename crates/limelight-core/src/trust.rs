//! Pure trust score and freeze policy math.
//!
//! Everything here is a function of stored data, not an event log; the
//! application layer loads the rows and applies the results.

use crate::config::EngineConfig;
use crate::session::model::Session;
use crate::user::model::User;

/// A session's trust result: the percentage of TRUE votes, or 0.0 when no
/// vote was cast.
pub fn session_trust_result(true_votes: u32, total_votes: u32) -> f64 {
    if total_votes == 0 {
        return 0.0;
    }
    f64::from(true_votes) / f64::from(total_votes) * 100.0
}

/// Recomputes a participant's trust score from their completed sessions.
///
/// Unweighted mean of each qualifying session's trust result, where a
/// session qualifies when `total_votes > 0`. Falls back to the configured
/// neutral prior when nothing qualifies. Full recomputation keeps the
/// score correct under out-of-order completion.
pub fn mean_trust_score(completed_sessions: &[Session], default_trust_score: f64) -> f64 {
    let results: Vec<f64> = completed_sessions
        .iter()
        .filter(|s| s.total_votes > 0)
        .map(|s| session_trust_result(s.true_votes, s.total_votes))
        .collect();

    if results.is_empty() {
        return default_trust_score;
    }
    results.iter().sum::<f64>() / results.len() as f64
}

/// The freeze policy: all three conditions must hold.
///
/// 1. The participant has appeared at least the minimum number of times.
/// 2. Every completed session gathered at least the minimum vote count
///    (no freezing on statistically insignificant samples).
/// 3. The current trust score is strictly below the threshold.
pub fn should_freeze(user: &User, completed_sessions: &[Session], config: &EngineConfig) -> bool {
    if user.appearance_count < config.min_appearances_for_freeze {
        return false;
    }

    let all_sessions_meet_min_votes = completed_sessions
        .iter()
        .all(|s| s.total_votes >= config.min_votes_per_session_for_freeze);
    if !all_sessions_meet_min_votes {
        return false;
    }

    user.trust_score < config.freeze_threshold_percent
}
