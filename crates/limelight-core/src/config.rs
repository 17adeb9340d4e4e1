//! Engine configuration.
//!
//! Every tunable of the orchestration engine lives here so that deployments
//! can adjust cohort sizes, cooldowns and freeze thresholds without touching
//! the services themselves. Defaults match the production constants.

use crate::error::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Tunable constants for the session orchestration engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Target number of users per concurrent session.
    pub users_per_session: u32,
    /// Minimum active users required before any session starts.
    pub min_users_for_session: u32,
    /// Hard cap on sessions created per day.
    pub max_daily_sessions: u32,
    /// A user counts as active if seen within this many minutes.
    pub active_window_minutes: i64,
    /// Number of questions issued per session.
    pub questions_per_session: usize,
    /// Maximum accepted answer length, in characters.
    pub max_answer_length: usize,
    /// Days a participant must wait between appearances.
    pub appearance_cooldown_days: i64,
    /// Minimum appearances before a participant is freeze-eligible.
    pub min_appearances_for_freeze: u32,
    /// Every completed session needs at least this many votes for the
    /// freeze policy to consider the participant at all.
    pub min_votes_per_session_for_freeze: u32,
    /// Participants with a trust score strictly below this are frozen.
    pub freeze_threshold_percent: f64,
    /// Neutral prior assigned when no completed session qualifies.
    pub default_trust_score: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            users_per_session: 80,
            min_users_for_session: 40,
            max_daily_sessions: 30,
            active_window_minutes: 15,
            questions_per_session: 5,
            max_answer_length: 150,
            appearance_cooldown_days: 30,
            min_appearances_for_freeze: 3,
            min_votes_per_session_for_freeze: 30,
            freeze_threshold_percent: 10.0,
            default_trust_score: 50.0,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// Missing keys fall back to the defaults, so a partial override file
    /// is valid.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// The activity recency window as a `Duration`.
    pub fn active_window(&self) -> Duration {
        Duration::minutes(self.active_window_minutes)
    }

    /// The appearance cooldown as a `Duration`.
    pub fn appearance_cooldown(&self) -> Duration {
        Duration::days(self.appearance_cooldown_days)
    }
}
