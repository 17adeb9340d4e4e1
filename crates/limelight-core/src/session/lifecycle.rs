//! The session lifecycle state machine.
//!
//! Status writes never happen ad hoc: every transition is looked up in the
//! closed table below and applied through a compare-and-set repository
//! operation naming the expected prior state. Any (status, event) pair not
//! in the table is rejected.

use super::model::SessionStatus;

/// Events that can advance a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The first answer slot was filled.
    FirstAnswer,
    /// The last empty answer slot was filled.
    LastAnswer,
    /// Voting was closed externally.
    VotingClosed,
}

/// The transition table `{(state, event) -> state'}`.
///
/// `(Waiting, LastAnswer)` covers the single-question shortcut where the
/// same submission is both first and last.
pub fn transition(status: SessionStatus, event: SessionEvent) -> Option<SessionStatus> {
    use SessionEvent::*;
    use SessionStatus::*;

    match (status, event) {
        (Waiting, FirstAnswer) => Some(InProgress),
        (InProgress, LastAnswer) => Some(Voting),
        (Waiting, LastAnswer) => Some(Voting),
        (Voting, VotingClosed) => Some(Completed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionEvent::*;
    use SessionStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert_eq!(transition(Waiting, FirstAnswer), Some(InProgress));
        assert_eq!(transition(InProgress, LastAnswer), Some(Voting));
        assert_eq!(transition(Voting, VotingClosed), Some(Completed));
    }

    #[test]
    fn test_single_question_shortcut() {
        assert_eq!(transition(Waiting, LastAnswer), Some(Voting));
    }

    #[test]
    fn test_no_regression_or_repeat() {
        assert_eq!(transition(Completed, VotingClosed), None);
        assert_eq!(transition(Voting, FirstAnswer), None);
        assert_eq!(transition(InProgress, FirstAnswer), None);
        assert_eq!(transition(Completed, FirstAnswer), None);
        assert_eq!(transition(Waiting, VotingClosed), None);
    }
}
