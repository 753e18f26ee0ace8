use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InterviewError;

/// Lifecycle status of a coding-assessment session.
///
/// Status only moves forward through the phases, or jumps to `cancelled`.
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Preliminary,
    Coding,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }

    fn phase_rank(self) -> u8 {
        match self {
            SessionStatus::Scheduled => 0,
            SessionStatus::Preliminary => 1,
            SessionStatus::Coding => 2,
            SessionStatus::Completed => 3,
            SessionStatus::Cancelled => 4,
        }
    }

    /// Whether a session in this status may advance to `next`.
    ///
    /// Advances must move strictly forward through
    /// scheduled → preliminary → coding → completed; phases may be skipped.
    /// Nothing leaves a terminal status. Cancellation is not an advance; it
    /// overwrites unconditionally and is handled by the cancel operation alone.
    pub fn can_advance_to(self, next: SessionStatus) -> bool {
        if self.is_terminal() || matches!(next, SessionStatus::Scheduled | SessionStatus::Cancelled)
        {
            return false;
        }
        next.phase_rank() > self.phase_rank()
    }

    /// Reject `operation` unless this status may advance to `next`.
    ///
    /// Every phase-entering engine operation funnels through this check.
    pub fn guard_advance(
        self,
        next: SessionStatus,
        operation: &'static str,
    ) -> Result<(), InterviewError> {
        if self.can_advance_to(next) {
            Ok(())
        } else {
            Err(InterviewError::InvalidState {
                status: self,
                operation,
            })
        }
    }

    /// Reject `operation` unless the session is exactly in `expected`.
    ///
    /// Used by submissions, which are only legal inside their own phase.
    pub fn guard_exact(
        self,
        expected: SessionStatus,
        operation: &'static str,
    ) -> Result<(), InterviewError> {
        if self == expected {
            Ok(())
        } else {
            Err(InterviewError::InvalidState {
                status: self,
                operation,
            })
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Preliminary => "preliminary",
            SessionStatus::Coding => "coding",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use SessionStatus::*;

    #[test]
    fn forward_advances_are_legal() {
        assert!(Scheduled.can_advance_to(Preliminary));
        assert!(Scheduled.can_advance_to(Coding));
        assert!(Scheduled.can_advance_to(Completed));
        assert!(Preliminary.can_advance_to(Coding));
        assert!(Preliminary.can_advance_to(Completed));
        assert!(Coding.can_advance_to(Completed));
    }

    #[test]
    fn backward_and_same_state_advances_are_rejected() {
        assert!(!Preliminary.can_advance_to(Preliminary));
        assert!(!Coding.can_advance_to(Preliminary));
        assert!(!Completed.can_advance_to(Coding));
        assert!(!Coding.can_advance_to(Scheduled));
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for next in [Scheduled, Preliminary, Coding, Completed, Cancelled] {
            assert!(!Completed.can_advance_to(next));
            assert!(!Cancelled.can_advance_to(next));
        }
    }

    #[test]
    fn cancelled_is_never_an_advance_target() {
        assert!(!Scheduled.can_advance_to(Cancelled));
        assert!(!Coding.can_advance_to(Cancelled));
    }

    #[test]
    fn guard_exact_reports_invalid_state() {
        let err = Coding.guard_exact(Preliminary, "submit answers").unwrap_err();
        match err {
            InterviewError::InvalidState { status, operation } => {
                assert_eq!(status, Coding);
                assert_eq!(operation, "submit answers");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Scheduled).unwrap(), "\"scheduled\"");
        assert_eq!(
            serde_json::from_str::<SessionStatus>("\"cancelled\"").unwrap(),
            Cancelled
        );
    }
}
