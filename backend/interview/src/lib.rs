//! Interview session lifecycle and scoring.
//!
//! One coding-assessment attempt moves through
//! scheduled → preliminary → coding → completed (or jumps to cancelled),
//! driven by [`InterviewEngine`]. Sub-scores from the phases aggregate into a
//! final grade at completion.

pub mod engine;
pub mod scoring;
pub mod session;
pub mod store;

pub use engine::{
    CodingStart, CompletionSummary, InterviewEngine, PreliminaryResult, Scorecard,
    SolutionResult, SolutionSummary,
};
pub use session::{
    AskedQuestion, InterviewSession, PreliminaryAnswer, ScoreBreakdown, UserSolution,
    DEFAULT_CODING_TIME_LIMIT_SECS,
};
pub use store::{InMemorySessionStore, SessionStore};
