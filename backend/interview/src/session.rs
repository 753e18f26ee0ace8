use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mockmate_core::{Level, SessionStatus};
use mockmate_generation::{CodeAnalysis, CodingQuestion};

/// Default coding-phase time limit, in seconds.
pub const DEFAULT_CODING_TIME_LIMIT_SECS: i64 = 3600;

/// A preliminary question as it was put to the candidate.
///
/// `asked_at` is a millisecond timestamp; questions generated in one batch get
/// synthetic ascending values so ordering survives serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskedQuestion {
    pub question: String,
    pub asked_at: i64,
}

/// A candidate's answer to one preliminary question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreliminaryAnswer {
    pub question: String,
    pub answer: String,
    /// Millisecond timestamp supplied by the caller at submission.
    pub timestamp: i64,
}

/// A submitted solution for one coding question. At most one per question
/// number; resubmission replaces the earlier entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSolution {
    pub question_number: u32,
    pub code: String,
    pub language: String,
    pub submitted_at: DateTime<Utc>,
    /// 0–100, derived from the analysis quality rating.
    pub score: f64,
    pub analysis: CodeAnalysis,
}

/// The four component scores aggregated into the final grade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub preliminary_score: f64,
    pub coding_score: f64,
    pub code_quality_score: f64,
    pub time_management_score: f64,
}

/// One coding-assessment attempt.
///
/// Mutated exclusively through the engine operations; `status` is the single
/// source of truth for which operations are legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub level: Level,
    pub status: SessionStatus,

    // Preliminary phase
    pub preliminary_questions: Vec<AskedQuestion>,
    pub preliminary_answers: Vec<PreliminaryAnswer>,
    pub preliminary_score: f64,

    // Coding phase
    pub coding_questions: Vec<CodingQuestion>,
    pub user_solutions: Vec<UserSolution>,

    // Timing
    pub started_at: Option<DateTime<Utc>>,
    pub preliminary_ended_at: Option<DateTime<Utc>>,
    pub coding_started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Whole seconds from start to end, set at completion.
    pub total_duration: Option<i64>,
    pub coding_time_limit: i64,

    // Final results
    pub final_score: i64,
    pub breakdown: Option<ScoreBreakdown>,
    pub overall_feedback: Option<String>,
    pub recommendations: Vec<String>,

    pub attempt_number: u32,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(user_id: Uuid, topic: impl Into<String>, level: Level) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            topic: topic.into(),
            level,
            status: SessionStatus::Scheduled,
            preliminary_questions: Vec::new(),
            preliminary_answers: Vec::new(),
            preliminary_score: 0.0,
            coding_questions: Vec::new(),
            user_solutions: Vec::new(),
            started_at: None,
            preliminary_ended_at: None,
            coding_started_at: None,
            ended_at: None,
            total_duration: None,
            coding_time_limit: DEFAULT_CODING_TIME_LIMIT_SECS,
            final_score: 0,
            breakdown: None,
            overall_feedback: None,
            recommendations: Vec::new(),
            attempt_number: 1,
            created_at: Utc::now(),
        }
    }

    /// Look up a stored coding question by its number.
    pub fn question(&self, question_number: u32) -> Option<&CodingQuestion> {
        self.coding_questions
            .iter()
            .find(|q| q.question_number == question_number)
    }

    /// Insert a solution, replacing any earlier submission for the same
    /// question number.
    pub fn upsert_solution(&mut self, solution: UserSolution) {
        match self
            .user_solutions
            .iter_mut()
            .find(|s| s.question_number == solution.question_number)
        {
            Some(existing) => *existing = solution,
            None => self.user_solutions.push(solution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockmate_generation::fallback;

    fn solution(question_number: u32, score: f64) -> UserSolution {
        UserSolution {
            question_number,
            code: "code".to_string(),
            language: "rust".to_string(),
            submitted_at: Utc::now(),
            score,
            analysis: fallback::code_analysis(),
        }
    }

    #[test]
    fn new_session_starts_scheduled_with_defaults() {
        let session = InterviewSession::new(Uuid::new_v4(), "Graphs", Level::Senior);
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.coding_time_limit, 3600);
        assert_eq!(session.attempt_number, 1);
        assert!(session.user_solutions.is_empty());
    }

    #[test]
    fn upsert_replaces_existing_solution() {
        let mut session = InterviewSession::new(Uuid::new_v4(), "Graphs", Level::Senior);
        session.upsert_solution(solution(2, 40.0));
        session.upsert_solution(solution(1, 60.0));
        session.upsert_solution(solution(2, 90.0));

        assert_eq!(session.user_solutions.len(), 2);
        let second = session
            .user_solutions
            .iter()
            .find(|s| s.question_number == 2)
            .unwrap();
        assert_eq!(second.score, 90.0);
    }

    #[test]
    fn session_round_trips_through_camel_case_json() {
        let session = InterviewSession::new(Uuid::new_v4(), "Heaps", Level::MidLevel);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("codingTimeLimit").is_some());
        assert!(json.get("userId").is_some());
        let back: InterviewSession = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, session.id);
        assert_eq!(back.level, Level::MidLevel);
    }
}
