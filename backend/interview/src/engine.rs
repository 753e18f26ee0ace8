use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use mockmate_core::{InterviewError, Level, SessionStatus};
use mockmate_generation::{fallback, CodeAnalysis, GenerationService, QaPair};

use crate::scoring;
use crate::session::{
    AskedQuestion, InterviewSession, PreliminaryAnswer, ScoreBreakdown, UserSolution,
};
use crate::store::SessionStore;

/// Outcome of submitting the preliminary answers.
#[derive(Debug, Clone, Serialize)]
pub struct PreliminaryResult {
    pub score: f64,
    pub feedback: String,
}

/// Outcome of entering the coding phase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingStart {
    pub questions: Vec<mockmate_generation::CodingQuestion>,
    pub time_limit_secs: i64,
}

/// Outcome of submitting one code solution.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionResult {
    pub score: f64,
    pub analysis: CodeAnalysis,
}

/// Outcome of completing the interview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub final_score: i64,
    pub breakdown: ScoreBreakdown,
    pub feedback: String,
    pub recommendations: Vec<String>,
}

/// Per-solution line on the scorecard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionSummary {
    pub question_number: u32,
    pub score: f64,
    pub code_quality: f64,
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Read-only projection of a completed interview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub level: Level,
    pub final_score: i64,
    pub breakdown: ScoreBreakdown,
    pub preliminary_answers: usize,
    pub coding_questions_solved: usize,
    pub total_questions: usize,
    pub duration: Option<i64>,
    pub feedback: Option<String>,
    pub recommendations: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub solutions: Vec<SolutionSummary>,
}

/// Drives one coding-assessment attempt through its phases.
///
/// Every operation validates preconditions before touching state; a failed
/// check leaves the stored session untouched. Generation failures on the
/// question/analysis/feedback paths are absorbed into documented fallback
/// values rather than surfaced.
pub struct InterviewEngine {
    store: Arc<dyn SessionStore>,
    generation: Arc<GenerationService>,
}

impl InterviewEngine {
    pub fn new(store: Arc<dyn SessionStore>, generation: Arc<GenerationService>) -> Self {
        Self { store, generation }
    }

    /// Create a new session in `scheduled`.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        topic: &str,
        level: Level,
    ) -> Result<InterviewSession, InterviewError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(InterviewError::Validation("topic is required".to_string()));
        }
        let session = InterviewSession::new(user_id, topic, level);
        self.store.insert(session.clone()).await?;
        info!(session_id = %session.id, topic, level = %level, "Interview session created");
        Ok(session)
    }

    /// Fetch a session by id.
    pub async fn get_session(&self, session_id: Uuid) -> Result<InterviewSession, InterviewError> {
        self.store
            .find(session_id)
            .await?
            .ok_or_else(|| InterviewError::session_not_found(session_id))
    }

    /// A user's sessions, newest first, capped at 50.
    pub async fn user_sessions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InterviewSession>, InterviewError> {
        Ok(self.store.find_by_user(user_id, 50).await?)
    }

    /// Enter the preliminary phase: generate the theory questions and record
    /// the interview start time.
    pub async fn start_preliminary(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<String>, InterviewError> {
        let mut session = self.get_session(session_id).await?;
        session
            .status
            .guard_advance(SessionStatus::Preliminary, "start preliminary")?;

        let questions = match self
            .generation
            .preliminary_questions(&session.topic, session.level)
            .await
        {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                warn!(session_id = %session_id, "Empty question batch, using templates");
                fallback::preliminary_questions(&session.topic)
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Question generation failed, using templates");
                fallback::preliminary_questions(&session.topic)
            }
        };

        let started_at = Utc::now();
        let base_millis = started_at.timestamp_millis();
        session.preliminary_questions = questions
            .iter()
            .enumerate()
            .map(|(i, question)| AskedQuestion {
                question: question.clone(),
                asked_at: base_millis + i as i64,
            })
            .collect();
        session.status = SessionStatus::Preliminary;
        session.started_at = Some(started_at);
        self.store.save(&session).await?;

        info!(
            session_id = %session_id,
            question_count = questions.len(),
            "Preliminary phase started"
        );
        Ok(questions)
    }

    /// Record the preliminary answers and score them.
    ///
    /// Answers are stored as given; they are not cross-checked against the
    /// asked set.
    pub async fn submit_preliminary_answers(
        &self,
        session_id: Uuid,
        answers: Vec<PreliminaryAnswer>,
    ) -> Result<PreliminaryResult, InterviewError> {
        if answers.is_empty() {
            return Err(InterviewError::Validation(
                "at least one answer is required".to_string(),
            ));
        }
        let mut session = self.get_session(session_id).await?;
        session
            .status
            .guard_exact(SessionStatus::Preliminary, "submit preliminary answers")?;

        let qa_pairs: Vec<QaPair> = answers
            .iter()
            .map(|a| QaPair {
                question: a.question.clone(),
                answer: a.answer.clone(),
            })
            .collect();
        session.preliminary_answers = answers;
        session.preliminary_ended_at = Some(Utc::now());

        let evaluation = match self
            .generation
            .evaluate_preliminary(&session.topic, &qa_pairs)
            .await
        {
            Ok(evaluation) => evaluation,
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Answer evaluation failed, using neutral score");
                fallback::preliminary_evaluation()
            }
        };
        session.preliminary_score = evaluation.score;
        self.store.save(&session).await?;

        info!(session_id = %session_id, score = evaluation.score, "Preliminary answers scored");
        Ok(PreliminaryResult {
            score: evaluation.score,
            feedback: evaluation.feedback,
        })
    }

    /// Enter the coding phase: generate the 4 ladder-sized questions and start
    /// the coding clock.
    pub async fn start_coding(&self, session_id: Uuid) -> Result<CodingStart, InterviewError> {
        let mut session = self.get_session(session_id).await?;
        session
            .status
            .guard_advance(SessionStatus::Coding, "start coding")?;

        let questions = match self
            .generation
            .coding_questions(&session.topic, session.level)
            .await
        {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                warn!(session_id = %session_id, "Empty coding batch, using templates");
                fallback::coding_questions(&session.topic, &session.level.difficulty_ladder())
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Coding question generation failed, using templates");
                fallback::coding_questions(&session.topic, &session.level.difficulty_ladder())
            }
        };

        session.coding_questions = questions.clone();
        session.status = SessionStatus::Coding;
        session.coding_started_at = Some(Utc::now());
        self.store.save(&session).await?;

        info!(
            session_id = %session_id,
            question_count = questions.len(),
            time_limit_secs = session.coding_time_limit,
            "Coding phase started"
        );
        Ok(CodingStart {
            questions,
            time_limit_secs: session.coding_time_limit,
        })
    }

    /// Analyze and store one solution. Resubmitting the same question number
    /// replaces the earlier solution (last writer wins).
    pub async fn submit_code_solution(
        &self,
        session_id: Uuid,
        question_number: u32,
        code: &str,
        language: Option<String>,
    ) -> Result<SolutionResult, InterviewError> {
        if code.trim().is_empty() {
            return Err(InterviewError::Validation("code is required".to_string()));
        }
        let mut session = self.get_session(session_id).await?;
        session
            .status
            .guard_exact(SessionStatus::Coding, "submit code solution")?;

        let description = session
            .question(question_number)
            .ok_or_else(|| InterviewError::NotFound(format!("question {question_number}")))?
            .description
            .clone();
        let language = language.unwrap_or_else(|| "javascript".to_string());

        let analysis = match self
            .generation
            .analyze_code(&description, code, &language)
            .await
        {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Code analysis failed, using neutral analysis");
                fallback::code_analysis()
            }
        };
        let score = analysis.code_quality * 10.0;

        session.upsert_solution(UserSolution {
            question_number,
            code: code.to_string(),
            language,
            submitted_at: Utc::now(),
            score,
            analysis: analysis.clone(),
        });
        self.store.save(&session).await?;

        info!(
            session_id = %session_id,
            question_number,
            score,
            "Solution submitted"
        );
        Ok(SolutionResult { score, analysis })
    }

    /// Close out the interview: stop the clock, aggregate the component
    /// scores, and attach generated closing feedback.
    pub async fn complete_interview(
        &self,
        session_id: Uuid,
    ) -> Result<CompletionSummary, InterviewError> {
        let mut session = self.get_session(session_id).await?;
        session
            .status
            .guard_advance(SessionStatus::Completed, "complete interview")?;

        let ended_at = Utc::now();
        session.ended_at = Some(ended_at);
        if let Some(started_at) = session.started_at {
            session.total_duration = Some((ended_at - started_at).num_seconds());
        }

        // Missing coding timestamps fall back to the limit itself, which
        // yields a perfect time score.
        let actual_coding_secs = match session.coding_started_at {
            Some(coding_started_at) => (ended_at - coding_started_at).num_seconds(),
            None => session.coding_time_limit,
        };
        let breakdown = ScoreBreakdown {
            preliminary_score: session.preliminary_score,
            coding_score: scoring::coding_score(&session.user_solutions),
            code_quality_score: scoring::code_quality_score(&session.user_solutions),
            time_management_score: scoring::time_management_score(
                actual_coding_secs,
                session.coding_time_limit,
            ),
        };
        let final_score = scoring::final_score(&breakdown);

        let feedback = match self
            .generation
            .overall_feedback(
                &session.topic,
                session.level,
                breakdown.preliminary_score,
                breakdown.coding_score,
                breakdown.code_quality_score,
                breakdown.time_management_score,
            )
            .await
        {
            Ok(feedback) => feedback,
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Feedback generation failed, using generic text");
                fallback::overall_feedback()
            }
        };

        session.status = SessionStatus::Completed;
        session.breakdown = Some(breakdown.clone());
        session.final_score = final_score;
        session.overall_feedback = Some(feedback.feedback.clone());
        session.recommendations = feedback.recommendations.clone();
        self.store.save(&session).await?;

        info!(session_id = %session_id, final_score, "Interview completed");
        Ok(CompletionSummary {
            final_score,
            breakdown,
            feedback: feedback.feedback,
            recommendations: feedback.recommendations,
        })
    }

    /// Read-only scorecard for a completed interview.
    pub async fn scorecard(&self, session_id: Uuid) -> Result<Scorecard, InterviewError> {
        let session = self.get_session(session_id).await?;
        session
            .status
            .guard_exact(SessionStatus::Completed, "get scorecard")?;

        let solutions = session
            .user_solutions
            .iter()
            .map(|s| SolutionSummary {
                question_number: s.question_number,
                score: s.score,
                code_quality: s.analysis.code_quality,
                time_complexity: s.analysis.time_complexity.clone(),
                space_complexity: s.analysis.space_complexity.clone(),
            })
            .collect();

        Ok(Scorecard {
            session_id: session.id,
            user_id: session.user_id,
            topic: session.topic.clone(),
            level: session.level,
            final_score: session.final_score,
            breakdown: session.breakdown.clone().unwrap_or_default(),
            preliminary_answers: session.preliminary_answers.len(),
            coding_questions_solved: session.user_solutions.len(),
            total_questions: session.coding_questions.len(),
            duration: session.total_duration,
            feedback: session.overall_feedback.clone(),
            recommendations: session.recommendations.clone(),
            completed_at: session.ended_at,
            solutions,
        })
    }

    /// Overwrite the status to `cancelled`, whatever it currently is.
    /// Idempotent, including on terminal sessions.
    pub async fn cancel(&self, session_id: Uuid) -> Result<(), InterviewError> {
        let mut session = self.get_session(session_id).await?;
        session.status = SessionStatus::Cancelled;
        self.store.save(&session).await?;
        info!(session_id = %session_id, "Interview cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockmate_generation::MockProvider;

    use crate::store::InMemorySessionStore;

    fn engine(provider: MockProvider) -> InterviewEngine {
        InterviewEngine::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(GenerationService::new(Arc::new(provider))),
        )
    }

    /// Engine backed by a provider whose every call fails, so all generation
    /// output comes from the fallback functions.
    fn offline_engine() -> InterviewEngine {
        engine(MockProvider::new())
    }

    fn answers() -> Vec<PreliminaryAnswer> {
        vec![PreliminaryAnswer {
            question: "What is an array?".to_string(),
            answer: "A contiguous block of elements.".to_string(),
            timestamp: 1,
        }]
    }

    async fn scheduled_session(engine: &InterviewEngine) -> Uuid {
        engine
            .create_session(Uuid::new_v4(), "Arrays", Level::Junior)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_session_rejects_blank_topic() {
        let engine = offline_engine();
        let err = engine
            .create_session(Uuid::new_v4(), "   ", Level::Junior)
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::Validation(_)));
    }

    #[tokio::test]
    async fn operations_on_unknown_session_fail_with_not_found() {
        let engine = offline_engine();
        let err = engine.start_preliminary(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, InterviewError::NotFound(_)));
    }

    #[tokio::test]
    async fn full_lifecycle_reaches_completed() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;

        let questions = engine.start_preliminary(id).await.unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(
            engine.get_session(id).await.unwrap().status,
            SessionStatus::Preliminary
        );

        let result = engine.submit_preliminary_answers(id, answers()).await.unwrap();
        assert_eq!(result.score, 50.0); // neutral fallback

        let coding = engine.start_coding(id).await.unwrap();
        assert_eq!(coding.questions.len(), 4);
        assert_eq!(coding.time_limit_secs, 3600);

        let solution = engine
            .submit_code_solution(id, 1, "fn solve() {}", Some("rust".to_string()))
            .await
            .unwrap();
        assert_eq!(solution.score, 50.0); // quality 5 * 10

        let summary = engine.complete_interview(id).await.unwrap();
        assert_eq!(summary.breakdown.coding_score, 50.0);
        assert_eq!(summary.breakdown.time_management_score, 100.0);

        let session = engine.get_session(id).await.unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.total_duration.is_some());
    }

    #[tokio::test]
    async fn preliminary_questions_carry_ascending_timestamps() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_preliminary(id).await.unwrap();

        let session = engine.get_session(id).await.unwrap();
        let stamps: Vec<i64> = session
            .preliminary_questions
            .iter()
            .map(|q| q.asked_at)
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn submitting_answers_outside_preliminary_is_invalid_state() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;

        let err = engine
            .submit_preliminary_answers(id, answers())
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::InvalidState { .. }));

        engine.start_preliminary(id).await.unwrap();
        engine.start_coding(id).await.unwrap();
        let err = engine
            .submit_preliminary_answers(id, answers())
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn empty_answer_list_is_a_validation_error() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_preliminary(id).await.unwrap();

        let err = engine
            .submit_preliminary_answers(id, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::Validation(_)));
    }

    #[tokio::test]
    async fn starting_preliminary_twice_is_invalid_state() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_preliminary(id).await.unwrap();

        let err = engine.start_preliminary(id).await.unwrap_err();
        assert!(matches!(err, InterviewError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn coding_can_start_straight_from_scheduled() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        let coding = engine.start_coding(id).await.unwrap();
        assert_eq!(coding.questions.len(), 4);
    }

    #[tokio::test]
    async fn resubmission_replaces_the_stored_solution() {
        let provider = MockProvider::new()
            .failing() // coding question generation -> templates
            .with_reply(r#"{"codeQuality": 4}"#)
            .with_reply(r#"{"codeQuality": 9}"#)
            .failing(); // overall feedback -> generic
        let engine = engine(provider);
        let id = scheduled_session(&engine).await;
        engine.start_coding(id).await.unwrap();

        engine
            .submit_code_solution(id, 1, "first attempt", None)
            .await
            .unwrap();
        let second = engine
            .submit_code_solution(id, 1, "second attempt", None)
            .await
            .unwrap();
        assert_eq!(second.score, 90.0);

        let session = engine.get_session(id).await.unwrap();
        assert_eq!(session.user_solutions.len(), 1);
        assert_eq!(session.user_solutions[0].code, "second attempt");

        // The replacement contributes to the mean exactly once.
        let summary = engine.complete_interview(id).await.unwrap();
        assert_eq!(summary.breakdown.coding_score, 90.0);
    }

    #[tokio::test]
    async fn solution_for_unknown_question_number_is_not_found() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_coding(id).await.unwrap();

        let err = engine
            .submit_code_solution(id, 99, "code", None)
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::NotFound(_)));
    }

    #[tokio::test]
    async fn completing_with_no_solutions_scores_zero_components() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_coding(id).await.unwrap();

        let summary = engine.complete_interview(id).await.unwrap();
        assert_eq!(summary.breakdown.coding_score, 0.0);
        assert_eq!(summary.breakdown.code_quality_score, 0.0);
        assert!(summary.final_score >= 0);
    }

    #[tokio::test]
    async fn scorecard_requires_completed_status() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_coding(id).await.unwrap();

        let err = engine.scorecard(id).await.unwrap_err();
        assert!(matches!(err, InterviewError::InvalidState { .. }));

        engine
            .submit_code_solution(id, 1, "fn main() {}", None)
            .await
            .unwrap();
        engine.complete_interview(id).await.unwrap();

        let scorecard = engine.scorecard(id).await.unwrap();
        assert_eq!(scorecard.coding_questions_solved, 1);
        assert_eq!(scorecard.total_questions, 4);
        assert_eq!(scorecard.solutions.len(), 1);
    }

    #[tokio::test]
    async fn cancel_overwrites_any_status_and_blocks_further_operations() {
        let engine = offline_engine();
        let id = scheduled_session(&engine).await;
        engine.start_coding(id).await.unwrap();

        engine.cancel(id).await.unwrap();
        assert_eq!(
            engine.get_session(id).await.unwrap().status,
            SessionStatus::Cancelled
        );

        // Idempotent, including after completion elsewhere in the lifecycle.
        engine.cancel(id).await.unwrap();

        let err = engine.complete_interview(id).await.unwrap_err();
        assert!(matches!(err, InterviewError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn generated_payloads_flow_through_when_the_provider_succeeds() {
        let provider = MockProvider::new()
            .with_reply(r#"["Q1?", "Q2?", "Q3?", "Q4?", "Q5?"]"#)
            .with_reply(r#"{"score": 82, "feedback": "Strong fundamentals."}"#);
        let engine = engine(provider);
        let id = scheduled_session(&engine).await;

        let questions = engine.start_preliminary(id).await.unwrap();
        assert_eq!(questions[0], "Q1?");

        let result = engine.submit_preliminary_answers(id, answers()).await.unwrap();
        assert_eq!(result.score, 82.0);
        assert_eq!(result.feedback, "Strong fundamentals.");
    }
}
