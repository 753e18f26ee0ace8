use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use mockmate_core::{
    ChatMessage, CompletionError, CompletionProvider, CompletionRequest, Level,
};

use crate::extract;
use crate::prompts;
use crate::types::{
    CodeAnalysis, CodingQuestion, OverallFeedback, PreliminaryEvaluation, QaPair,
};

/// Default model requested from the provider.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Failure tag for a generation call.
///
/// Callers decide per call site whether to surface this or substitute the
/// documented fallback value.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("rate limited by generation backend")]
    RateLimited,

    #[error("generation backend failed: {0}")]
    Upstream(String),

    #[error("generation backend returned an unparseable payload: {0}")]
    Malformed(String),
}

impl From<CompletionError> for GenerationError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::RateLimited => GenerationError::RateLimited,
            CompletionError::Failed(message) => GenerationError::Upstream(message),
        }
    }
}

impl From<GenerationError> for mockmate_core::InterviewError {
    fn from(err: GenerationError) -> Self {
        mockmate_core::InterviewError::Upstream(err.to_string())
    }
}

/// Typed facade over a completion provider.
///
/// Builds the prompt, performs the round trip, extracts the JSON payload out
/// of possibly prose-wrapped output, and clamps numeric ranges. Stateless
/// between calls.
pub struct GenerationService {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl GenerationService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn complete_prompt(
        &self,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens,
            temperature,
        };
        debug!(
            provider = self.provider.name(),
            model = %self.model,
            "Requesting completion"
        );
        let response = self.provider.complete(&request).await?;
        Ok(response.content)
    }

    /// Generate 5 preliminary theory questions for (topic, level).
    pub async fn preliminary_questions(
        &self,
        topic: &str,
        level: Level,
    ) -> Result<Vec<String>, GenerationError> {
        let content = self
            .complete_prompt(prompts::preliminary_questions(topic, level), 1024, 0.7)
            .await?;
        extract::array(&content).ok_or_else(|| GenerationError::Malformed(snippet(&content)))
    }

    /// Generate up to 4 coding questions sized to the level's difficulty
    /// ladder.
    pub async fn coding_questions(
        &self,
        topic: &str,
        level: Level,
    ) -> Result<Vec<CodingQuestion>, GenerationError> {
        let ladder = level.difficulty_ladder();
        let content = self
            .complete_prompt(prompts::coding_questions(topic, level, &ladder), 4096, 0.8)
            .await?;
        let mut questions: Vec<CodingQuestion> =
            extract::array(&content).ok_or_else(|| GenerationError::Malformed(snippet(&content)))?;
        questions.truncate(4);
        Ok(questions)
    }

    /// Analyze a submitted solution. The quality rating is clamped to 0–10.
    pub async fn analyze_code(
        &self,
        question: &str,
        code: &str,
        language: &str,
    ) -> Result<CodeAnalysis, GenerationError> {
        let content = self
            .complete_prompt(prompts::analyze_code(question, code, language), 2048, 0.5)
            .await?;
        let mut analysis: CodeAnalysis =
            extract::object(&content).ok_or_else(|| GenerationError::Malformed(snippet(&content)))?;
        analysis.code_quality = analysis.code_quality.clamp(0.0, 10.0);
        Ok(analysis)
    }

    /// Score the preliminary answers 0–100 with brief feedback.
    pub async fn evaluate_preliminary(
        &self,
        topic: &str,
        qa_pairs: &[QaPair],
    ) -> Result<PreliminaryEvaluation, GenerationError> {
        let content = self
            .complete_prompt(prompts::evaluate_preliminary(topic, qa_pairs), 512, 0.5)
            .await?;
        let mut evaluation: PreliminaryEvaluation =
            extract::object(&content).ok_or_else(|| GenerationError::Malformed(snippet(&content)))?;
        evaluation.score = evaluation.score.clamp(0.0, 100.0);
        Ok(evaluation)
    }

    /// Closing feedback synthesized from the four component scores.
    pub async fn overall_feedback(
        &self,
        topic: &str,
        level: Level,
        preliminary_score: f64,
        coding_score: f64,
        code_quality_score: f64,
        time_management_score: f64,
    ) -> Result<OverallFeedback, GenerationError> {
        let prompt = prompts::overall_feedback(
            topic,
            level,
            preliminary_score,
            coding_score,
            code_quality_score,
            time_management_score,
        );
        let content = self.complete_prompt(prompt, 1024, 0.6).await?;
        extract::object(&content).ok_or_else(|| GenerationError::Malformed(snippet(&content)))
    }

    /// Free-form chat reply given the full conversational history.
    pub async fn chat_reply(&self, history: &[ChatMessage]) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: history.to_vec(),
            max_tokens: 1024,
            temperature: 0.7,
        };
        debug!(
            provider = self.provider.name(),
            turns = history.len(),
            "Requesting chat reply"
        );
        let response = self.provider.complete(&request).await?;
        Ok(response.content)
    }
}

/// First chunk of an unparseable payload, for error messages and logs.
fn snippet(content: &str) -> String {
    const MAX: usize = 120;
    let trimmed = content.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}
