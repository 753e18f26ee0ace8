use serde::{Deserialize, Serialize};

use mockmate_core::QuestionDifficulty;

/// Worked example attached to a coding question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionExample {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: String,
}

/// A test case for a coding question. Hidden cases are not shown to the
/// candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
}

/// A generated coding question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingQuestion {
    pub question_number: u32,
    pub title: String,
    pub description: String,
    pub difficulty: QuestionDifficulty,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub examples: Vec<QuestionExample>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Structured review of a submitted solution.
///
/// `code_quality` is a 0–10 rating; the solution score is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalysis {
    #[serde(default = "unknown_complexity")]
    pub time_complexity: String,
    #[serde(default = "unknown_complexity")]
    pub space_complexity: String,
    #[serde(default = "neutral_quality")]
    pub code_quality: f64,
    #[serde(default)]
    pub approach: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// Scored evaluation of the preliminary answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreliminaryEvaluation {
    #[serde(default)]
    pub score: f64,
    #[serde(default = "no_feedback")]
    pub feedback: String,
}

/// Closing feedback generated from the four component scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallFeedback {
    #[serde(default = "generic_feedback")]
    pub feedback: String,
    #[serde(default = "generic_recommendations")]
    pub recommendations: Vec<String>,
}

/// One question/answer pair from the preliminary phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

fn unknown_complexity() -> String {
    "Unable to analyze".to_string()
}

fn neutral_quality() -> f64 {
    5.0
}

fn no_feedback() -> String {
    "No feedback available".to_string()
}

fn generic_feedback() -> String {
    "Good effort overall.".to_string()
}

fn generic_recommendations() -> Vec<String> {
    vec!["Keep practicing".to_string()]
}
