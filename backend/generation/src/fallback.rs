//! Deterministic substitutes for failed generation calls.
//!
//! Every structured operation has a documented fallback value; callers apply
//! these explicitly when a call comes back with an error tag, trading accuracy
//! for availability.

use mockmate_core::QuestionDifficulty;

use crate::types::{
    CodeAnalysis, CodingQuestion, OverallFeedback, PreliminaryEvaluation, QuestionExample,
    TestCase,
};

/// In-band chat reply when the provider signals rate limiting.
pub const RATE_LIMITED_REPLY: &str =
    "The interview service is temporarily busy. Please wait a few seconds and try again.";

/// In-band chat reply for any other provider failure.
pub const GENERIC_ERROR_REPLY: &str =
    "Something went wrong while processing your response. Please try again.";

/// Five template preliminary questions built from the topic alone.
pub fn preliminary_questions(topic: &str) -> Vec<String> {
    vec![
        format!("What is {topic} and why is it important in programming?"),
        format!("Explain the time complexity of common {topic} operations."),
        format!("What are the main advantages and disadvantages of {topic}?"),
        format!("Describe a real-world use case for {topic}."),
        format!("What are some common pitfalls when working with {topic}?"),
    ]
}

/// Template coding questions derived from the difficulty ladder, each with one
/// visible and one hidden placeholder test case.
pub fn coding_questions(topic: &str, ladder: &[QuestionDifficulty; 4]) -> Vec<CodingQuestion> {
    ladder
        .iter()
        .enumerate()
        .map(|(index, difficulty)| CodingQuestion {
            question_number: index as u32 + 1,
            title: format!("{topic} Problem {}", index + 1),
            description: format!("Solve a {difficulty} level problem related to {topic}."),
            difficulty: *difficulty,
            constraints: "Standard constraints apply".to_string(),
            examples: vec![QuestionExample {
                input: "Example input".to_string(),
                output: "Example output".to_string(),
                explanation: "Explanation".to_string(),
            }],
            test_cases: vec![
                TestCase {
                    input: "test1".to_string(),
                    expected_output: "output1".to_string(),
                    is_hidden: false,
                },
                TestCase {
                    input: "test2".to_string(),
                    expected_output: "output2".to_string(),
                    is_hidden: true,
                },
            ],
        })
        .collect()
}

/// Neutral analysis with a mid-scale quality rating.
pub fn code_analysis() -> CodeAnalysis {
    CodeAnalysis {
        time_complexity: "Unable to analyze".to_string(),
        space_complexity: "Unable to analyze".to_string(),
        code_quality: 5.0,
        approach: "Solution submitted".to_string(),
        suggestions: vec!["Review the solution".to_string()],
        strengths: vec!["Code submitted".to_string()],
        weaknesses: vec!["Unable to analyze automatically".to_string()],
    }
}

/// Mid-scale preliminary score with a generic note.
pub fn preliminary_evaluation() -> PreliminaryEvaluation {
    PreliminaryEvaluation {
        score: 50.0,
        feedback: "Unable to analyze answers".to_string(),
    }
}

/// Fixed closing feedback.
pub fn overall_feedback() -> OverallFeedback {
    OverallFeedback {
        feedback: "Interview completed. Keep practicing!".to_string(),
        recommendations: vec![
            "Continue learning".to_string(),
            "Practice regularly".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockmate_core::Level;

    #[test]
    fn preliminary_fallback_has_five_questions() {
        let questions = preliminary_questions("Linked Lists");
        assert_eq!(questions.len(), 5);
        assert!(questions.iter().all(|q| q.contains("Linked Lists")));
    }

    #[test]
    fn coding_fallback_follows_the_ladder() {
        let ladder = Level::Expert.difficulty_ladder();
        let questions = coding_questions("Tries", &ladder);
        assert_eq!(questions.len(), 4);
        for (i, q) in questions.iter().enumerate() {
            assert_eq!(q.question_number, i as u32 + 1);
            assert_eq!(q.difficulty, ladder[i]);
            assert_eq!(q.test_cases.len(), 2);
            assert!(!q.test_cases[0].is_hidden);
            assert!(q.test_cases[1].is_hidden);
        }
    }

    #[test]
    fn neutral_analysis_scores_mid_scale() {
        assert_eq!(code_analysis().code_quality, 5.0);
        assert_eq!(preliminary_evaluation().score, 50.0);
    }
}
