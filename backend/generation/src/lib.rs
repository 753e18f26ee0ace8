//! Client for the external text-generation capability.
//!
//! Everything the engine asks of the backend goes through [`GenerationService`]:
//! prompt construction, the provider round trip, defensive payload extraction,
//! and range clamping. Failures come back as a tagged [`GenerationError`]; the
//! deterministic substitutes for each failure live in [`fallback`].

pub mod extract;
pub mod fallback;
pub mod prompts;
pub mod providers;
pub mod service;
pub mod types;

pub use providers::groq::GroqProvider;
pub use providers::mock::MockProvider;
pub use service::{GenerationError, GenerationService};
pub use types::{
    CodeAnalysis, CodingQuestion, OverallFeedback, PreliminaryEvaluation, QaPair,
    QuestionExample, TestCase,
};
