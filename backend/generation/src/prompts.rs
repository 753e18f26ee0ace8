//! Prompt builders for the structured generation calls.
//!
//! Each prompt pins the exact JSON shape the caller expects back; extraction
//! still treats the reply defensively.

use mockmate_core::{Level, QuestionDifficulty};

use crate::types::QaPair;

pub fn preliminary_questions(topic: &str, level: Level) -> String {
    format!(
        r#"You are an expert technical interviewer conducting a DSA interview on "{topic}" for a {level} level candidate.

Generate exactly 5 preliminary theoretical questions about {topic} to assess the candidate's understanding before coding challenges.

Questions should:
- Test fundamental concepts
- Be clear and concise
- Range from basic to advanced based on {level} level
- Not require coding, just verbal/conceptual answers

Return ONLY a JSON array of 5 questions, nothing else. Format:
["Question 1?", "Question 2?", "Question 3?", "Question 4?", "Question 5?"]"#
    )
}

pub fn coding_questions(topic: &str, level: Level, ladder: &[QuestionDifficulty; 4]) -> String {
    let difficulties = ladder
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"You are an expert technical interviewer. Generate exactly 4 coding questions about "{topic}" for a {level} level candidate.

Difficulties: {difficulties}

For each question, provide:
1. Title (concise)
2. Description (clear problem statement)
3. Difficulty level
4. Constraints
5. 2 examples with input, output, and explanation
6. 3 test cases (2 visible, 1 hidden)

Return ONLY a valid JSON array with this exact structure:
[
  {{
    "questionNumber": 1,
    "title": "Question Title",
    "description": "Problem description",
    "difficulty": "Easy",
    "constraints": "Constraints here",
    "examples": [
      {{"input": "example input", "output": "example output", "explanation": "why"}},
      {{"input": "example input 2", "output": "example output 2", "explanation": "why"}}
    ],
    "testCases": [
      {{"input": "test1", "expectedOutput": "output1", "isHidden": false}},
      {{"input": "test2", "expectedOutput": "output2", "isHidden": false}},
      {{"input": "test3", "expectedOutput": "output3", "isHidden": true}}
    ]
  }}
]

Generate all 4 questions with difficulties: {difficulties}"#
    )
}

pub fn analyze_code(question: &str, code: &str, language: &str) -> String {
    format!(
        r#"You are an expert code reviewer. Analyze this solution:

**Question:** {question}

**Code ({language}):**
```{language}
{code}
```

Provide a detailed analysis in JSON format:
{{
  "timeComplexity": "O(...) with explanation",
  "spaceComplexity": "O(...) with explanation",
  "codeQuality": 8,
  "approach": "Brief description of the approach used",
  "suggestions": ["Improvement 1", "Improvement 2"],
  "strengths": ["Strength 1", "Strength 2"],
  "weaknesses": ["Weakness 1", "Weakness 2"]
}}

Code quality should be 0-10 based on:
- Correctness
- Efficiency
- Readability
- Best practices

Return ONLY valid JSON, nothing else."#
    )
}

pub fn evaluate_preliminary(topic: &str, qa_pairs: &[QaPair]) -> String {
    let qa_text = qa_pairs
        .iter()
        .enumerate()
        .map(|(i, qa)| format!("Q{n}: {q}\nA{n}: {a}", n = i + 1, q = qa.question, a = qa.answer))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        r#"You are an expert technical interviewer evaluating preliminary answers for a DSA interview on "{topic}".

Questions and Answers:
{qa_text}

Evaluate the answers and provide:
1. A score out of 100
2. Brief feedback (2-3 sentences)

Return ONLY valid JSON:
{{
  "score": 85,
  "feedback": "Your feedback here"
}}"#
    )
}

pub fn overall_feedback(
    topic: &str,
    level: Level,
    preliminary_score: f64,
    coding_score: f64,
    code_quality_score: f64,
    time_management_score: f64,
) -> String {
    format!(
        r#"You are an expert technical interviewer providing final feedback for a {level} level DSA interview on "{topic}".

Scores:
- Preliminary Questions: {preliminary_score:.0}/100
- Coding Challenges: {coding_score:.0}/100
- Code Quality: {code_quality_score:.0}/100
- Time Management: {time_management_score:.0}/100

Provide:
1. Overall feedback (3-4 sentences)
2. 3-5 specific recommendations for improvement

Return ONLY valid JSON:
{{
  "feedback": "Overall feedback here",
  "recommendations": ["Recommendation 1", "Recommendation 2", "Recommendation 3"]
}}"#
    )
}
