use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Seniority level of the candidate being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    Expert,
}

/// Difficulty of a single coding question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionDifficulty {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// The fixed difficulty ladder used when generating the 4 coding questions.
    pub fn difficulty_ladder(self) -> [QuestionDifficulty; 4] {
        use QuestionDifficulty::*;
        match self {
            Level::Junior => [Easy, Easy, Medium, Medium],
            Level::MidLevel => [Easy, Medium, Medium, Hard],
            Level::Senior => [Medium, Medium, Hard, Hard],
            Level::Expert => [Medium, Hard, Hard, Hard],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Junior => "Junior",
            Level::MidLevel => "Mid-Level",
            Level::Senior => "Senior",
            Level::Expert => "Expert",
        };
        f.write_str(s)
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "junior" => Ok(Level::Junior),
            "mid" | "mid-level" | "midlevel" => Ok(Level::MidLevel),
            "senior" => Ok(Level::Senior),
            "expert" => Ok(Level::Expert),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

impl fmt::Display for QuestionDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionDifficulty::Easy => "Easy",
            QuestionDifficulty::Medium => "Medium",
            QuestionDifficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}
