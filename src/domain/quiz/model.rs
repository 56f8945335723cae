use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("valid trailing comma regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Adjective used in the question prompt
    pub fn adjective(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "difficult",
        }
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::validation(format!(
                "Unknown difficulty '{}', expected easy or hard",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub answer: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answers: Vec<QuizAnswer>,
}

impl QuizQuestion {
    /// Whether the option at `choice` is a correct one
    pub fn is_correct(&self, choice: usize) -> bool {
        self.answers.get(choice).is_some_and(|a| a.correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Grade one selected option index per question; `None` means skipped
    pub fn score(&self, selections: &[Option<usize>]) -> QuizScore {
        let correct = self
            .questions
            .iter()
            .zip(selections)
            .filter(|(question, choice)| choice.is_some_and(|c| question.is_correct(c)))
            .count();

        QuizScore {
            correct,
            total: self.questions.len(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.questions.is_empty() {
            return Err(DomainError::validation("Quiz has no questions"));
        }

        for (idx, question) in self.questions.iter().enumerate() {
            if question.answers.len() < 2 {
                return Err(DomainError::validation(format!(
                    "Question {} has fewer than two options",
                    idx + 1
                )));
            }

            if !question.answers.iter().any(|a| a.correct) {
                return Err(DomainError::validation(format!(
                    "Question {} has no correct option",
                    idx + 1
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You scored {} out of {}.", self.correct, self.total)
    }
}

/// Parse model output into a quiz.
///
/// Markdown code fences and trailing commas are tolerated.
pub fn parse_quiz(text: &str) -> Result<Quiz, DomainError> {
    let body = text.trim();
    let body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .unwrap_or(body);
    let body = body.trim().strip_suffix("```").unwrap_or(body).trim();

    if body.is_empty() {
        return Err(DomainError::validation("Quiz output is empty"));
    }

    let cleaned = TRAILING_COMMA.replace_all(body, "$1");
    let quiz: Quiz = serde_json::from_str(&cleaned)
        .map_err(|e| DomainError::validation(format!("Quiz output is not valid JSON: {}", e)))?;

    quiz.validate()?;
    Ok(quiz)
}
