//! Conversation transcript kept by a session

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Answer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Ai,
}

/// One message of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl fmt::Display for ChatTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.speaker {
            Speaker::Human => "human",
            Speaker::Ai => "ai",
        };
        write!(f, "[{}] {}", label, self.text)
    }
}

/// Questions and answers in the order they were exchanged.
///
/// Only successful exchanges are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question and the answer given to it
    pub fn push_exchange(&mut self, question: &str, answer: &Answer) {
        self.turns.push(ChatTurn {
            speaker: Speaker::Human,
            text: question.to_string(),
        });
        self.turns.push(ChatTurn {
            speaker: Speaker::Ai,
            text: answer.to_string(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qa::AnswerOrigin;

    #[test]
    fn test_exchanges_alternate_speakers() {
        let mut history = ChatHistory::new();

        history.push_exchange(
            "What is R2?",
            &Answer::new("Object storage.", AnswerOrigin::Generated { recorded: true }),
        );
        history.push_exchange("what is r2?", &Answer::new("Object storage.", AnswerOrigin::ExactCache));

        let speakers: Vec<Speaker> = history.turns().iter().map(|t| t.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::Human, Speaker::Ai, Speaker::Human, Speaker::Ai]
        );
        assert_eq!(history.turns()[3].text, "(Cached)\n\nObject storage.");
        assert_eq!(history.turns()[0].to_string(), "[human] What is R2?");

        history.clear();
        assert!(history.is_empty());
    }
}
