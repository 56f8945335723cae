//! Prompts for the two quiz generation calls

use std::collections::HashMap;

use super::Difficulty;
use crate::domain::llm::LlmRequest;
use crate::domain::prompt::render;

/// Writes the questions in free text, correct options marked with `(o)`
pub const QUESTIONS_PROMPT: &str = "\
You are a helpful assistant that is role playing as a teacher.

Based ONLY on the following context, create ${var:count} questions to test the user's \
knowledge about the text.

Each question should have 4 answers, three of them incorrect and one correct.
Use (o) to signal the correct answer.
Make the questions ${var:difficulty}.

Question examples:

Question: What is the color of the ocean?
Answers: Red|Yellow|Green|Blue(o)

Question: What is the capital of Georgia?
Answers: Baku|Tbilisi(o)|Manila|Beirut

Your turn!

Context: ${var:context}";

/// Turns the free-text questions into the JSON shape `parse_quiz` reads
pub const FORMATTING_PROMPT: &str = "\
You are a powerful formatting algorithm.

Format the following questions into valid JSON format.
Answers marked with (o) are correct; drop the marker from the answer text.

Use exactly this structure:

{ \"questions\": [ { \"question\": \"What is the color of the ocean?\", \"answers\": [ \
{ \"answer\": \"Red\", \"correct\": false }, { \"answer\": \"Blue\", \"correct\": true } ] } ] }

Questions: ${var:questions}";

pub fn questions_request(
    context: &str,
    count: usize,
    difficulty: Difficulty,
    temperature: f32,
) -> LlmRequest {
    let count = count.to_string();
    let variables = HashMap::from([
        ("context", context),
        ("count", count.as_str()),
        ("difficulty", difficulty.adjective()),
    ]);

    LlmRequest::default()
        .system(render(QUESTIONS_PROMPT, &variables))
        .with_temperature(temperature)
}

pub fn formatting_request(questions: &str, temperature: f32) -> LlmRequest {
    let variables = HashMap::from([("questions", questions)]);

    LlmRequest::default()
        .system(render(FORMATTING_PROMPT, &variables))
        .with_temperature(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_request() {
        let request = questions_request("R2 is object storage.", 3, Difficulty::Hard, 0.1);

        let prompt = request.messages[0].content();
        assert!(prompt.contains("create 3 questions"));
        assert!(prompt.contains("Make the questions difficult."));
        assert!(prompt.ends_with("Context: R2 is object storage."));
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_formatting_request() {
        let request = formatting_request("Question: What is R2?\nAnswers: Storage(o)|DB", 0.1);

        let prompt = request.messages[0].content();
        assert!(prompt.starts_with("You are a powerful formatting algorithm."));
        assert!(prompt.ends_with("Questions: Question: What is R2?\nAnswers: Storage(o)|DB"));
    }
}
