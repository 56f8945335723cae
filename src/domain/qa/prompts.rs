//! Prompt templates for answering from retrieved passages

use std::collections::HashMap;

use super::ScoredAnswer;
use crate::domain::llm::LlmRequest;
use crate::domain::prompt::render;
use crate::domain::retrieval::ContextDocument;

/// Asks for an answer grounded in one passage, followed by a 0-5 score
pub const ANSWER_PROMPT: &str = "\
Answer the user's question using ONLY the context below. If the context does not contain \
the answer, say you don't know; do not make anything up.

After the answer, rate how well it answers the question with a score from 0 to 5 on its \
own line, formatted as `Score: N`. Always include the score, even when it is 0.

Context: ${var:context}

Examples:

Question: How far away is the moon?
Answer: The moon is 384,400 km away.
Score: 5

Question: How far away is the sun?
Answer: I don't know
Score: 0

Your turn!

Question: ${var:question}";

/// Asks the model to pick among scored answers
pub const CHOOSE_PROMPT: &str = "\
Answer the user's question using ONLY the pre-existing answers below.

Prefer the answers with the highest score, and among those the most recent ones.

Cite the sources of the answers you use exactly as they are written; do not change them.
If there are no answers, say you don't know.

Answers: ${var:answers}";

/// Single-call answer over every retrieved passage at once
pub const STUFF_PROMPT: &str = "\
Answer the question using ONLY the following context. If you don't know the answer, \
just say you don't know. Don't make anything up.

Context: ${var:context}";

/// Request for the per-passage answering step
pub fn answer_request(question: &str, document: &ContextDocument, temperature: f32) -> LlmRequest {
    let variables = HashMap::from([("context", document.content.as_str()), ("question", question)]);

    LlmRequest::default()
        .user(render(ANSWER_PROMPT, &variables))
        .with_temperature(temperature)
}

/// Join scored answers into the block fed to the choosing step
pub fn condense_answers(answers: &[ScoredAnswer]) -> String {
    answers
        .iter()
        .map(|a| format!("{}\nSource:{}\nDate:{}", a.answer, a.source, a.date))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Request for the final choosing step
pub fn choose_request(question: &str, answers: &[ScoredAnswer], temperature: f32) -> LlmRequest {
    let condensed = condense_answers(answers);
    let variables = HashMap::from([("answers", condensed.as_str())]);

    LlmRequest::default()
        .system(render(CHOOSE_PROMPT, &variables))
        .user(question)
        .with_temperature(temperature)
}

/// Passage contents separated by blank lines
pub fn format_documents(documents: &[ContextDocument]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Request answering from all passages in one call
pub fn stuff_request(question: &str, documents: &[ContextDocument], temperature: f32) -> LlmRequest {
    let context = format_documents(documents);
    let variables = HashMap::from([("context", context.as_str())]);

    LlmRequest::default()
        .system(render(STUFF_PROMPT, &variables))
        .user(question)
        .with_temperature(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MessageRole;

    #[test]
    fn test_answer_request_embeds_context_and_question() {
        let document = ContextDocument::new("Vectorize stores vectors.", "vectorize.md");

        let request = answer_request("What is Vectorize?", &document, 0.1);

        assert_eq!(request.messages.len(), 1);
        let prompt = request.messages[0].content();
        assert!(prompt.contains("Context: Vectorize stores vectors."));
        assert!(prompt.ends_with("Question: What is Vectorize?"));
        assert!(!prompt.contains("${var:"));
        assert_eq!(request.temperature, Some(0.1));
    }

    #[test]
    fn test_choose_request_lists_answers_with_sources() {
        let answers = vec![
            ScoredAnswer {
                answer: "It stores vectors.\nScore: 5".into(),
                score: 5,
                source: "vectorize.md".into(),
                date: "2024-05-01".into(),
            },
            ScoredAnswer {
                answer: "I don't know\nScore: 0".into(),
                score: 0,
                source: "workers.md".into(),
                date: "unknown".into(),
            },
        ];

        let request = choose_request("What is Vectorize?", &answers, 0.1);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        let system = request.messages[0].content();
        assert!(system.contains("Source:vectorize.md\nDate:2024-05-01"));
        assert!(system.contains("Source:workers.md\nDate:unknown"));
        assert_eq!(request.last_user_text(), Some("What is Vectorize?"));
    }

    #[test]
    fn test_condense_answers_empty() {
        assert_eq!(condense_answers(&[]), "");
    }

    #[test]
    fn test_stuff_request_joins_passages() {
        let documents = vec![
            ContextDocument::new("R2 is object storage.", "r2.md"),
            ContextDocument::new("AI Gateway proxies AI requests.", "ai-gateway.md"),
        ];

        let request = stuff_request("What is R2?", &documents, 0.1);

        assert!(request.has_system_prompt());
        assert!(request.messages[0]
            .content()
            .ends_with("Context: R2 is object storage.\n\nAI Gateway proxies AI requests."));
        assert_eq!(request.last_user_text(), Some("What is R2?"));
    }
}
