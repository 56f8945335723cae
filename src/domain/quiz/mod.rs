//! Multiple-choice quizzes generated from document passages

mod model;
pub mod prompts;

pub use model::{parse_quiz, Difficulty, Quiz, QuizAnswer, QuizQuestion, QuizScore};
