//! German language exercise generation and grading.
//!
//! Separate from the enrichment pipeline: shares only the chat client.
//! Exercises are generated and graded by the model against strict
//! format instructions; the dictionary and learning log live in the
//! same relational store as the CRM tokens.

pub mod analyze;
pub mod history;
pub mod prompts;

pub use analyze::{parse_word_analysis, WordAnalysis};
pub use history::PromptHistory;
pub use prompts::{ExerciseKind, TopicSelection};
