//! LLM provider implementations of the extractor traits.

mod openai;

pub use openai::OpenAI;
