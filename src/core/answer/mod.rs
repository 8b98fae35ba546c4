//! Retrieval-answer pipeline and prompt helpers.

pub mod pipeline;
pub mod prompt;

pub use pipeline::{AnswerPipeline, AnswerSettings};
