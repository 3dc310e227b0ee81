pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod quiz;

#[cfg(test)]
mod testing;

pub use error::{GenerationError, QuizError};
