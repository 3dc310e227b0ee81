pub mod generator;
pub mod pipeline;
pub mod scorer;
pub mod selector;

pub use generator::{build_prompt, parse_question, FallbackChain, Question, QuestionGenerator};
pub use pipeline::{PipelineReport, QuizPipeline, QuizSource};
pub use scorer::{rank_sections, score_sections, SectionScorer};
pub use selector::{select_best_section, select_best_section_with, SectionSelector, SelectionStrategy};
