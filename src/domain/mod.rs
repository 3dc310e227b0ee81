pub mod section;

pub use section::{ScoredSection, Section};
