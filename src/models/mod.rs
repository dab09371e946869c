pub mod analysis;
pub mod quiz;

pub use analysis::AnalysisResult;
pub use quiz::{EmptyReason, Quiz, QuizItem, QuizParse};
