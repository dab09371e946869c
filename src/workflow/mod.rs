pub mod analysis_flow;
pub mod quiz_session;

pub use analysis_flow::{shuffle_options, shuffle_quiz, AnalysisFlow};
pub use quiz_session::{QuizSession, QuizView, Scoreboard};
