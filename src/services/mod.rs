pub mod artifact_store;
pub mod quiz_service;
pub mod summary_service;
pub mod translation_service;

pub use artifact_store::{load_quiz, ArtifactStore};
pub use quiz_service::{parse_quiz_response, strip_code_fence, QuizService, DEFAULT_NUM_QUESTIONS};
pub use summary_service::SummaryService;
pub use translation_service::TranslationService;
