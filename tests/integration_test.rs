use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use doc_insight::clients::{ChatMessage, ChatRole, CompletionService, TextExtractor};
use doc_insight::error::{AppError, AppResult, ExtractionError};
use doc_insight::services::load_quiz;
use doc_insight::{AnalysisFlow, App, Config};
use tempfile::tempdir;

const EXTRACTED: &str = "Azure Cognitive Services overview...";
const SUMMARY: &str = "- Azure AI Vision reads text from images.";
const TRANSLATION: &str = "- Azure AI Vision odczytuje tekst z obrazów.";

struct FakeExtractor {
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeExtractor {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract_text(&self, file_path: &Path) -> AppResult<String> {
        self.calls.lock().unwrap().push(file_path.to_path_buf());
        Ok(EXTRACTED.to_string())
    }
}

struct FailingExtractor;

#[async_trait]
impl TextExtractor for FailingExtractor {
    async fn extract_text(&self, file_path: &Path) -> AppResult<String> {
        Err(ExtractionError::AnalysisFailed {
            message: format!("cannot read {}", file_path.display()),
        }
        .into())
    }
}

#[derive(Debug, Clone)]
struct RecordedCall {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// 按提示词内容返回固定响应的 LLM
struct ScriptedLlm {
    quiz_response: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedLlm {
    fn new(quiz_response: impl Into<String>) -> Self {
        Self {
            quiz_response: quiz_response.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> AppResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            max_tokens,
            temperature,
        });

        let user = messages
            .iter()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let response = if user.starts_with("Summarize") {
            SUMMARY.to_string()
        } else if user.starts_with("Translate") {
            TRANSLATION.to_string()
        } else {
            self.quiz_response.clone()
        };
        Ok(response)
    }
}

fn setup(root: &Path) -> (Config, PathBuf) {
    let upload = root.join("ai102_notes.pdf");
    fs::write(&upload, b"%PDF-1.4 fake").unwrap();
    let config = Config {
        output_dir: root.join("analysis_results").display().to_string(),
        ..Config::default()
    };
    (config, upload)
}

#[tokio::test]
async fn test_pipeline_calls_each_service_once() {
    let dir = tempdir().expect("temp dir");
    let (config, upload) = setup(dir.path());

    let extractor = Arc::new(FakeExtractor::new());
    let llm = Arc::new(ScriptedLlm::new(
        "```json\n[{\"question\":\"Q1\",\"options\":[\"A\",\"B\",\"C\",\"D\"],\"correct_answer\":\"B\"}]\n```",
    ));
    let flow = AnalysisFlow::new(extractor.clone(), llm.clone(), &config);

    let result = flow.analyze(&upload).await.unwrap();

    assert_eq!(extractor.calls.lock().unwrap().as_slice(), &[upload.clone()]);

    let calls = llm.calls();
    assert_eq!(calls.len(), 3);

    // 摘要：强制英文，输入为提取的文本
    let summary_call = &calls[0];
    assert_eq!(summary_call.messages.len(), 2);
    assert_eq!(summary_call.messages[0].role, ChatRole::System);
    assert!(summary_call.messages[1].content.contains("in English"));
    assert!(summary_call.messages[1].content.ends_with(EXTRACTED));
    assert_eq!(summary_call.max_tokens, 2000);

    // 翻译：输入为摘要
    let translation_call = &calls[1];
    assert!(translation_call.messages[0].content.ends_with(SUMMARY));
    assert_eq!(translation_call.max_tokens, 1000);

    // 出题：输入为摘要，默认 25 题，低温度
    let quiz_call = &calls[2];
    assert!(quiz_call.messages[0].content.starts_with("Generate 25 test questions"));
    assert!(quiz_call.messages[0].content.ends_with(SUMMARY));
    assert!(!quiz_call.messages[0].content.contains(EXTRACTED));
    assert_eq!(quiz_call.max_tokens, 4000);
    assert!(quiz_call.temperature <= 0.2);

    assert_eq!(result.summary, SUMMARY);
    assert_eq!(result.translation, TRANSLATION);
    assert_eq!(result.quiz.len(), 1);
    let item = &result.quiz.questions[0];
    assert_eq!(item.correct_answer.as_deref(), Some("B"));
    let mut options = item.options.clone();
    options.sort();
    assert_eq!(options, vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_pipeline_persists_artifacts() {
    let dir = tempdir().expect("temp dir");
    let (config, upload) = setup(dir.path());

    let flow = AnalysisFlow::new(
        Arc::new(FakeExtractor::new()),
        Arc::new(ScriptedLlm::new(
            r#"{"questions": [{"question":"Q1","options":["A","B","C","D"],"correct_answer":"D"}]}"#,
        )),
        &config,
    );

    let result = flow.analyze(&upload).await.unwrap();
    let folder = &result.output_folder;

    assert!(folder.starts_with(&config.output_dir));
    assert_eq!(
        fs::read(folder.join("ai102_notes.pdf")).unwrap(),
        b"%PDF-1.4 fake"
    );

    let text = fs::read_to_string(folder.join("summary_and_translation.txt")).unwrap();
    assert_eq!(
        text,
        format!(
            "=== SUMMARY (EN) ===\n\n{}\n\n=== TRANSLATION (PL) ===\n\n{}",
            SUMMARY, TRANSLATION
        )
    );

    // quiz.json 与内存中的测验（含打乱后的顺序）一致
    let saved = load_quiz(&folder.join("quiz.json")).unwrap();
    assert_eq!(saved, result.quiz);
}

#[tokio::test]
async fn test_unparseable_quiz_still_completes() {
    let dir = tempdir().expect("temp dir");
    let (config, upload) = setup(dir.path());

    let mut app = App::with_services(
        Arc::new(FakeExtractor::new()),
        Arc::new(ScriptedLlm::new("not json at all")),
        &config,
    );

    let result = app.analyze(&upload).await.unwrap();
    assert!(result.quiz.is_empty());
    assert_eq!(result.summary, SUMMARY);

    let saved = fs::read_to_string(result.output_folder.join("quiz.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved, serde_json::json!({ "questions": [] }));

    assert_eq!(app.session().question_count(), 0);
}

#[tokio::test]
async fn test_new_analysis_replaces_session() {
    let dir = tempdir().expect("temp dir");
    let (config, upload) = setup(dir.path());

    let mut app = App::with_services(
        Arc::new(FakeExtractor::new()),
        Arc::new(ScriptedLlm::new(
            r#"[{"question":"Q1","options":["A","B","C","D"],"correct_answer":"A"},
                {"question":"Q2","options":["A","B","C","D"],"correct_answer":"C"}]"#,
        )),
        &config,
    );

    app.analyze(&upload).await.unwrap();
    assert_eq!(app.session().question_count(), 2);
    assert_eq!(app.session().current_index(), 0);
    assert_eq!(app.session().scoreboard().answered(), 0);
}

#[tokio::test]
async fn test_extraction_failure_aborts_pipeline() {
    let dir = tempdir().expect("temp dir");
    let (config, upload) = setup(dir.path());

    let llm = Arc::new(ScriptedLlm::new("[]"));
    let flow = AnalysisFlow::new(Arc::new(FailingExtractor), llm.clone(), &config);

    let err = flow.analyze(&upload).await.unwrap_err();
    assert!(matches!(err, AppError::Extraction(_)));
    assert!(llm.calls().is_empty());
    assert!(!Path::new(&config.output_dir).exists());
}
