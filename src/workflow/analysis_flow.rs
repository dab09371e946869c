//! 文档分析流程 - 流程层
//!
//! 核心职责：定义"一份文档"的完整处理流程
//!
//! 流程顺序（严格串行，后一步依赖前一步）：
//! 1. 提取文本
//! 2. 生成英文摘要
//! 3. 翻译摘要
//! 4. 基于摘要出题
//! 5. 打乱每道题的选项
//! 6. 保存产物
//!
//! 任何一步失败都直接返回错误，不做部分恢复。

use std::path::Path;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::clients::{CompletionService, TextExtractor};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{AnalysisResult, Quiz, QuizItem};
use crate::services::{ArtifactStore, QuizService, SummaryService, TranslationService};

/// 摘要固定使用英文
const SUMMARY_LANGUAGE: &str = "en";

/// 文档分析流程
///
/// - 持有外部能力（提取、补全）的显式句柄，由调用方注入
/// - 只依赖业务能力（services）
pub struct AnalysisFlow {
    extractor: Arc<dyn TextExtractor>,
    summary_service: SummaryService,
    translation_service: TranslationService,
    quiz_service: QuizService,
    artifact_store: ArtifactStore,
    num_questions: usize,
}

impl AnalysisFlow {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        llm: Arc<dyn CompletionService>,
        config: &Config,
    ) -> Self {
        Self {
            extractor,
            summary_service: SummaryService::new(llm.clone()),
            translation_service: TranslationService::new(llm.clone()),
            quiz_service: QuizService::new(llm),
            artifact_store: ArtifactStore::new(&config.output_dir),
            num_questions: config.quiz_num_questions,
        }
    }

    /// 分析一份文档
    pub async fn analyze(&self, file: &Path) -> AppResult<AnalysisResult> {
        info!("🔍 开始分析: {}", file.display());

        let text = self.extractor.extract_text(file).await?;

        let summary = self
            .summary_service
            .generate_summary(&text, SUMMARY_LANGUAGE)
            .await?;

        let translation = self.translation_service.translate(&summary).await?;

        // 题目来源是摘要而不是原文
        info!("🎯 正在生成测验（目标 {} 题）...", self.num_questions);
        let items = self
            .quiz_service
            .generate_quiz(&summary, self.num_questions)
            .await?;

        let mut quiz = Quiz::new(items);
        {
            let mut rng = rand::thread_rng();
            shuffle_quiz(&mut quiz, &mut rng);
        }

        let output_folder = self
            .artifact_store
            .persist(file, &summary, &translation, &quiz)?;

        Ok(AnalysisResult {
            summary,
            translation,
            quiz,
            output_folder,
        })
    }
}

/// 打乱所有题目的选项顺序
pub fn shuffle_quiz<R: Rng + ?Sized>(quiz: &mut Quiz, rng: &mut R) {
    for (index, item) in quiz.questions.iter_mut().enumerate() {
        if !shuffle_options(item, rng) {
            warn!("题目 {} 缺少选项或正确答案，保持原样", index + 1);
        }
    }
}

/// 打乱单道题的选项
///
/// 选项为空或没有正确答案时不做任何修改并返回 `false`。
/// `correct_answer` 按值保存，打乱后无需更新。
pub fn shuffle_options<R: Rng + ?Sized>(item: &mut QuizItem, rng: &mut R) -> bool {
    let Some(correct) = item.correct_answer.as_deref() else {
        return false;
    };
    if item.options.is_empty() {
        return false;
    }

    let mut paired: Vec<(String, bool)> = item
        .options
        .drain(..)
        .map(|opt| {
            let is_correct = opt == correct;
            (opt, is_correct)
        })
        .collect();

    let marked = paired.iter().filter(|(_, is_correct)| *is_correct).count();
    if marked != 1 {
        warn!(
            "题目 \"{}\" 中有 {} 个选项与正确答案相同",
            item.question, marked
        );
    }

    paired.shuffle(rng);
    item.options = paired.into_iter().map(|(opt, _)| opt).collect();
    true
}
