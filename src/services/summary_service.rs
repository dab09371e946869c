//! 摘要服务 - 业务能力层
//!
//! 只负责"生成考试摘要"能力

use std::sync::Arc;

use tracing::info;

use crate::clients::{ChatMessage, CompletionService};
use crate::error::AppResult;

const SUMMARY_MAX_TOKENS: u32 = 2000;
const SUMMARY_TEMPERATURE: f32 = 0.8;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert Microsoft AI-102 exam tutor. \
    You create concise, highly focused summaries for exam preparation. \
    You know the AI-102 exam objectives in detail and are familiar with Azure AI services, best practices, \
    architecture patterns, and design principles. \
    You reference official Azure documentation when relevant.";

/// 摘要服务
pub struct SummaryService {
    llm: Arc<dyn CompletionService>,
}

impl SummaryService {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    /// 生成面向 AI-102 考试的摘要
    ///
    /// `language` 为 `"en"` 时强制英文输出，其他值原样写入提示词
    pub async fn generate_summary(&self, text: &str, language: &str) -> AppResult<String> {
        info!("📝 正在生成摘要（语言: {}）...", language);

        let messages = [
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(build_summary_prompt(text, language)),
        ];

        let summary = self
            .llm
            .complete(&messages, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE)
            .await?;

        info!("✓ 摘要生成完成，{} 个字符", summary.chars().count());
        Ok(summary)
    }
}

fn language_name(language: &str) -> &str {
    if language == "en" {
        "English"
    } else {
        language
    }
}

pub fn build_summary_prompt(text: &str, language: &str) -> String {
    format!(
        "Summarize the following content in {} \
         with a strong focus on topics that appear in the Microsoft AI-102 exam. \
         Your summary should include:\n\
         1. Key concepts and definitions relevant to AI-102.\n\
         2. Important Azure AI services and their use cases.\n\
         3. Recommended design patterns, best practices, and architecture tips.\n\
         4. Typical exam scenarios or question types.\n\
         5. References to official Azure documentation where appropriate.\n\n\
         Output format:\n\
         - Bullet points (10-15) or short paragraphs (max 8).\n\
         - Use clear, concise, study-friendly language.\n\
         - Do NOT add commentary, opinions, or filler text.\n\n\
         Content to summarize:\n{}",
        language_name(language),
        text
    )
}
