//! 翻译服务 - 业务能力层

use std::sync::Arc;

use tracing::info;

use crate::clients::{ChatMessage, CompletionService};
use crate::error::AppResult;

/// 固定的目标语言
pub const TARGET_LANGUAGE: &str = "Polish";

const TRANSLATION_MAX_TOKENS: u32 = 1000;
const TRANSLATION_TEMPERATURE: f32 = 0.6;

/// 翻译服务
pub struct TranslationService {
    llm: Arc<dyn CompletionService>,
}

impl TranslationService {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    /// 将文本翻译为目标语言
    pub async fn translate(&self, text: &str) -> AppResult<String> {
        info!("🌐 正在翻译为 {}...", TARGET_LANGUAGE);

        let prompt = format!("Translate the following text into {}:\n\n{}", TARGET_LANGUAGE, text);
        let translated = self
            .llm
            .complete(
                &[ChatMessage::user(prompt)],
                TRANSLATION_MAX_TOKENS,
                TRANSLATION_TEMPERATURE,
            )
            .await?;

        info!("✓ 翻译完成");
        Ok(translated)
    }
}
