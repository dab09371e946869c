//! 测验生成服务 - 业务能力层
//!
//! 只负责"根据文本出题"能力：构建提示词、调用一次 LLM、宽松解析响应。
//! 响应无法解析时返回空列表，不让整个分析失败。

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{ChatMessage, CompletionService};
use crate::error::AppResult;
use crate::models::{EmptyReason, QuizItem, QuizParse};
use crate::utils::logging::truncate_text;

/// 默认请求的题目数量
pub const DEFAULT_NUM_QUESTIONS: usize = 25;

const QUIZ_MAX_TOKENS: u32 = 4000;
const QUIZ_TEMPERATURE: f32 = 0.2;

/// 测验生成服务
pub struct QuizService {
    llm: Arc<dyn CompletionService>,
}

impl QuizService {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    /// 生成测验题目
    ///
    /// `num_questions` 只是目标值，LLM 可能返回更多、更少或格式错误的内容。
    /// 调用失败会向上传播；解析失败返回空列表。
    pub async fn generate_quiz(
        &self,
        source_text: &str,
        num_questions: usize,
    ) -> AppResult<Vec<QuizItem>> {
        let prompt = build_quiz_prompt(source_text, num_questions);

        let response = self
            .llm
            .complete(&[ChatMessage::user(prompt)], QUIZ_MAX_TOKENS, QUIZ_TEMPERATURE)
            .await?;

        debug!("测验原始响应（前 500 字符）: {}", truncate_text(&response, 500));

        match parse_quiz_response(&response) {
            QuizParse::Valid(items) => {
                info!("✓ 成功解析 {} 道题目", items.len());
                Ok(items)
            }
            QuizParse::Empty(EmptyReason::MalformedJson(e)) => {
                warn!("⚠️ 测验 JSON 解析失败: {}", e);
                debug!("原始响应: {}", response);
                Ok(Vec::new())
            }
            QuizParse::Empty(EmptyReason::UnexpectedShape) => {
                warn!("⚠️ 测验 JSON 结构不符合预期，按空测验处理");
                Ok(Vec::new())
            }
        }
    }
}

/// 构建出题提示词
pub fn build_quiz_prompt(source_text: &str, num_questions: usize) -> String {
    format!(
        "Generate {} test questions from the text below in JSON format \
         (a list of objects with the following fields: question, options (a list of 4 strings), correct_answer). \
         Return ONLY valid JSON, no markdown, no extra text:\n\n{}",
        num_questions, source_text
    )
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)(?:```|\z)")
            .expect("fence regex is valid")
    })
}

/// 去掉 markdown 代码块围栏
///
/// 有代码块时只取第一个代码块的内容（语言标签可有可无，缺少结尾围栏时取到末尾），
/// 否则原样返回。
pub fn strip_code_fence(text: &str) -> &str {
    match fence_regex().captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// 解析 LLM 的测验响应
///
/// 接受两种结构：题目数组，或带 `questions` 数组字段的对象。
pub fn parse_quiz_response(response: &str) -> QuizParse {
    let content = strip_code_fence(response);

    let value: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => return QuizParse::Empty(EmptyReason::MalformedJson(e.to_string())),
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => return QuizParse::Empty(EmptyReason::UnexpectedShape),
        },
        _ => return QuizParse::Empty(EmptyReason::UnexpectedShape),
    };

    let total = items.len();
    let questions: Vec<QuizItem> = items.iter().filter_map(QuizItem::from_value).collect();
    if questions.len() < total {
        warn!("丢弃了 {} 个非对象的题目元素", total - questions.len());
    }

    QuizParse::Valid(questions)
}
