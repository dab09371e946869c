//! 测验数据模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单道选择题
///
/// `correct_answer` 按值（而非下标）保存，选项重新排序后仍可直接比较
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
}

impl QuizItem {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: Option<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            correct_answer,
        }
    }

    /// 宽松地从 JSON 值构建题目
    ///
    /// 字段值不做类型和长度校验：缺失的字段取空值，非字符串标量转为字符串。
    /// 非对象返回 `None`。
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let question = obj.get("question").map(value_to_text).unwrap_or_default();

        let options = match obj.get("options") {
            Some(Value::Array(items)) => items.iter().map(value_to_text).collect(),
            _ => Vec::new(),
        };

        let correct_answer = match obj.get("correct_answer") {
            None | Some(Value::Null) => None,
            Some(v) => Some(value_to_text(v)),
        };

        Some(Self {
            question,
            options,
            correct_answer,
        })
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 一次分析生成的完整测验，创建后只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub questions: Vec<QuizItem>,
}

impl Quiz {
    pub fn new(questions: Vec<QuizItem>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizItem> {
        self.questions.get(index)
    }
}

/// LLM 测验响应的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizParse {
    /// 解析成功（列表本身可能为空）
    Valid(Vec<QuizItem>),
    /// 无法恢复出题目列表
    Empty(EmptyReason),
}

/// 解析失败的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// 不是合法 JSON
    MalformedJson(String),
    /// JSON 合法但结构不是题目数组或 `{"questions": [...]}`
    UnexpectedShape,
}

impl QuizParse {
    /// 取出题目列表，失败时为空列表
    pub fn into_items(self) -> Vec<QuizItem> {
        match self {
            QuizParse::Valid(items) => items,
            QuizParse::Empty(_) => Vec::new(),
        }
    }
}
